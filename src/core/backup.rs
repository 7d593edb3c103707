//! Pre-write backups of template files.

use std::{
    collections::HashSet,
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;

/// Copies originals into a run-specific directory before they are overwritten.
///
/// Each file is copied at most once per store, at its project-relative path, so the
/// backup always holds the pre-migration content.
#[derive(Debug)]
pub struct BackupStore {
    dir: PathBuf,
    project_root: PathBuf,
    saved: HashSet<PathBuf>,
}

impl BackupStore {
    /// Store under `<backup_root>/templates_YYYYMMDD_HHMMSS`.
    pub fn timestamped(backup_root: &Path, project_root: &Path) -> Self {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::new(
            backup_root.join(format!("templates_{}", stamp)),
            project_root,
        )
    }

    pub fn new(dir: PathBuf, project_root: &Path) -> Self {
        Self {
            dir,
            project_root: project_root.to_path_buf(),
            saved: HashSet::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    /// Copy `file` into the store unless it was already copied.
    ///
    /// Returns the backup path when a copy was made.
    pub fn backup(&mut self, file: &Path) -> Result<Option<PathBuf>> {
        let relative = self.relative_path(file);
        if self.saved.contains(&relative) {
            return Ok(None);
        }

        let target = self.dir.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create backup directory: {}", parent.display()))?;
        }
        fs::copy(file, &target).with_context(|| {
            format!(
                "Failed to back up {} to {}",
                file.display(),
                target.display()
            )
        })?;

        tracing::debug!(file = %file.display(), backup = %target.display(), "backed up file");
        self.saved.insert(relative);
        Ok(Some(target))
    }

    fn relative_path(&self, file: &Path) -> PathBuf {
        let stripped = file.strip_prefix(&self.project_root).unwrap_or(file);
        stripped
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_backup_preserves_relative_path_and_content() {
        let project = tempdir().unwrap();
        let file = project.path().join("views/admin/settings.mustache");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "<h1>Original</h1>").unwrap();

        let backups = project.path().join("backups/run");
        let mut store = BackupStore::new(backups.clone(), project.path());

        let target = store.backup(&file).unwrap().unwrap();
        assert_eq!(target, backups.join("views/admin/settings.mustache"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "<h1>Original</h1>");
    }

    #[test]
    fn test_backup_happens_once_per_file() {
        let project = tempdir().unwrap();
        let file = project.path().join("a.mustache");
        fs::write(&file, "v1").unwrap();

        let mut store = BackupStore::new(project.path().join("bk"), project.path());
        assert!(store.backup(&file).unwrap().is_some());

        fs::write(&file, "v2").unwrap();
        assert!(store.backup(&file).unwrap().is_none());
        assert_eq!(
            fs::read_to_string(project.path().join("bk/a.mustache")).unwrap(),
            "v1"
        );
        assert_eq!(store.saved_count(), 1);
    }

    #[test]
    fn test_timestamped_directory_name() {
        let store = BackupStore::timestamped(Path::new("backups"), Path::new("."));
        let name = store.dir().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("templates_"));
        assert_eq!(name.len(), "templates_".len() + 15);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let project = tempdir().unwrap();
        let mut store = BackupStore::new(project.path().join("bk"), project.path());
        assert!(store.backup(&project.path().join("nope.mustache")).is_err());
    }
}
