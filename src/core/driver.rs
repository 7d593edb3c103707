//! Per-file migration loop.
//!
//! Files are handled one at a time: read, replace, validate, then optionally back up
//! and write. A failure on one file is recorded and the loop moves on.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{
    backup::BackupStore,
    inventory::StringInventory,
    replace::{AmbiguousOverlap, ContextualReplacer, ReplacementRecord},
    validate::{StructuralValidator, ValidationOutcome},
};

/// Which templates a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Every existing source file named in the inventory, sorted by path.
    All,
    /// Exactly these project-relative paths, in the given order.
    Named(Vec<String>),
    /// The `n` existing files with the most inventory entries.
    Pilot(usize),
}

/// Resolve a selection against the inventory and the project root.
pub fn select_files(
    inventory: &StringInventory,
    root: &Path,
    selection: &FileSelection,
) -> Vec<String> {
    match selection {
        FileSelection::All => inventory
            .source_files()
            .into_iter()
            .filter(|f| root.join(f).is_file())
            .collect(),
        FileSelection::Named(files) => files.clone(),
        FileSelection::Pilot(n) => inventory
            .files_by_literal_count()
            .into_iter()
            .filter(|(f, _)| root.join(f).is_file())
            .take(*n)
            .map(|(f, _)| f)
            .collect(),
    }
}

/// Inventory source files that do not exist under `root`, sorted by path.
pub fn missing_files(inventory: &StringInventory, root: &Path) -> Vec<String> {
    inventory
        .source_files()
        .into_iter()
        .filter(|f| !root.join(f).is_file())
        .collect()
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    /// Replacements applied and written back.
    Written,
    /// Replacements computed but not written (dry run).
    DryRun,
    /// Nothing to replace.
    Skipped,
    /// I/O failure; no write happened.
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub state: FileState,
    pub replacements: usize,
    pub records: Vec<ReplacementRecord>,
    pub overlaps: Vec<AmbiguousOverlap>,
    /// Present once the migrated text has been validated.
    pub validation: Option<ValidationOutcome>,
    /// Migrated text, kept so callers can map validation errors to source lines.
    pub migrated_text: Option<String>,
}

impl FileReport {
    fn new(path: &str, state: FileState) -> Self {
        Self {
            path: path.to_string(),
            state,
            replacements: 0,
            records: Vec::new(),
            overlaps: Vec::new(),
            validation: None,
            migrated_text: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_none_or(ValidationOutcome::is_ok)
    }
}

/// Aggregated result of a run.
#[derive(Debug, Clone, Default)]
pub struct MigrationSummary {
    pub files: Vec<FileReport>,
    pub dry_run: bool,
    pub backup_dir: Option<PathBuf>,
}

impl MigrationSummary {
    pub fn processed(&self) -> usize {
        self.files.len()
    }

    pub fn migrated(&self) -> usize {
        self.count(|s| matches!(s, FileState::Written | FileState::DryRun))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileState::Skipped))
    }

    pub fn errored(&self) -> usize {
        self.count(|s| matches!(s, FileState::Errored(_)))
    }

    pub fn total_replacements(&self) -> usize {
        self.files.iter().map(|f| f.replacements).sum()
    }

    pub fn invalid_files(&self) -> usize {
        self.files.iter().filter(|f| !f.is_valid()).count()
    }

    /// True when no file failed structural validation.
    pub fn validation_passed(&self) -> bool {
        self.invalid_files() == 0
    }

    fn count(&self, pred: impl Fn(&FileState) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.state)).count()
    }
}

pub struct MigrationDriver<'a> {
    inventory: &'a StringInventory,
    replacer: ContextualReplacer<'a>,
    root: PathBuf,
    backups: Option<BackupStore>,
    dry_run: bool,
}

impl<'a> MigrationDriver<'a> {
    pub fn new(
        inventory: &'a StringInventory,
        replacer: ContextualReplacer<'a>,
        root: &Path,
    ) -> Self {
        Self {
            inventory,
            replacer,
            root: root.to_path_buf(),
            backups: None,
            dry_run: false,
        }
    }

    /// Back up every file right before its first write.
    pub fn with_backups(mut self, backups: BackupStore) -> Self {
        self.backups = Some(backups);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(mut self, files: &[String]) -> MigrationSummary {
        tracing::info!(files = files.len(), dry_run = self.dry_run, "starting migration");

        let reports = files.iter().map(|f| self.migrate_file(f)).collect();

        MigrationSummary {
            files: reports,
            dry_run: self.dry_run,
            backup_dir: self
                .backups
                .as_ref()
                .filter(|b| b.saved_count() > 0)
                .map(|b| b.dir().to_path_buf()),
        }
    }

    pub fn migrate_file(&mut self, relative: &str) -> FileReport {
        let path = self.root.join(relative);

        let original = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = relative, error = %e, "cannot read template");
                return FileReport::new(relative, FileState::Errored(format!("Failed to read file: {}", e)));
            }
        };

        let replacement = self.replacer.replace(&original);
        if replacement.total == 0 {
            tracing::debug!(file = relative, "no strings to migrate");
            let mut report = FileReport::new(relative, FileState::Skipped);
            report.overlaps = replacement.overlaps;
            return report;
        }

        let validation = StructuralValidator::new(self.inventory).validate(&replacement.text);
        let state = if self.dry_run {
            FileState::DryRun
        } else {
            match self.write(&path, &replacement.text) {
                Ok(()) => FileState::Written,
                Err(e) => {
                    tracing::warn!(file = relative, error = %e, "cannot write template");
                    FileState::Errored(format!("{:#}", e))
                }
            }
        };

        tracing::debug!(
            file = relative,
            replacements = replacement.total,
            valid = validation.is_ok(),
            "processed template"
        );

        let errored = matches!(state, FileState::Errored(_));
        FileReport {
            path: relative.to_string(),
            state,
            replacements: if errored { 0 } else { replacement.total },
            records: if errored { Vec::new() } else { replacement.records },
            overlaps: replacement.overlaps,
            validation: (!errored).then_some(validation),
            migrated_text: (!errored).then_some(replacement.text),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(backups) = self.backups.as_mut() {
            backups.backup(path)?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
    }
}
