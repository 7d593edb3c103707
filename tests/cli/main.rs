use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;

mod extract;
mod init;
mod migrate;
mod validate;

const BIN_NAME: &str = "stachemig";

pub const INVENTORY_FILE: &str = "i18n_strings_inventory.json";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    /// Empty project; the `.git` marker stops config lookup at the project root.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    /// Write an inventory with `(key, literal, source_file)` records.
    pub fn write_inventory(&self, entries: &[(&str, &str, &str)]) -> Result<()> {
        let mut keys = serde_json::Map::new();
        for (key, literal, file) in entries {
            let category = key.split('.').next().unwrap_or_default();
            keys.insert(
                key.to_string(),
                json!({
                    "spanish": literal,
                    "english": "",
                    "category": category,
                    "source_file": file,
                }),
            );
        }
        let inventory = json!({ "metadata": {}, "translation_keys": Value::Object(keys) });
        self.write_file(INVENTORY_FILE, &serde_json::to_string_pretty(&inventory)?)
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn migrate_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("migrate");
        cmd
    }

    pub fn validate_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("validate");
        cmd
    }

    pub fn extract_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("extract");
        cmd
    }

    pub fn init_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("init");
        cmd
    }

    /// Snapshot settings masking the temp project path and backup timestamps.
    pub fn snapshot_settings(&self) -> insta::Settings {
        let mut settings = insta::Settings::clone_current();
        settings.add_filter(
            &regex::escape(&self.project_dir.display().to_string()),
            "[PROJECT]",
        );
        settings.add_filter(r"templates_\d{8}_\d{6}", "templates_[TIMESTAMP]");
        settings
    }

    pub fn run(&self, args: &[&str]) -> Result<Output> {
        let output = self.command().args(args).output()?;
        Ok(output)
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    /// Single entry under `backups/`, the timestamped run directory.
    pub fn backup_dir(&self) -> Result<PathBuf> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(self.project_dir.join("backups"))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        anyhow::ensure!(dirs.len() == 1, "expected one backup dir, found {:?}", dirs);
        Ok(dirs.remove(0))
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
