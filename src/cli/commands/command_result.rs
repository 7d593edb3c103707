use std::path::PathBuf;

use crate::{core::MigrationSummary, issues::Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Migrate,
    Validate,
    Extract,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Migrate(MigrateSummary),
    Validate(ValidateSummary),
    Extract(ExtractSummary),
    Init(InitSummary),
}

impl CommandSummary {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandSummary::Migrate(_) => CommandKind::Migrate,
            CommandSummary::Validate(_) => CommandKind::Validate,
            CommandSummary::Extract(_) => CommandKind::Extract,
            CommandSummary::Init(_) => CommandKind::Init,
        }
    }
}

#[derive(Debug)]
pub struct MigrateSummary {
    pub run: MigrationSummary,
    /// Markdown report written for this run.
    pub report_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ValidateSummary {
    pub templates_checked: usize,
    pub keys_checked: usize,
    pub locale: String,
    /// Markdown report written for this run.
    pub report_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub strings_found: usize,
    pub keys_written: usize,
    pub output: PathBuf,
    pub categories: Vec<(String, usize)>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running a stachemig command.
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Issues sorted by location.
    pub issues: Vec<Issue>,
}
