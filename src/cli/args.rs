//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `migrate`: Replace inventory literals in templates with key references
//! - `validate`: Check template structure and key coverage in the language files
//! - `extract`: Scan templates and write a fresh inventory
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Migrate(cmd)) => cmd.common.verbose,
            Some(Command::Validate(cmd)) => cmd.common.verbose,
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Init(cmd)) => cmd.common.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root; config lookup starts here and relative paths resolve against it
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct MigrateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Compute replacements and validate without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Only migrate the files with the most inventory strings
    #[arg(long, conflicts_with = "files")]
    pub pilot: bool,

    /// Migrate only these files (relative to the project root)
    #[arg(long, num_args = 1..)]
    pub files: Vec<String>,

    /// Inventory file (overrides config file)
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Skip writing the markdown migration report
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Validate only these files (relative to the project root)
    #[arg(long, num_args = 1..)]
    pub files: Vec<String>,

    /// Inventory file (overrides config file)
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Locale whose language files must cover every key (overrides config file)
    #[arg(long)]
    pub locale: Option<String>,

    /// Skip writing the markdown validation report
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Where to write the inventory (defaults to the configured inventory path)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace hardcoded template strings with translation key references
    Migrate(MigrateCommand),
    /// Validate template structure and translation coverage
    Validate(ValidateCommand),
    /// Extract translatable strings into an inventory file
    Extract(ExtractCommand),
    /// Initialize a new .stachemig.json configuration file
    Init(InitCommand),
}
