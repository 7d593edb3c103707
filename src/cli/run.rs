use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, extract::extract, init::init, migrate::migrate, validate::validate,
    },
};

/// Dispatch to the command handler.
///
/// `Err` means the command could not run at all (config, inventory, output file).
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Migrate(cmd)) => migrate(cmd),
        Some(Command::Validate(cmd)) => validate(cmd),
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
