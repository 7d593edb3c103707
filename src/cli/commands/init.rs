use std::fs;

use anyhow::{Context, Result};

use super::super::args::InitCommand;
use super::{CommandResult, CommandSummary, InitSummary, context::ProjectContext, helper::finish};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write the default `.stachemig.json` into the project root.
///
/// An existing file is left untouched and reported as an error.
pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    let root = cmd.common.root.clone().unwrap_or_else(|| ".".into());
    let ctx = ProjectContext {
        root,
        config: Default::default(),
        verbose: cmd.common.verbose,
    };
    let config_path = ctx.resolve(CONFIG_FILE_NAME);

    let summary = if config_path.exists() {
        InitSummary {
            created: false,
            error: Some(format!("{} already exists", CONFIG_FILE_NAME)),
        }
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "wrote default config");
        InitSummary {
            created: true,
            error: None,
        }
    };

    Ok(finish(CommandSummary::Init(summary), Vec::new()))
}
