use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;

use super::super::args::ExtractCommand;
use super::{
    CommandResult, CommandSummary, ExtractSummary, context::ProjectContext, helper::finish,
};
use crate::core::{
    extract::{TemplateExtractor, build_inventory, scan_templates},
    inventory::save_inventory,
};

/// Scan the template roots and write a fresh inventory.
pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let config = &ctx.config;

    let files = scan_templates(
        &ctx.root,
        &config.template_roots,
        &config.template_extension,
        &config.ignores,
    );
    tracing::info!(files = files.len(), "scanned template roots");

    let extractor = TemplateExtractor::new(&config.checked_attributes, &config.ignore_texts);
    let (inventory, stats) = build_inventory(&ctx.root, &files, &extractor, &config.category_rules);

    let output = match &cmd.output {
        Some(p) => ctx.resolve(p),
        None => ctx.resolve(&config.inventory),
    };
    let metadata = json!({
        "generated_at": Local::now().to_rfc3339(),
        "total_files": stats.files_scanned,
        "total_strings": stats.strings_found,
        "total_keys": inventory.len(),
    });
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    save_inventory(&output, &inventory, metadata)
        .with_context(|| format!("Failed to save inventory: {}", output.display()))?;

    Ok(finish(
        CommandSummary::Extract(ExtractSummary {
            files_scanned: stats.files_scanned,
            strings_found: stats.strings_found,
            keys_written: inventory.len(),
            output,
            categories: inventory.category_summary().into_iter().collect(),
        }),
        Vec::new(),
    ))
}
