use anyhow::Result;
use chrono::Local;

use super::super::{args::MigrateCommand, migration_report};
use super::{
    CommandResult, CommandSummary, MigrateSummary, context::ProjectContext, helper::finish,
};
use crate::{
    core::{
        BackupStore, ContextualReplacer, FileSelection, FileState, MigrationDriver,
        MigrationSummary, driver::select_files,
    },
    issues::{AmbiguousOverlapIssue, FileErrorIssue, Issue, StructuralIssue},
};

pub fn migrate(cmd: MigrateCommand) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let inventory_path = ctx.inventory_path(cmd.inventory.as_deref());
    let inventory = ctx.load_inventory(cmd.inventory.as_deref())?;

    let selection = if !cmd.files.is_empty() {
        FileSelection::Named(cmd.files.clone())
    } else if cmd.pilot {
        FileSelection::Pilot(ctx.config.pilot_size)
    } else {
        FileSelection::All
    };
    let files = select_files(&inventory, &ctx.root, &selection);
    tracing::info!(files = files.len(), selection = ?selection, "selected templates");

    let replacer = ContextualReplacer::new(&inventory, &ctx.config.checked_attributes);
    let mut driver = MigrationDriver::new(&inventory, replacer, &ctx.root).dry_run(cmd.dry_run);
    if !cmd.dry_run {
        let backups = BackupStore::timestamped(&ctx.resolve(&ctx.config.backup_root), &ctx.root);
        driver = driver.with_backups(backups);
    }
    let run = driver.run(&files);

    let report_path = if cmd.dry_run || cmd.no_report {
        None
    } else {
        let path = ctx.resolve(&ctx.config.report_path);
        let content = migration_report::render(&run, &inventory_path, Local::now())?;
        migration_report::write_report(&path, &content)?;
        Some(path)
    };

    let issues = collect_issues(&run);
    Ok(finish(
        CommandSummary::Migrate(MigrateSummary { run, report_path }),
        issues,
    ))
}

fn collect_issues(run: &MigrationSummary) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &run.files {
        if let FileState::Errored(error) = &file.state {
            issues.push(Issue::FileError(FileErrorIssue {
                file_path: file.path.clone(),
                error: error.clone(),
            }));
        }

        issues.extend(file.overlaps.iter().map(|overlap| {
            Issue::AmbiguousOverlap(AmbiguousOverlapIssue {
                file_path: file.path.clone(),
                overlap: overlap.clone(),
            })
        }));

        if let (Some(validation), Some(text)) = (&file.validation, &file.migrated_text) {
            issues.extend(
                StructuralIssue::from_errors(&file.path, text, &validation.errors)
                    .into_iter()
                    .map(Issue::Structural),
            );
        }
    }
    issues
}
