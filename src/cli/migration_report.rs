//! Markdown migration report.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::core::{
    FileReport, FileState, MigrationSummary, template::key_reference, validate::StructuralError,
};

/// Render the report for one migration run.
pub fn render(
    run: &MigrationSummary,
    inventory_path: &Path,
    generated_at: DateTime<Local>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_to(&mut out, run, inventory_path, generated_at)?;
    Ok(out)
}

fn render_to<W: fmt::Write>(
    out: &mut W,
    run: &MigrationSummary,
    inventory_path: &Path,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    let backup_dir = run
        .backup_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    writeln!(out, "# Template Migration Report\n")?;
    writeln!(out, "**Date:** {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "**Inventory File:** {}", inventory_path.display())?;
    writeln!(out, "**Backup Directory:** {}", backup_dir)?;
    if run.dry_run {
        writeln!(out, "**Mode:** dry run (no files were modified)")?;
    }

    writeln!(out, "\n## Summary\n")?;
    writeln!(out, "- **Total Files Processed:** {}", run.processed())?;
    writeln!(out, "- **Files Migrated:** {}", run.migrated())?;
    writeln!(out, "- **Files Skipped:** {}", run.skipped())?;
    writeln!(out, "- **Files with Errors:** {}", run.errored())?;
    writeln!(out, "- **Total String Replacements:** {}", run.total_replacements())?;
    if run.validation_passed() {
        writeln!(out, "- **Validation:** passed")?;
    } else {
        writeln!(out, "- **Validation:** failed ({} file(s))", run.invalid_files())?;
    }

    writeln!(out, "\n## File Details\n")?;

    let migrated: Vec<_> = run
        .files
        .iter()
        .filter(|f| matches!(f.state, FileState::Written | FileState::DryRun))
        .collect();
    if !migrated.is_empty() {
        writeln!(out, "### Migrated Files ({})\n", migrated.len())?;
        for file in migrated {
            write_migrated_file(out, file)?;
        }
    }

    let skipped: Vec<_> = run
        .files
        .iter()
        .filter(|f| f.state == FileState::Skipped)
        .collect();
    if !skipped.is_empty() {
        writeln!(out, "### Skipped Files ({})\n", skipped.len())?;
        writeln!(out, "No strings to migrate in these files:\n")?;
        for file in skipped {
            writeln!(out, "- {}", file.path)?;
        }
        writeln!(out)?;
    }

    let errored: Vec<_> = run
        .files
        .iter()
        .filter_map(|f| match &f.state {
            FileState::Errored(e) => Some((f.path.as_str(), e.as_str())),
            _ => None,
        })
        .collect();
    if !errored.is_empty() {
        writeln!(out, "### Files with Errors ({})\n", errored.len())?;
        for (path, error) in errored {
            writeln!(out, "- {}: {}", path, error)?;
        }
        writeln!(out)?;
    }

    if let Some(dir) = &run.backup_dir {
        writeln!(out, "## Rollback Instructions\n")?;
        writeln!(out, "Restore every migrated file from the backup directory:\n")?;
        writeln!(out, "```bash\ncp -r {}/* ./\n```", dir.display())?;
    }
    Ok(())
}

fn write_migrated_file<W: fmt::Write>(out: &mut W, file: &FileReport) -> fmt::Result {
    writeln!(out, "#### {}\n", file.path)?;
    writeln!(out, "**Replacements:** {}\n", file.replacements)?;
    writeln!(out, "**Strings Migrated:**\n")?;
    for record in &file.records {
        writeln!(
            out,
            "- `{}` → `{}` ({}x)",
            record.literal,
            key_reference(&record.key),
            record.count
        )?;
    }
    if let Some(validation) = &file.validation
        && !validation.is_ok()
    {
        writeln!(out, "\n**Validation Errors:**\n")?;
        for error in &validation.errors {
            writeln!(out, "- {}", describe(error))?;
        }
    }
    if !file.overlaps.is_empty() {
        writeln!(out, "\n**Ambiguous Overlaps:**\n")?;
        for overlap in &file.overlaps {
            writeln!(
                out,
                "- `{}` / `{}` (first applied: `{}`)",
                overlap.first, overlap.second, overlap.first
            )?;
        }
    }
    writeln!(out)
}

pub(super) fn describe(error: &StructuralError) -> String {
    match error.position() {
        Some((line, col)) => format!("line {}:{}: {}", line, col, error),
        None => error.to_string(),
    }
}

pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write report: {}", path.display()))
}
