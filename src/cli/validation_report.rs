//! Markdown validation report.

use std::{collections::BTreeMap, fmt, path::Path};

use chrono::{DateTime, Local};

use super::migration_report::describe;
use crate::issues::{Issue, Report, Severity};

/// Longest list printed per section before the rest is summarized.
const LIST_LIMIT: usize = 20;

/// Everything a validation run found, as fed to the report.
pub struct ValidationRun<'a> {
    pub inventory_path: &'a Path,
    pub locale: &'a str,
    pub total_keys: usize,
    pub templates_checked: usize,
    pub language_files_checked: usize,
    pub issues: &'a [Issue],
}

impl ValidationRun<'_> {
    fn passed(&self) -> bool {
        self.issues
            .iter()
            .all(|i| i.report_severity() != Severity::Error)
    }
}

pub fn render(
    run: &ValidationRun<'_>,
    generated_at: DateTime<Local>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_to(&mut out, run, generated_at)?;
    Ok(out)
}

fn render_to<W: fmt::Write>(
    out: &mut W,
    run: &ValidationRun<'_>,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    let mut missing = Vec::new();
    let mut duplicates = Vec::new();
    let mut invalid: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for issue in run.issues {
        match issue {
            Issue::MissingTranslation(i) => missing.push(i.key.as_str()),
            Issue::DuplicateSlug(i) => duplicates.push(i),
            Issue::Structural(i) => invalid
                .entry(i.file_path.as_str())
                .or_default()
                .push(describe(&i.error)),
            Issue::FileError(i) => errors.push(format!("{}: {}", i.file_path, i.error)),
            Issue::LanguageFile(i) => errors.push(format!("{}: {}", i.file_path, i.error)),
            Issue::MissingTemplate(i) => {
                warnings.push(format!("{}: {}", issue.message(), i.file_path))
            }
            Issue::AmbiguousOverlap(i) => {
                warnings.push(format!("{}: {}", i.file_path, issue.message()))
            }
        }
    }
    let valid_templates = run.templates_checked.saturating_sub(invalid.len());
    let status = if run.passed() { "PASSED" } else { "FAILED" };

    writeln!(out, "# i18n Validation Report\n")?;
    writeln!(out, "**Date:** {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "**Inventory:** {}", run.inventory_path.display())?;
    writeln!(out, "**Locale:** {}", run.locale)?;

    writeln!(out, "\n## Summary\n")?;
    writeln!(out, "### Overall Status: {}\n", status)?;
    writeln!(out, "**Statistics:**")?;
    writeln!(out, "- Total Translation Keys: {}", run.total_keys)?;
    writeln!(out, "- Missing Keys: {}", missing.len())?;
    writeln!(out, "- Duplicate Keys: {}", duplicates.len())?;
    writeln!(out, "- Valid Templates: {}", valid_templates)?;
    writeln!(out, "- Invalid Templates: {}", invalid.len())?;
    writeln!(out, "- Language Files Checked: {}", run.language_files_checked)?;

    writeln!(out, "\n---\n\n## Validation Results\n")?;

    writeln!(out, "### Translation Keys ({} total)\n", run.total_keys)?;
    if missing.is_empty() {
        writeln!(out, "**Status:** PASSED - All keys present")?;
    } else {
        writeln!(out, "**Status:** FAILED - {} missing keys\n", missing.len())?;
        writeln!(out, "**Missing Keys:**")?;
        for key in missing.iter().take(LIST_LIMIT) {
            writeln!(out, "- `{}`", key)?;
        }
        write_remainder(out, missing.len())?;
    }

    writeln!(out, "\n---\n\n### Duplicate Keys\n")?;
    if duplicates.is_empty() {
        writeln!(out, "**Status:** PASSED - No duplicate keys")?;
    } else {
        writeln!(
            out,
            "**Status:** WARNING - {} duplicate keys found\n",
            duplicates.len()
        )?;
        writeln!(out, "**Duplicates:**")?;
        for dup in duplicates.iter().take(LIST_LIMIT) {
            writeln!(out, "- `{}` in: {}", dup.slug, dup.categories.join(", "))?;
        }
        write_remainder(out, duplicates.len())?;
    }

    writeln!(out, "\n---\n\n### Template Syntax\n")?;
    if invalid.is_empty() {
        writeln!(
            out,
            "**Status:** PASSED - All {} templates valid",
            valid_templates
        )?;
    } else {
        writeln!(
            out,
            "**Status:** FAILED - {} templates with errors\n",
            invalid.len()
        )?;
        for (template, descriptions) in &invalid {
            writeln!(out, "**{}:**", template)?;
            for description in descriptions {
                writeln!(out, "- {}", description)?;
            }
            writeln!(out)?;
        }
    }
    writeln!(out, "\n---\n")?;

    write_list(out, "## Errors", &errors)?;
    write_list(out, "## Warnings", &warnings)?;

    writeln!(out, "## Next Steps\n")?;
    if run.passed() {
        writeln!(out, "1. Switch languages in the running application and check every migrated view")?;
        writeln!(out, "2. Verify forms, dialogs and alerts display the translated strings")?;
    } else {
        writeln!(out, "1. Fix the errors listed above")?;
        writeln!(out, "2. Re-run validation")?;
    }
    if !warnings.is_empty() {
        writeln!(out, "\nReview {} warning(s) before deployment.", warnings.len())?;
    }
    Ok(())
}

fn write_remainder<W: fmt::Write>(out: &mut W, total: usize) -> fmt::Result {
    if total > LIST_LIMIT {
        writeln!(out, "\n... and {} more", total - LIST_LIMIT)?;
    }
    Ok(())
}

fn write_list<W: fmt::Write>(out: &mut W, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}\n", heading)?;
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out, "\n---\n")
}
