//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; each command then prints its own summary block.
//! Separate from core logic so the engine can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, MigrateSummary, ValidateSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_problem_count(&sorted, writer);
}

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    report_to(&result.issues, writer);

    match &result.summary {
        CommandSummary::Migrate(summary) => print_migrate(summary, writer),
        CommandSummary::Validate(summary) => print_validate(summary, result, writer),
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path,
                ctx.line,
                ctx.col
            );
            let caret_char = match severity {
                Severity::Error => "^".red(),
                Severity::Warning => "^".yellow(),
            };
            let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width);
            let _ = writeln!(
                writer,
                "{:>width$} {} {}",
                ctx.line.to_string().blue(),
                "|".blue(),
                ctx.source_line,
                width = max_line_width
            );

            // col is 1-based and counted in chars; pad by display width
            let prefix: String = ctx.source_line.chars().take(ctx.col.saturating_sub(1)).collect();
            let caret_padding = UnicodeWidthStr::width(prefix.as_str());
            let _ = writeln!(
                writer,
                "{:>width$} {} {:>padding$}{}",
                "",
                "|".blue(),
                "",
                caret_char,
                width = max_line_width,
                padding = caret_padding
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_problem_count<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})\n",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

fn print_migrate<W: Write>(summary: &MigrateSummary, writer: &mut W) {
    let run = &summary.run;
    let title = if run.dry_run {
        "Migration summary (dry run)"
    } else {
        "Migration summary"
    };
    let _ = writeln!(writer, "{}", title.bold());
    let _ = writeln!(writer, "  Files processed:     {}", run.processed());
    let _ = writeln!(writer, "  Files migrated:      {}", run.migrated());
    let _ = writeln!(writer, "  Files skipped:       {}", run.skipped());
    let _ = writeln!(writer, "  Files with errors:   {}", run.errored());
    let _ = writeln!(writer, "  Total replacements:  {}", run.total_replacements());

    if run.validation_passed() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "Validation passed".green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "Validation failed in {}",
                plural(run.invalid_files(), "file", "files")
            )
            .red()
        );
    }

    if run.dry_run {
        let _ = writeln!(
            writer,
            "{} no files were modified",
            "Dry run:".yellow().bold()
        );
    } else if let Some(dir) = &run.backup_dir {
        let _ = writeln!(writer, "Backups saved to: {}", dir.display());
    }
    if let Some(path) = &summary.report_path {
        let _ = writeln!(writer, "Report written to: {}", path.display());
    }
}

fn print_validate<W: Write>(summary: &ValidateSummary, result: &CommandResult, writer: &mut W) {
    let checked = format!(
        "Checked {} against {} (locale '{}')",
        plural(summary.templates_checked, "template", "templates"),
        plural(summary.keys_checked, "key", "keys"),
        summary.locale
    );
    if result.error_count == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{} - no errors found", checked).green()
        );
    } else {
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), checked);
    }
    if let Some(path) = &summary.report_path {
        let _ = writeln!(writer, "Report written to: {}", path.display());
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} ({}) from {} into {}",
            plural(summary.keys_written, "key", "keys"),
            plural(summary.strings_found, "occurrence", "occurrences"),
            plural(summary.files_scanned, "file", "files"),
            summary.output.display()
        )
        .green()
    );
    for (category, count) in &summary.categories {
        let _ = writeln!(writer, "  {:<16} {}", category, count);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else if let Some(error) = &summary.error {
        let _ = writeln!(writer, "{} {}", "error:".bold().red(), error);
    }
}

// ============================================================
// Tests
// ============================================================
