use std::fs;

use anyhow::Result;
use chrono::Local;

use super::super::{
    args::ValidateCommand,
    migration_report::write_report,
    validation_report::{self, ValidationRun},
};
use super::{
    CommandResult, CommandSummary, ValidateSummary, context::ProjectContext, helper::finish,
};
use crate::{
    core::{
        FileSelection, KeyedStringStore, StringInventory, StructuralValidator,
        driver::{missing_files, select_files},
        inventory::KeyLookup,
        store::StoreProblem,
    },
    issues::{
        DuplicateSlugIssue, FileErrorIssue, Issue, LanguageFileIssue, MissingTemplateIssue,
        MissingTranslationIssue, StructuralIssue,
    },
};

/// Validate templates against the inventory and the inventory against the language files.
pub fn validate(cmd: ValidateCommand) -> Result<CommandResult> {
    let ctx = ProjectContext::new(&cmd.common)?;
    let inventory = ctx.load_inventory(cmd.inventory.as_deref())?;
    let locale = cmd.locale.clone().unwrap_or_else(|| ctx.config.locale.clone());

    let selection = if cmd.files.is_empty() {
        FileSelection::All
    } else {
        FileSelection::Named(cmd.files.clone())
    };
    let files = select_files(&inventory, &ctx.root, &selection);

    let mut issues = Vec::new();
    if selection == FileSelection::All {
        issues.extend(
            missing_files(&inventory, &ctx.root)
                .into_iter()
                .map(|file_path| Issue::MissingTemplate(MissingTemplateIssue { file_path })),
        );
    }
    let mut templates_checked = 0;
    let validator = StructuralValidator::new(&inventory);
    for file in &files {
        let text = match fs::read_to_string(ctx.root.join(file)) {
            Ok(text) => text,
            Err(e) => {
                issues.push(Issue::FileError(FileErrorIssue {
                    file_path: file.clone(),
                    error: format!("Failed to read file: {}", e),
                }));
                continue;
            }
        };
        templates_checked += 1;
        let outcome = validator.validate(&text);
        tracing::debug!(file = file.as_str(), errors = outcome.errors.len(), "validated template");
        issues.extend(
            StructuralIssue::from_errors(file, &text, &outcome.errors)
                .into_iter()
                .map(Issue::Structural),
        );
    }

    let lang_root = ctx.resolve(&ctx.config.lang_root);
    let store = KeyedStringStore::load(&lang_root, &locale, &ctx.config.categories);
    issues.extend(store_issues(&store, &lang_root.join(&locale).display().to_string()));
    issues.extend(missing_translations(
        &inventory,
        &store,
        &ctx.config.categories,
    ));
    issues.sort();

    let report_path = if cmd.no_report {
        None
    } else {
        let inventory_path = ctx.inventory_path(cmd.inventory.as_deref());
        let run = ValidationRun {
            inventory_path: &inventory_path,
            locale: &locale,
            total_keys: inventory.len(),
            templates_checked,
            language_files_checked: store.category_count(),
            issues: &issues,
        };
        let path = ctx.resolve(&ctx.config.validation_report_path);
        write_report(&path, &validation_report::render(&run, Local::now())?)?;
        Some(path)
    };

    Ok(finish(
        CommandSummary::Validate(ValidateSummary {
            templates_checked,
            keys_checked: inventory.len(),
            locale,
            report_path,
        }),
        issues,
    ))
}

fn store_issues(store: &KeyedStringStore, locale_dir: &str) -> Vec<Issue> {
    let problems = store.problems().iter().map(|problem| {
        Issue::LanguageFile(LanguageFileIssue {
            file_path: problem.path().display().to_string(),
            error: problem.message(),
        })
    });
    let duplicates = store.duplicate_slugs().into_iter().map(|(slug, categories)| {
        Issue::DuplicateSlug(DuplicateSlugIssue {
            slug,
            categories,
            locale_dir: locale_dir.to_string(),
        })
    });
    problems.chain(duplicates).collect()
}

/// Keys whose category loaded but whose slug is absent, plus keys in categories the
/// store does not know about at all. Categories whose file failed to load are already
/// reported as language-file problems.
fn missing_translations(
    inventory: &StringInventory,
    store: &KeyedStringStore,
    configured: &[String],
) -> Vec<Issue> {
    if store
        .problems()
        .iter()
        .any(|p| matches!(p, StoreProblem::MissingDirectory { .. }))
    {
        return Vec::new();
    }

    inventory
        .entries()
        .filter(|entry| {
            let category = entry.category();
            store.has_category(category) || !configured.iter().any(|c| c == category)
        })
        .filter(|entry| !store.contains_key(&entry.key.to_string()))
        .map(|entry| {
            Issue::MissingTranslation(MissingTranslationIssue {
                key: entry.key.to_string(),
                locale: store.locale.clone(),
                source_file: entry.provenance.source_file.clone(),
            })
        })
        .collect()
}
