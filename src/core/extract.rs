//! Literal extraction and inventory construction.
//!
//! Scans template files for candidate literals in tag content and attribute values,
//! classifies each by file path, and feeds them to [`InventoryBuilder`] in a fully
//! sorted order so generated keys (and their collision suffixes) are reproducible.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fs,
    path::Path,
    sync::LazyLock,
};

use glob::Pattern;
use regex::Regex;
use walkdir::WalkDir;

use super::inventory::{ContextKind, InventoryBuilder, LiteralString, Provenance, StringInventory};
use crate::{
    config::CategoryRule,
    utils::{contains_alphabetic, relative_slash_path},
};

/// Category for literals no rule claims.
pub const FALLBACK_CATEGORY: &str = "uncategorized";

static CONTENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([^<>{}\n]+)<").unwrap());

static DATA_ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)data-[a-z-]+=(?:"([^"{}]*)"|'([^'{}]*)')"#).unwrap()
});

const IGNORE_WORDS: &[&str] = &[
    "id", "class", "div", "span", "href", "src", "type", "name", "true", "false", "null",
    "undefined", "var", "function", "return", "if", "else", "for", "while", "px", "em", "rem",
    "auto", "none", "block", "inline",
];

/// True when `text` looks like human-facing prose worth translating.
pub fn is_translatable(text: &str, ignore_texts: &HashSet<String>) -> bool {
    let text = text.trim();
    if text.chars().count() < 2 || !contains_alphabetic(text) {
        return false;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if IGNORE_WORDS.contains(&text.to_lowercase().as_str()) || ignore_texts.contains(text) {
        return false;
    }
    if text.starts_with("{{") || text.starts_with("{#") || text.starts_with("{/") {
        return false;
    }
    !(text.contains("http://") || text.contains("https://"))
}

/// Literal candidates found in one template.
pub struct TemplateExtractor {
    attribute_regex: Option<Regex>,
    ignore_texts: HashSet<String>,
}

impl TemplateExtractor {
    pub fn new<S: AsRef<str>>(attributes: &[S], ignore_texts: &[String]) -> Self {
        let names = attributes
            .iter()
            .map(|a| regex::escape(a.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let attribute_regex = (!names.is_empty())
            .then(|| {
                Regex::new(&format!(
                    r#"(?:^|\s)({})=(?:"([^"{{}}]*)"|'([^'{{}}]*)')"#,
                    names
                ))
                .ok()
            })
            .flatten();
        Self {
            attribute_regex,
            ignore_texts: ignore_texts.iter().cloned().collect(),
        }
    }

    /// Sorted, de-duplicated `(text, source_label)` pairs.
    pub fn extract(&self, content: &str) -> Vec<(String, String)> {
        let mut found: BTreeSet<(String, String)> = BTreeSet::new();

        for caps in CONTENT_REGEX.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                self.keep(&mut found, m.as_str(), "html_content");
            }
        }

        if let Some(re) = &self.attribute_regex {
            for caps in re.captures_iter(content) {
                let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3)))
                else {
                    continue;
                };
                self.keep(&mut found, value.as_str(), name.as_str());
            }
        }

        for caps in DATA_ATTRIBUTE_REGEX.captures_iter(content) {
            if let Some(value) = caps.get(1).or_else(|| caps.get(2)) {
                self.keep(&mut found, value.as_str(), "data_attr");
            }
        }

        found.into_iter().collect()
    }

    fn keep(&self, found: &mut BTreeSet<(String, String)>, raw: &str, label: &str) {
        let text = raw.trim();
        if is_translatable(text, &self.ignore_texts) {
            found.insert((text.to_string(), label.to_string()));
        }
    }
}

/// First rule whose fragment occurs in the path wins.
pub fn classify(relative_path: &str, rules: &[CategoryRule]) -> String {
    rules
        .iter()
        .find(|rule| relative_path.contains(&rule.path_contains))
        .map(|rule| rule.category.clone())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

/// Template files under `template_roots`, relative to `root`, sorted.
pub fn scan_templates(
    root: &Path,
    template_roots: &[String],
    extension: &str,
    ignores: &[String],
) -> Vec<String> {
    let patterns: Vec<Pattern> = ignores
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = p.as_str(), error = %e, "invalid ignore pattern");
                None
            }
        })
        .collect();

    let mut files = BTreeSet::new();
    for dir in template_roots {
        let base = root.join(dir);
        if !base.exists() {
            tracing::debug!(dir = %base.display(), "template root does not exist");
            continue;
        }
        for entry in WalkDir::new(&base) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(extension)
            {
                continue;
            }
            let relative = relative_slash_path(path, root);
            if patterns.iter().any(|p| p.matches(&relative)) {
                continue;
            }
            files.insert(relative);
        }
    }
    files.into_iter().collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub files_scanned: usize,
    pub files_unreadable: usize,
    /// Literal occurrences before merging (one per file, text and source).
    pub strings_found: usize,
}

/// Extract literals from `files` and assign keys.
///
/// The same text in the same category is registered once, with every context and
/// every file it was seen in; the first file (by path) is the primary source.
pub fn build_inventory(
    root: &Path,
    files: &[String],
    extractor: &TemplateExtractor,
    rules: &[CategoryRule],
) -> (StringInventory, ExtractionStats) {
    struct Pending {
        file: String,
        source: String,
        contexts: BTreeSet<ContextKind>,
        files: BTreeSet<String>,
    }

    let mut stats = ExtractionStats::default();
    let mut pending: BTreeMap<(String, String), Pending> = BTreeMap::new();

    let mut sorted: Vec<&String> = files.iter().collect();
    sorted.sort();

    for file in sorted {
        let content = match fs::read_to_string(root.join(file)) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = file.as_str(), error = %e, "cannot read template");
                stats.files_unreadable += 1;
                continue;
            }
        };
        stats.files_scanned += 1;

        let category = classify(file, rules);
        let found = extractor.extract(&content);
        tracing::debug!(file = file.as_str(), category = category.as_str(), strings = found.len(), "extracted");
        stats.strings_found += found.len();

        for (text, source) in found {
            let context = ContextKind::from_source_label(&source);
            let p = pending
                .entry((category.clone(), text))
                .or_insert_with(|| Pending {
                    file: file.clone(),
                    source,
                    contexts: BTreeSet::new(),
                    files: BTreeSet::new(),
                });
            p.contexts.insert(context);
            p.files.insert(file.clone());
        }
    }

    let mut builder = InventoryBuilder::new();
    for ((category, text), p) in pending {
        builder.register(
            LiteralString::new(text, p.contexts),
            &category,
            Provenance::new(p.file, p.source).with_files(p.files),
        );
    }
    (builder.build(), stats)
}
