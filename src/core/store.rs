//! Keyed-string store: per-category translation files for one locale.
//!
//! Each category lives in `<lang_root>/<locale>/<category>.php` as a PHP array of
//! `'slug' => 'text',` lines. The migration only needs to know whether a key exists,
//! so the store is mostly an existence oracle.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use super::{inventory::KeyLookup, key::TranslationKey};

static PHP_ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'([^']+)'\s*=>\s*'([^'\\]*(?:\\.[^'\\]*)*)',?").unwrap()
});

/// A category file that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreProblem {
    MissingDirectory { path: PathBuf },
    MissingFile { path: PathBuf },
    InvalidFormat { path: PathBuf },
    Unreadable { path: PathBuf, error: String },
}

impl StoreProblem {
    pub fn path(&self) -> &Path {
        match self {
            StoreProblem::MissingDirectory { path }
            | StoreProblem::MissingFile { path }
            | StoreProblem::InvalidFormat { path }
            | StoreProblem::Unreadable { path, .. } => path,
        }
    }

    pub fn message(&self) -> String {
        match self {
            StoreProblem::MissingDirectory { .. } => "language directory not found".to_string(),
            StoreProblem::MissingFile { .. } => "language file not found".to_string(),
            StoreProblem::InvalidFormat { .. } => "invalid PHP array format".to_string(),
            StoreProblem::Unreadable { error, .. } => format!("cannot read file: {}", error),
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyedStringStore {
    pub locale: String,
    categories: BTreeMap<String, BTreeMap<String, String>>,
    problems: Vec<StoreProblem>,
}

impl KeyedStringStore {
    /// Load every listed category for `locale`.
    ///
    /// Missing or unreadable files are recorded as problems, never returned as errors.
    pub fn load(lang_root: &Path, locale: &str, categories: &[String]) -> Self {
        let mut store = Self {
            locale: locale.to_string(),
            ..Default::default()
        };

        let dir = lang_root.join(locale);
        if !dir.is_dir() {
            store.problems.push(StoreProblem::MissingDirectory { path: dir });
            return store;
        }

        for category in categories {
            let path = dir.join(format!("{}.php", category));
            if !path.exists() {
                store.problems.push(StoreProblem::MissingFile { path });
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => {
                    if !content.contains("return [") && !content.contains("return array(") {
                        store.problems.push(StoreProblem::InvalidFormat { path });
                        continue;
                    }
                    let entries = parse_php_array(&content);
                    tracing::debug!(category = category.as_str(), count = entries.len(), "loaded language file");
                    store.categories.insert(category.clone(), entries);
                }
                Err(e) => store.problems.push(StoreProblem::Unreadable {
                    path,
                    error: e.to_string(),
                }),
            }
        }
        store
    }

    pub fn problems(&self) -> &[StoreProblem] {
        &self.problems
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn translation(&self, key: &TranslationKey) -> Option<&str> {
        self.categories
            .get(key.category())
            .and_then(|entries| entries.get(key.slug()))
            .map(String::as_str)
    }

    /// Slugs defined in more than one category, with the categories, sorted by slug.
    pub fn duplicate_slugs(&self) -> Vec<(String, Vec<String>)> {
        let mut locations: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (category, entries) in &self.categories {
            for slug in entries.keys() {
                locations.entry(slug).or_default().push(category.clone());
            }
        }
        locations
            .into_iter()
            .filter(|(_, cats)| cats.len() > 1)
            .map(|(slug, cats)| (slug.to_string(), cats))
            .collect()
    }
}

impl KeyLookup for KeyedStringStore {
    fn contains_key(&self, key: &str) -> bool {
        TranslationKey::parse(key).is_some_and(|k| self.translation(&k).is_some())
    }
}

/// Extract `'key' => 'value'` pairs from a PHP array literal.
pub fn parse_php_array(content: &str) -> BTreeMap<String, String> {
    PHP_ENTRY_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().replace("\\'", "'").replace("\\\\", "\\");
            Some((key, value))
        })
        .collect()
}
