//! The string inventory: authoritative literal → key mapping for one run.
//!
//! An inventory is assembled through [`InventoryBuilder`], either from a freshly
//! extracted set of literals (keys are generated) or from an inventory file on disk
//! (keys are taken as recorded). Once built it is immutable and shared by reference.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::key::{TranslationKey, generate_key};

/// Syntactic context a literal was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextKind {
    /// Between a closing `>` and an opening `<`.
    Content,
    /// Full value of a human-facing attribute.
    AttributeValue,
    /// Plain text outside any expression region.
    ExpressionLeaf,
}

impl ContextKind {
    /// Map an extraction source label (`html_content`, `placeholder`, ...) to a context.
    pub fn from_source_label(label: &str) -> Self {
        match label {
            "html_content" | "content" => ContextKind::Content,
            "expression_leaf" | "text" => ContextKind::ExpressionLeaf,
            _ => ContextKind::AttributeValue,
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Content => write!(f, "content"),
            ContextKind::AttributeValue => write!(f, "attribute"),
            ContextKind::ExpressionLeaf => write!(f, "text"),
        }
    }
}

/// A natural-language fragment exactly as it appears in template markup.
///
/// The text is kept verbatim; trimming belongs to extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralString {
    text: String,
    contexts: BTreeSet<ContextKind>,
}

impl LiteralString {
    pub fn new(text: impl Into<String>, contexts: impl IntoIterator<Item = ContextKind>) -> Self {
        Self {
            text: text.into(),
            contexts: contexts.into_iter().collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn contexts(&self) -> &BTreeSet<ContextKind> {
        &self.contexts
    }
}

/// Where an inventory entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// First template (by path) the literal was seen in, relative to the project root.
    pub source_file: String,
    /// Raw extraction label (`html_content`, `placeholder`, `data_attr`, ...).
    pub source: String,
    pub context: ContextKind,
    /// Every template the literal was seen in, `source_file` included.
    pub files: BTreeSet<String>,
}

impl Provenance {
    pub fn new(source_file: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let source_file = source_file.into();
        let context = ContextKind::from_source_label(&source);
        let files = (!source_file.is_empty())
            .then(|| source_file.clone())
            .into_iter()
            .collect();
        Self {
            source_file,
            source,
            context,
            files,
        }
    }

    /// Add further templates the same literal occurs in.
    pub fn with_files(mut self, files: impl IntoIterator<Item = String>) -> Self {
        self.files.extend(files.into_iter().filter(|f| !f.is_empty()));
        self
    }
}

/// One literal bound to exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub key: TranslationKey,
    pub literal: LiteralString,
    pub provenance: Provenance,
}

impl InventoryEntry {
    pub fn category(&self) -> &str {
        self.key.category()
    }
}

/// Existence oracle for `category.slug` key references.
pub trait KeyLookup {
    fn contains_key(&self, key: &str) -> bool;
}

/// Fatal inventory failures. Any of these aborts a run before templates are touched.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read inventory file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed key in inventory: \"{key}\" (expected category.slug)")]
    MalformedKey { key: String },

    #[error("Failed to serialize inventory: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write inventory file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable literal → key mapping.
#[derive(Debug, Default)]
pub struct StringInventory {
    entries: BTreeMap<String, InventoryEntry>,
    by_literal: BTreeMap<String, String>,
}

impl StringInventory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&InventoryEntry> {
        self.entries.get(key)
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    /// Entries that own their literal, longest literal first.
    ///
    /// Ties are broken by literal text so the order never depends on map iteration.
    pub fn substitution_order(&self) -> Vec<&InventoryEntry> {
        let mut ordered: Vec<&InventoryEntry> = self
            .by_literal
            .values()
            .filter_map(|key| self.entries.get(key))
            .collect();
        ordered.sort_by(|a, b| {
            b.literal
                .len()
                .cmp(&a.literal.len())
                .then_with(|| a.literal.text().cmp(b.literal.text()))
        });
        ordered
    }

    /// Distinct templates any entry was seen in, sorted by path.
    pub fn source_files(&self) -> Vec<String> {
        self.entries
            .values()
            .flat_map(|e| e.provenance.files.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Source files with the number of entries extracted from each.
    ///
    /// Sorted by descending count, then by path.
    pub fn files_by_literal_count(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in self.entries.values() {
            for file in &entry.provenance.files {
                *counts.entry(file.as_str()).or_default() += 1;
            }
        }
        let mut files: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(f, c)| (f.to_string(), c))
            .collect();
        files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        files
    }

    /// Entry counts per category, sorted by category.
    pub fn category_summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for entry in self.entries.values() {
            *summary.entry(entry.category().to_string()).or_default() += 1;
        }
        summary
    }
}

impl KeyLookup for StringInventory {
    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Accumulates entries and enforces key uniqueness.
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    entries: BTreeMap<String, InventoryEntry>,
    next_index: usize,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a key for `literal` and register it.
    ///
    /// When the candidate key is taken, `_1`, `_2`, ... is appended to the slug until
    /// it is free. The category is never altered. Returns the key actually assigned.
    pub fn register(
        &mut self,
        literal: LiteralString,
        category: &str,
        provenance: Provenance,
    ) -> TranslationKey {
        let candidate = generate_key(literal.text(), category, self.next_index);
        self.next_index += 1;

        let mut key = candidate.clone();
        let mut counter = 1;
        while self.entries.contains_key(&key.to_string()) {
            key = candidate.with_suffix(counter);
            counter += 1;
        }

        self.entries.insert(
            key.to_string(),
            InventoryEntry {
                key: key.clone(),
                literal,
                provenance,
            },
        );
        key
    }

    /// Insert an entry with a pre-assigned key, replacing any entry under the same key.
    pub fn insert(&mut self, entry: InventoryEntry) {
        self.next_index += 1;
        self.entries.insert(entry.key.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the inventory.
    ///
    /// When several keys carry the same literal, the smallest key owns it for
    /// substitution; the others stay registered and still resolve as references.
    pub fn build(self) -> StringInventory {
        let mut by_literal: BTreeMap<String, String> = BTreeMap::new();
        for (key, entry) in &self.entries {
            if entry.literal.is_empty() {
                continue;
            }
            match by_literal.get(entry.literal.text()) {
                Some(owner) => {
                    tracing::warn!(
                        literal = entry.literal.text(),
                        owner = owner.as_str(),
                        shadowed = key.as_str(),
                        "literal registered under several keys"
                    );
                }
                None => {
                    by_literal.insert(entry.literal.text().to_string(), key.clone());
                }
            }
        }
        StringInventory {
            entries: self.entries,
            by_literal,
        }
    }
}

// ============================================================
// Inventory file (JSON)
// ============================================================

/// On-disk record for one key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryRecord {
    #[serde(alias = "literal")]
    pub spanish: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub source_file: String,
    /// All templates containing the literal; only written when there is more than one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The inventory document. Keys are always written sorted; `metadata` keeps its own
/// field order.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InventoryFile {
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub translation_keys: BTreeMap<String, InventoryRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_summary: BTreeMap<String, usize>,
}

/// Load an inventory file.
///
/// Records with a blank literal are ignored; other literals are taken verbatim. A
/// record whose `category` disagrees with its key keeps the key's category.
pub fn load_inventory(path: &Path) -> Result<StringInventory, InventoryError> {
    let content = fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_inventory(&content).map_err(|err| match err {
        InventoryError::Parse { source, .. } => InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse inventory JSON. Parse errors carry an empty path.
pub fn parse_inventory(content: &str) -> Result<StringInventory, InventoryError> {
    let file: InventoryFile =
        serde_json::from_str(content).map_err(|source| InventoryError::Parse {
            path: PathBuf::new(),
            source,
        })?;

    let mut builder = InventoryBuilder::new();
    for (raw_key, record) in file.translation_keys {
        let key = TranslationKey::parse(&raw_key)
            .ok_or_else(|| InventoryError::MalformedKey { key: raw_key.clone() })?;

        if record.spanish.trim().is_empty() {
            tracing::debug!(key = raw_key.as_str(), "skipping record with empty literal");
            continue;
        }
        if !record.category.is_empty() && record.category != key.category() {
            tracing::warn!(
                key = raw_key.as_str(),
                category = record.category.as_str(),
                "record category differs from key category"
            );
        }

        let source = record.source.unwrap_or_else(|| "html_content".to_string());
        let provenance = Provenance::new(record.source_file, source).with_files(record.source_files);
        let literal = LiteralString::new(record.spanish, [provenance.context]);
        builder.insert(InventoryEntry {
            key,
            literal,
            provenance,
        });
    }
    Ok(builder.build())
}

/// Serialize an inventory with run metadata.
pub fn inventory_to_json(
    inventory: &StringInventory,
    metadata: serde_json::Value,
) -> serde_json::Result<String> {
    let translation_keys = inventory
        .entries()
        .map(|entry| {
            (
                entry.key.to_string(),
                InventoryRecord {
                    spanish: entry.literal.text().to_string(),
                    english: String::new(),
                    category: entry.category().to_string(),
                    source_file: entry.provenance.source_file.clone(),
                    source_files: if entry.provenance.files.len() > 1 {
                        entry.provenance.files.iter().cloned().collect()
                    } else {
                        Vec::new()
                    },
                    source: Some(entry.provenance.source.clone()),
                },
            )
        })
        .collect();

    let file = InventoryFile {
        metadata,
        translation_keys,
        category_summary: inventory.category_summary(),
    };
    serde_json::to_string_pretty(&file)
}

pub fn save_inventory(
    path: &Path,
    inventory: &StringInventory,
    metadata: serde_json::Value,
) -> Result<(), InventoryError> {
    let json = inventory_to_json(inventory, metadata).map_err(InventoryError::Serialize)?;
    fs::write(path, json).map_err(|source| InventoryError::Write {
        path: path.to_path_buf(),
        source,
    })
}
