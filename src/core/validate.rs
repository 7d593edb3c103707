//! Structural validation of migrated templates.
//!
//! All checks run independently and every finding is collected:
//! delimiter balance, key-reference shape, key existence, and section nesting.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use super::{inventory::KeyLookup, template::LineIndex};

static KEY_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{#__\}\}(.+?)\{\{/__\}\}").unwrap());

static SECTION_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([#/])(\w+)\}\}").unwrap());

/// A structural defect found in a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum StructuralError {
    /// Number of `{{` differs from number of `}}`.
    UnbalancedDelimiters { open: usize, close: usize },
    /// Key reference without a `category.` prefix.
    MalformedKey { key: String, line: usize, col: usize },
    /// Key reference not registered in the inventory.
    UnknownKey { key: String, line: usize, col: usize },
    /// `{{/name}}` with nothing open.
    ClosingWithoutOpening { name: String, line: usize, col: usize },
    /// `{{/name}}` while a different section is innermost.
    MismatchedSection {
        expected: String,
        found: String,
        line: usize,
        col: usize,
    },
    /// Sections still open at end of document, outermost first.
    UnclosedSections { names: Vec<String>, line: usize },
}

impl StructuralError {
    /// 1-based (line, column) the error points at, if any.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            StructuralError::UnbalancedDelimiters { .. } => None,
            StructuralError::MalformedKey { line, col, .. }
            | StructuralError::UnknownKey { line, col, .. }
            | StructuralError::ClosingWithoutOpening { line, col, .. }
            | StructuralError::MismatchedSection { line, col, .. } => Some((*line, *col)),
            StructuralError::UnclosedSections { line, .. } => Some((*line, 1)),
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::UnbalancedDelimiters { open, close } => {
                write!(f, "Unbalanced Mustache tags: {} {{{{ vs {} }}}}", open, close)
            }
            StructuralError::MalformedKey { key, .. } => {
                write!(f, "Invalid i18n key format (missing category): {}", key)
            }
            StructuralError::UnknownKey { key, .. } => write!(f, "Unknown i18n key: {}", key),
            StructuralError::ClosingWithoutOpening { name, .. } => {
                write!(f, "Closing tag without opening: {}", name)
            }
            StructuralError::MismatchedSection {
                expected, found, ..
            } => write!(f, "Mismatched tags: expected {}, got {}", expected, found),
            StructuralError::UnclosedSections { names, .. } => {
                write!(f, "Unclosed sections: {}", names.join(", "))
            }
        }
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: Vec<StructuralError>,
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read-only checker over a key oracle.
pub struct StructuralValidator<'a, K: KeyLookup + ?Sized> {
    keys: &'a K,
}

impl<'a, K: KeyLookup + ?Sized> StructuralValidator<'a, K> {
    pub fn new(keys: &'a K) -> Self {
        Self { keys }
    }

    pub fn validate(&self, text: &str) -> ValidationOutcome {
        let index = LineIndex::new(text);
        let mut errors = Vec::new();

        check_delimiter_balance(text, &mut errors);
        self.check_key_references(text, &index, &mut errors);
        check_section_nesting(text, &index, &mut errors);

        ValidationOutcome { errors }
    }

    fn check_key_references(&self, text: &str, index: &LineIndex, errors: &mut Vec<StructuralError>) {
        for caps in KEY_REFERENCE_REGEX.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let key = m.as_str();
            let (line, col) = index.line_col(text, m.start());

            if !key.contains('.') {
                errors.push(StructuralError::MalformedKey {
                    key: key.to_string(),
                    line,
                    col,
                });
            }
            if !self.keys.contains_key(key) {
                errors.push(StructuralError::UnknownKey {
                    key: key.to_string(),
                    line,
                    col,
                });
            }
        }
    }
}

fn check_delimiter_balance(text: &str, errors: &mut Vec<StructuralError>) {
    let open = text.matches("{{").count();
    let close = text.matches("}}").count();
    if open != close {
        errors.push(StructuralError::UnbalancedDelimiters { open, close });
    }
}

fn check_section_nesting(text: &str, index: &LineIndex, errors: &mut Vec<StructuralError>) {
    let mut stack: Vec<(String, usize)> = Vec::new();

    for caps in SECTION_TAG_REGEX.captures_iter(text) {
        let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str();
        let (line, col) = index.line_col(text, whole.start());

        if kind.as_str() == "#" {
            stack.push((name.to_string(), line));
            continue;
        }

        match stack.last() {
            None => errors.push(StructuralError::ClosingWithoutOpening {
                name: name.to_string(),
                line,
                col,
            }),
            Some((top, _)) if top == name => {
                stack.pop();
            }
            Some((top, _)) => errors.push(StructuralError::MismatchedSection {
                expected: top.clone(),
                found: name.to_string(),
                line,
                col,
            }),
        }
    }

    if let Some((_, first_line)) = stack.first() {
        errors.push(StructuralError::UnclosedSections {
            line: *first_line,
            names: stack.into_iter().map(|(name, _)| name).collect(),
        });
    }
}
