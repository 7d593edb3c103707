//! Contextual replacement of literals with key references.
//!
//! Literals are processed longest first. For each literal still present in the
//! document, three context rules run in fixed order and every rule that matches is
//! applied:
//!
//! 1. tag content: `>literal<`
//! 2. attribute value: `placeholder="literal"` (and the other checked attributes)
//! 3. expression leaf: `literal` anywhere in plain text outside `{{...}}` regions
//!
//! A match is only accepted when the literal's own byte range sits inside a text
//! segment (see [`template::segments`](super::template::segments)), so nothing inside
//! an expression or an existing key reference is ever rewritten. That also makes the
//! operation idempotent: a substituted literal lives inside a key reference afterwards.

use std::collections::BTreeSet;

use regex::Regex;

use super::{
    inventory::{ContextKind, InventoryEntry, StringInventory},
    key::TranslationKey,
    template::{SegmentKind, in_text, key_reference, segments},
};

/// Attributes whose full value is treated as human-facing text.
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    "placeholder",
    "title",
    "value",
    "alt",
    "aria-label",
    "data-confirm",
];

/// One literal substituted in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRecord {
    pub literal: String,
    pub key: TranslationKey,
    pub count: usize,
    pub contexts: BTreeSet<ContextKind>,
}

/// Two distinct literals of equal length whose occurrences overlap in the document.
///
/// Longest-first ordering cannot decide between them; the first in lexicographic
/// order wins and the pair is surfaced for review.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AmbiguousOverlap {
    pub first: String,
    pub second: String,
}

/// Output of [`ContextualReplacer::replace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub total: usize,
    pub records: Vec<ReplacementRecord>,
    pub overlaps: Vec<AmbiguousOverlap>,
}

pub struct ContextualReplacer<'a> {
    inventory: &'a StringInventory,
    attribute_pattern: String,
}

impl<'a> ContextualReplacer<'a> {
    pub fn new<S: AsRef<str>>(inventory: &'a StringInventory, attributes: &[S]) -> Self {
        let attribute_pattern = attributes
            .iter()
            .map(|a| regex::escape(a.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            inventory,
            attribute_pattern,
        }
    }

    /// Replacer using [`DEFAULT_ATTRIBUTES`].
    pub fn with_default_attributes(inventory: &'a StringInventory) -> Self {
        Self::new(inventory, DEFAULT_ATTRIBUTES)
    }

    /// Substitute every registered literal in `document`.
    pub fn replace(&self, document: &str) -> Replacement {
        let candidates: Vec<&InventoryEntry> = self
            .inventory
            .substitution_order()
            .into_iter()
            .filter(|entry| document.contains(entry.literal.text()))
            .collect();

        let overlaps = find_overlaps(document, &candidates);
        for overlap in &overlaps {
            tracing::warn!(
                first = overlap.first.as_str(),
                second = overlap.second.as_str(),
                "equal-length literals overlap"
            );
        }

        let mut text = document.to_string();
        let mut total = 0;
        let mut records = Vec::new();

        for entry in candidates {
            let literal = entry.literal.text();
            if !text.contains(literal) {
                continue;
            }

            let wrapped = key_reference(&entry.key);
            let mut count = 0;
            let mut contexts = BTreeSet::new();

            for context in [
                ContextKind::Content,
                ContextKind::AttributeValue,
                ContextKind::ExpressionLeaf,
            ] {
                let ranges = self.find_in_context(&text, literal, context);
                if ranges.is_empty() {
                    continue;
                }
                count += ranges.len();
                contexts.insert(context);
                text = splice(&text, &ranges, &wrapped);
            }

            if count > 0 {
                tracing::debug!(literal, key = %entry.key, count, "replaced literal");
                total += count;
                records.push(ReplacementRecord {
                    literal: literal.to_string(),
                    key: entry.key.clone(),
                    count,
                    contexts,
                });
            }
        }

        Replacement {
            text,
            total,
            records,
            overlaps,
        }
    }

    /// Byte ranges of `literal` matched by one context rule, outside protected regions.
    fn find_in_context(&self, text: &str, literal: &str, context: ContextKind) -> Vec<(usize, usize)> {
        let segs = segments(text);
        let escaped = regex::escape(literal);

        let ranges: Vec<(usize, usize)> = match context {
            ContextKind::Content => {
                let Ok(re) = Regex::new(&format!(">({})<", escaped)) else {
                    return Vec::new();
                };
                re.captures_iter(text)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| (m.start(), m.end()))
                    .collect()
            }
            ContextKind::AttributeValue => {
                if self.attribute_pattern.is_empty() {
                    return Vec::new();
                }
                let pattern = format!(
                    r#"(?:^|\s)(?:{})=(?:"({})"|'({})')"#,
                    self.attribute_pattern, escaped, escaped
                );
                let Ok(re) = Regex::new(&pattern) else {
                    return Vec::new();
                };
                re.captures_iter(text)
                    .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                    .map(|m| (m.start(), m.end()))
                    .collect()
            }
            ContextKind::ExpressionLeaf => segs
                .iter()
                .filter(|s| s.kind == SegmentKind::Text)
                .flat_map(|s| {
                    s.as_str(text)
                        .match_indices(literal)
                        .map(move |(i, m)| (s.start + i, s.start + i + m.len()))
                })
                .collect(),
        };

        ranges
            .into_iter()
            .filter(|&(start, end)| in_text(&segs, start, end))
            .collect()
    }
}

/// Replace each (sorted, non-overlapping) range with `replacement`.
fn splice(text: &str, ranges: &[(usize, usize)], replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * replacement.len());
    let mut cursor = 0;
    for &(start, end) in ranges {
        out.push_str(&text[cursor..start]);
        out.push_str(replacement);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn find_overlaps(document: &str, candidates: &[&InventoryEntry]) -> Vec<AmbiguousOverlap> {
    let occurrences: Vec<(&str, usize, Vec<(usize, usize)>)> = candidates
        .iter()
        .map(|entry| {
            let literal = entry.literal.text();
            let ranges = document
                .match_indices(literal)
                .map(|(i, m)| (i, i + m.len()))
                .collect();
            (literal, entry.literal.len(), ranges)
        })
        .collect();

    let mut overlaps = BTreeSet::new();
    for (i, (a, a_len, a_ranges)) in occurrences.iter().enumerate() {
        for (b, b_len, b_ranges) in occurrences.iter().skip(i + 1) {
            if a_len != b_len || a == b {
                continue;
            }
            let intersects = a_ranges.iter().any(|&(a_start, a_end)| {
                b_ranges
                    .iter()
                    .any(|&(b_start, b_end)| a_start < b_end && b_start < a_end)
            });
            if intersects {
                let (first, second) = if a <= b { (a, b) } else { (b, a) };
                overlaps.insert(AmbiguousOverlap {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }
    overlaps.into_iter().collect()
}
