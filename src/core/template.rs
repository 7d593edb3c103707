//! Region tokenizer for Mustache-style template text.
//!
//! Templates are not parsed into a tree. The text is split into a flat sequence of
//! byte ranges classified as plain text, double-brace expressions, or complete
//! translation-key references (`{{#__}}category.slug{{/__}}`). Substitution only ever
//! touches [`SegmentKind::Text`] ranges.

use std::fmt::Display;

/// Opening half of the translation-invocation wrapper.
pub const KEY_OPEN: &str = "{{#__}}";
/// Closing half of the translation-invocation wrapper.
pub const KEY_CLOSE: &str = "{{/__}}";

/// Wrap a key in the translation-invocation delimiters.
pub fn key_reference(key: &impl Display) -> String {
    format!("{}{}{}", KEY_OPEN, key, KEY_CLOSE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal markup and text.
    Text,
    /// `{{...}}`, `{{{...}}}` or a stray `{{` running to the end of the document.
    Expression,
    /// `{{#__}}key{{/__}}` as a single unit.
    KeyReference,
}

/// A classified byte range of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Split `text` into contiguous segments covering the whole input.
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find("{{") {
        let open = cursor + rel;
        let (end, kind) = region_end(text, open);

        if cursor < open {
            out.push(Segment {
                kind: SegmentKind::Text,
                start: cursor,
                end: open,
            });
        }
        out.push(Segment {
            kind,
            start: open,
            end,
        });
        cursor = end;
    }

    if cursor < text.len() {
        out.push(Segment {
            kind: SegmentKind::Text,
            start: cursor,
            end: text.len(),
        });
    }
    out
}

fn region_end(text: &str, open: usize) -> (usize, SegmentKind) {
    let rest = &text[open..];

    if let Some(after_open) = rest.strip_prefix(KEY_OPEN)
        && let Some(close) = after_open.find(KEY_CLOSE)
    {
        let inner = &after_open[..close];
        if !inner.is_empty() && !inner.contains('\n') && !inner.contains("{{") {
            let end = open + KEY_OPEN.len() + close + KEY_CLOSE.len();
            return (end, SegmentKind::KeyReference);
        }
    }

    if rest.starts_with("{{{")
        && let Some(close) = rest.find("}}}")
    {
        return (open + close + 3, SegmentKind::Expression);
    }

    match rest[2..].find("}}") {
        Some(close) => (open + 2 + close + 2, SegmentKind::Expression),
        None => (text.len(), SegmentKind::Expression),
    }
}

/// True when `start..end` lies entirely inside a single text segment.
pub fn in_text(segments: &[Segment], start: usize, end: usize) -> bool {
    let idx = segments.partition_point(|s| s.end <= start);
    segments
        .get(idx)
        .is_some_and(|s| s.kind == SegmentKind::Text && s.start <= start && end <= s.end)
}

/// Line-start offsets for turning byte offsets into 1-based line/column pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                offsets.push(i + 1);
            }
        }
        Self { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line(&self, offset: usize) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// 1-based line and character column of `offset`.
    pub fn line_col(&self, content: &str, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        let line_start = self.offsets[line - 1];
        let col = content[line_start..offset].chars().count() + 1;
        (line, col)
    }

    /// Text of a 1-based line without its terminator.
    pub fn line_text<'a>(&self, content: &'a str, line: usize) -> &'a str {
        let start = self.offsets.get(line - 1).copied().unwrap_or(content.len());
        let end = self.offsets.get(line).copied().unwrap_or(content.len());
        content[start..end].trim_end_matches(['\n', '\r'])
    }
}
