//! Issue types for migration and validation results.
//!
//! Each issue is self-contained: the terminal reporter needs nothing beyond the
//! issue itself to print it, including the offending source line when one exists.

use enum_dispatch::enum_dispatch;

use crate::core::{replace::AmbiguousOverlap, template::LineIndex, validate::StructuralError};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnbalancedDelimiters,
    MalformedKey,
    UnknownKey,
    SectionNesting,
    MissingTranslation,
    DuplicateSlug,
    AmbiguousOverlap,
    FileError,
    MissingTemplate,
    LanguageFile,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::UnbalancedDelimiters => write!(f, "unbalanced-delimiters"),
            Rule::MalformedKey => write!(f, "malformed-key"),
            Rule::UnknownKey => write!(f, "unknown-key"),
            Rule::SectionNesting => write!(f, "section-nesting"),
            Rule::MissingTranslation => write!(f, "missing-translation"),
            Rule::DuplicateSlug => write!(f, "duplicate-slug"),
            Rule::AmbiguousOverlap => write!(f, "ambiguous-overlap"),
            Rule::FileError => write!(f, "file-error"),
            Rule::MissingTemplate => write!(f, "missing-template"),
            Rule::LanguageFile => write!(f, "language-file"),
        }
    }
}

// ============================================================
// Source context
// ============================================================

/// A position inside a template, with the line it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub file_path: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub col: usize,
    pub source_line: String,
}

// ============================================================
// Issue Types
// ============================================================

/// Structural defect in a (migrated) template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralIssue {
    pub file_path: String,
    /// None for document-wide errors such as delimiter imbalance.
    pub context: Option<SourceContext>,
    pub error: StructuralError,
}

impl StructuralIssue {
    /// Attach file and source-line context to a validator error.
    pub fn new(file_path: &str, text: &str, index: &LineIndex, error: StructuralError) -> Self {
        let context = error.position().map(|(line, col)| SourceContext {
            file_path: file_path.to_string(),
            line,
            col,
            source_line: index.line_text(text, line).to_string(),
        });
        Self {
            file_path: file_path.to_string(),
            context,
            error,
        }
    }

    /// All errors of one validated document.
    pub fn from_errors(file_path: &str, text: &str, errors: &[StructuralError]) -> Vec<Self> {
        let index = LineIndex::new(text);
        errors
            .iter()
            .map(|e| Self::new(file_path, text, &index, e.clone()))
            .collect()
    }
}

/// Inventory key with no entry in the keyed-string store for the checked locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslationIssue {
    pub key: String,
    pub locale: String,
    /// Template the literal was extracted from.
    pub source_file: String,
}

/// Slug defined in several categories of the keyed-string store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSlugIssue {
    pub slug: String,
    pub categories: Vec<String>,
    pub locale_dir: String,
}

/// Two same-length literals overlapping in one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousOverlapIssue {
    pub file_path: String,
    pub overlap: AmbiguousOverlap,
}

/// Template that could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// Template named by the inventory that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTemplateIssue {
    pub file_path: String,
}

/// Language file that is missing, unreadable or not a PHP array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFileIssue {
    pub file_path: String,
    pub error: String,
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found while migrating or validating templates.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Structural(StructuralIssue),
    MissingTranslation(MissingTranslationIssue),
    DuplicateSlug(DuplicateSlugIssue),
    AmbiguousOverlap(AmbiguousOverlapIssue),
    FileError(FileErrorIssue),
    MissingTemplate(MissingTemplateIssue),
    LanguageFile(LanguageFileIssue),
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Template position with the source line for context display.
    Source(&'a SourceContext),
    /// File-level only.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for StructuralIssue {
    fn location(&self) -> ReportLocation<'_> {
        match &self.context {
            Some(ctx) => ReportLocation::Source(ctx),
            None => ReportLocation::File {
                path: &self.file_path,
            },
        }
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        match self.error {
            StructuralError::UnbalancedDelimiters { .. } => Rule::UnbalancedDelimiters,
            StructuralError::MalformedKey { .. } => Rule::MalformedKey,
            StructuralError::UnknownKey { .. } => Rule::UnknownKey,
            StructuralError::ClosingWithoutOpening { .. }
            | StructuralError::MismatchedSection { .. }
            | StructuralError::UnclosedSections { .. } => Rule::SectionNesting,
        }
    }

    fn hint(&self) -> Option<&str> {
        match self.error {
            StructuralError::UnknownKey { .. } => {
                Some("re-run extraction or restore the template from its backup")
            }
            _ => None,
        }
    }
}

impl Report for MissingTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.source_file,
        }
    }

    fn message(&self) -> String {
        format!("No '{}' translation for key: {}", self.locale, self.key)
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::MissingTranslation
    }
}

impl Report for DuplicateSlugIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.locale_dir,
        }
    }

    fn message(&self) -> String {
        format!("Duplicate key across categories: {}", self.slug)
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::DuplicateSlug
    }

    fn details(&self) -> Option<String> {
        Some(format!("defined in: {}", self.categories.join(", ")))
    }
}

impl Report for AmbiguousOverlapIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!(
            "Overlapping literals of equal length: \"{}\" and \"{}\"",
            self.overlap.first, self.overlap.second
        )
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::AmbiguousOverlap
    }

    fn details(&self) -> Option<String> {
        Some(format!("\"{}\" was substituted first", self.overlap.first))
    }
}

impl Report for FileErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::FileError
    }
}

impl Report for MissingTemplateIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        "Template file not found".to_string()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::MissingTemplate
    }

    fn hint(&self) -> Option<&str> {
        Some("re-run extraction to refresh the inventory")
    }
}

impl Report for LanguageFileIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::LanguageFile
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_key(&self) -> (&str, usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.file_path.as_str(), ctx.line, ctx.col),
            ReportLocation::File { path } => (path, 0, 0),
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.report_rule().cmp(&other.report_rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
