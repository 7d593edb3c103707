//! Translation keys and the slug derivation that produces them.
//!
//! A key has the shape `category.slug`. The category is an opaque bucket assigned by
//! whoever classified the literal; the slug is derived from the literal itself.

use std::fmt;

/// Maximum number of characters kept in a slug before trailing underscores are stripped.
pub const MAX_SLUG_LEN: usize = 40;

/// A two-part `category.slug` identifier that replaces a literal in a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TranslationKey {
    category: String,
    slug: String,
}

impl TranslationKey {
    pub fn new(category: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            slug: slug.into(),
        }
    }

    /// Parse a raw `category.slug` string.
    ///
    /// The category ends at the first dot; both halves must be non-empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (category, slug) = raw.split_once('.')?;
        if category.is_empty() || slug.is_empty() {
            return None;
        }
        Some(Self::new(category, slug))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Same category, slug suffixed with `_{n}`. Used to resolve collisions.
    pub fn with_suffix(&self, n: usize) -> Self {
        Self::new(self.category.clone(), format!("{}_{}", self.slug, n))
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.slug)
    }
}

/// Derive a slug from a literal.
///
/// Lower-cases the trimmed literal, drops every character that is neither
/// alphanumeric, whitespace nor an underscore, joins whitespace runs with `_`,
/// keeps the first [`MAX_SLUG_LEN`] characters and strips surrounding underscores.
/// Returns an empty string when nothing survives.
///
/// # Examples
///
/// ```
/// use stachemig::core::slugify;
///
/// assert_eq!(slugify("Buscar por nombre"), "buscar_por_nombre");
/// assert_eq!(slugify("¿Está seguro?"), "está_seguro");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(literal: &str) -> String {
    let kept: String = literal
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(MAX_SLUG_LEN).collect();

    truncated.trim_matches('_').to_string()
}

/// Generate the candidate key for a literal.
///
/// `disambiguation_index` only matters when the literal yields an empty slug,
/// in which case the slug becomes `string_{index}`. Uniqueness is not checked
/// here; see [`InventoryBuilder`](super::InventoryBuilder).
pub fn generate_key(literal: &str, category: &str, disambiguation_index: usize) -> TranslationKey {
    let slug = slugify(literal);
    let slug = if slug.is_empty() {
        format!("string_{}", disambiguation_index)
    } else {
        slug
    };
    TranslationKey::new(category, slug)
}
