//! Small helpers shared by extraction, migration and reporting.

use std::path::Path;

/// True if `text` has at least one Unicode letter.
///
/// Pure numbers, punctuation and whitespace are not translatable text.
///
/// # Examples
///
/// ```
/// use stachemig::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Configuración"));
/// assert!(contains_alphabetic("Paso 2"));
/// assert!(!contains_alphabetic("2024"));
/// assert!(!contains_alphabetic("--"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// `path` relative to `root`, with `/` separators on every platform.
///
/// Paths outside `root` are returned as given.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
