//! Slug derivation for human-readable names.
//!
//! A slug is the trimmed name, lowercased, with every run of whitespace
//! collapsed into a single hyphen. Other characters pass through unchanged.

/// Derive a slug from `name`.
///
/// # Examples
/// ```
/// use workbench_backend::domain::slug::derive_slug;
///
/// assert_eq!(derive_slug("  My Shop "), "my-shop");
/// assert_eq!(derive_slug("Tienda   del  Sur"), "tienda-del-sur");
/// ```
pub fn derive_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
