//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Whether `url` starts with a URI scheme (`https:`, `mailto:`, ...).
///
/// # Examples
///
/// ```
/// use sc_renderer::has_scheme;
///
/// assert!(has_scheme("https://example.com"));
/// assert!(has_scheme("mailto:me@example.com"));
/// assert!(!has_scheme("images/pic.jpg"));
/// assert!(!has_scheme("../a:b.jpg"));
/// ```
#[must_use]
pub fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether a link target stays on the current page or site root and must
/// not be resolved against the record.
pub(crate) fn is_absolute_target(url: &str) -> bool {
    url.is_empty() || url.starts_with('#') || url.starts_with("//") || has_scheme(url)
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
