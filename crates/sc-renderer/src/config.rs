//! Immutable renderer configuration.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ShortcodeError;

/// Default delimiter pattern: `{{ ... }}`, lazy, dot matches newline.
pub const DEFAULT_PATTERN: &str = r"(?s)\{\{(.*?)\}\}";

/// Default separator between display text and arguments: `![alt:args](src)`.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Default base width, in pixels, for attachment thumbnails.
pub const DEFAULT_IMG_WIDTH: u32 = 800;

static DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(DEFAULT_PATTERN).unwrap());

/// Configuration shared by the scanner and the markup overrides.
///
/// Built once at startup and injected into every component that needs it.
///
/// # Example
///
/// ```
/// use sc_renderer::ShortcodeConfig;
///
/// let config = ShortcodeConfig::new()
///     .with_pattern(r"\[\[(.*?)\]\]")
///     .unwrap()
///     .with_separator("|")
///     .with_img_width(640);
///
/// assert_eq!(config.separator(), "|");
/// assert_eq!(config.img_width(), 640);
/// ```
#[derive(Clone, Debug)]
pub struct ShortcodeConfig {
    pattern: Regex,
    separator: String,
    img_width: u32,
}

impl Default for ShortcodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcodeConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_REGEX.clone(),
            separator: DEFAULT_SEPARATOR.to_owned(),
            img_width: DEFAULT_IMG_WIDTH,
        }
    }

    /// Set the directive delimiter pattern.
    ///
    /// Capture group 1 is the directive body; without a capture group the
    /// whole match is used.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::Pattern`] if `pattern` is not a valid regex.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, ShortcodeError> {
        self.pattern = Regex::new(pattern)?;
        Ok(self)
    }

    /// Set the separator between display text and arguments.
    ///
    /// Surrounding whitespace is trimmed; an empty separator keeps the default.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        let separator = separator.trim();
        if !separator.is_empty() {
            separator.clone_into(&mut self.separator);
        }
        self
    }

    /// Set the base thumbnail width in pixels.
    #[must_use]
    pub fn with_img_width(mut self, width: u32) -> Self {
        self.img_width = width;
        self
    }

    /// The compiled delimiter pattern.
    #[must_use]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The argument separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Base thumbnail width in pixels.
    #[must_use]
    pub fn img_width(&self) -> u32 {
        self.img_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShortcodeConfig::default();
        assert_eq!(config.pattern().as_str(), DEFAULT_PATTERN);
        assert_eq!(config.separator(), ":");
        assert_eq!(config.img_width(), 800);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ShortcodeConfig::new().with_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, ShortcodeError::Pattern(_)));
    }

    #[test]
    fn test_separator_trimmed() {
        let config = ShortcodeConfig::new().with_separator(" | ");
        assert_eq!(config.separator(), "|");
    }

    #[test]
    fn test_blank_separator_keeps_default() {
        let config = ShortcodeConfig::new().with_separator("  ");
        assert_eq!(config.separator(), ":");
    }
}
