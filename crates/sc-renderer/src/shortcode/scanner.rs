//! Finds directives in text and replaces them with rendered output.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::config::ShortcodeConfig;
use crate::error::ShortcodeError;

use super::{Directive, ShortcodeResolver};

/// Directive scanner over a configured delimiter pattern.
///
/// Scanning is a single left-to-right pass: rendered output is never
/// scanned again, so a template that emits `{{ ... }}` cannot recurse.
///
/// # Example
///
/// ```
/// use sc_renderer::{ShortcodeConfig, ShortcodeResolver, ShortcodeScanner};
///
/// let scanner = ShortcodeScanner::new(&ShortcodeConfig::default());
/// let resolver = ShortcodeResolver::new(None);
///
/// let out = scanner.scan("See {{ tweet id=1 }}.", &resolver).unwrap();
/// assert_eq!(out, "See [no build context for tweet].");
/// ```
#[derive(Clone, Debug)]
pub struct ShortcodeScanner {
    pattern: Regex,
}

impl ShortcodeScanner {
    /// Create a scanner using the configured delimiter pattern.
    #[must_use]
    pub fn new(config: &ShortcodeConfig) -> Self {
        Self {
            pattern: config.pattern().clone(),
        }
    }

    /// Replace every directive in `text`.
    ///
    /// Returns [`Cow::Borrowed`] when nothing matched, so callers can fall
    /// back to their default text handling.
    pub fn scan<'t>(
        &self,
        text: &'t str,
        resolver: &ShortcodeResolver<'_>,
    ) -> Result<Cow<'t, str>, ShortcodeError> {
        self.scan_with(text, resolver, |literal| Ok(literal.to_owned()))
    }

    /// Replace every directive in `text`, passing the text between
    /// directives through `literal`.
    ///
    /// `literal` is not called at all when nothing matched.
    pub fn scan_with<'t, F>(
        &self,
        text: &'t str,
        resolver: &ShortcodeResolver<'_>,
        mut literal: F,
    ) -> Result<Cow<'t, str>, ShortcodeError>
    where
        F: FnMut(&str) -> Result<String, ShortcodeError>,
    {
        let mut matches = self.pattern.captures_iter(text).peekable();
        if matches.peek().is_none() {
            return Ok(Cow::Borrowed(text));
        }

        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for caps in matches {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            if whole.start > last {
                result.push_str(&literal(&text[last..whole.start])?);
            }
            let directive = Directive::parse(directive_body(&caps))?;
            result.push_str(&resolver.render(&directive)?);
            last = whole.end;
        }
        if last < text.len() {
            result.push_str(&literal(&text[last..])?);
        }

        Ok(Cow::Owned(result))
    }

    /// If `text`, ignoring surrounding whitespace, is exactly one directive,
    /// return that directive's body.
    #[must_use]
    pub fn sole_directive<'t>(&self, text: &'t str) -> Option<&'t str> {
        let trimmed = text.trim();
        let caps = self.pattern.captures(trimmed)?;
        let whole = caps.get(0)?;
        (whole.start() == 0 && whole.end() == trimmed.len()).then(|| directive_body(&caps))
    }
}

fn directive_body<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(0))
        .map_or("", |m| m.as_str())
}
