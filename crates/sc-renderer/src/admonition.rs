//! Callout cards from `!`-prefixed paragraphs.
//!
//! | Marker | Class     | Icon                   |
//! |--------|-----------|------------------------|
//! | `!`    | `note`    | `sticky-note`          |
//! | `!!`   | `info`    | `info-circle`          |
//! | `!!!`  | `tip`     | `candy-cane`           |
//! | `!!!!` | `warning` | `exclamation-triangle` |

use std::sync::LazyLock;

use regex::Regex;

use crate::backend::Renderer;
use crate::error::ShortcodeError;
use crate::shortcode::RenderContext;

static MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(!{1,4})\s+").unwrap());

/// Admonition severity, one per marker length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmonitionKind {
    Note,
    Info,
    Tip,
    Warning,
}

impl AdmonitionKind {
    /// Kind for a marker of `count` exclamation marks.
    #[must_use]
    pub fn from_marker(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::Note),
            2 => Some(Self::Info),
            3 => Some(Self::Tip),
            4 => Some(Self::Warning),
            _ => None,
        }
    }

    /// CSS class suffix.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Warning => "warning",
        }
    }

    /// Font Awesome icon name.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Note => "sticky-note",
            Self::Info => "info-circle",
            Self::Tip => "candy-cane",
            Self::Warning => "exclamation-triangle",
        }
    }

    /// Card header text.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Info => "Info",
            Self::Tip => "Tip",
            Self::Warning => "Warning",
        }
    }
}

/// Wraps a renderer so that marked paragraphs become callout cards.
pub struct AdmonitionRenderer<R> {
    inner: R,
}

impl<R: Renderer> AdmonitionRenderer<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped renderer.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Renderer> Renderer for AdmonitionRenderer<R> {
    fn text(&self, text: &str, ctx: Option<&dyn RenderContext>) -> Result<String, ShortcodeError> {
        self.inner.text(text, ctx)
    }

    fn block(
        &self,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<Option<String>, ShortcodeError> {
        self.inner.block(text, ctx)
    }

    fn image(
        &self,
        src: &str,
        title: &str,
        alt: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        self.inner.image(src, title, alt, ctx)
    }

    fn link(
        &self,
        href: &str,
        title: &str,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        self.inner.link(href, title, text, ctx)
    }

    fn paragraph(
        &self,
        html: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        let Some(caps) = MARKER.captures(html) else {
            return self.inner.paragraph(html, ctx);
        };
        let (Some(marker), Some(whole)) = (caps.get(1), caps.get(0)) else {
            return self.inner.paragraph(html, ctx);
        };
        let Some(kind) = AdmonitionKind::from_marker(marker.len()) else {
            return self.inner.paragraph(html, ctx);
        };

        Ok(format!(
            r#"<div class="card admonition admonition-{cls} mb-1"><div class="card-header"><i class="fas fa-{icon}"></i> {header}:</div><div class="card-body">{body}</div></div>"#,
            cls = kind.class(),
            icon = kind.icon(),
            header = kind.header(),
            body = &html[whole.end()..],
        ))
    }
}
