//! Renderer trait for inline and paragraph markup.
//!
//! Behaviour is layered by wrapping: each override holds an inner
//! [`Renderer`] and either handles a call itself or forwards it verbatim.
//!
//! ```
//! use sc_renderer::{AdmonitionRenderer, HtmlRenderer, ShortcodeConfig, ShortcodeRenderer};
//!
//! let config = ShortcodeConfig::default();
//! let chain = AdmonitionRenderer::new(ShortcodeRenderer::new(HtmlRenderer, &config));
//! ```

use crate::error::ShortcodeError;
use crate::shortcode::RenderContext;

/// Callbacks invoked by [`MarkdownRenderer`](crate::MarkdownRenderer) while
/// walking markdown events.
///
/// Every method receives the host render context, if a build is in
/// progress, and returns HTML.
pub trait Renderer {
    /// Render a run of plain text (soft breaks appear as `\n`).
    fn text(&self, text: &str, ctx: Option<&dyn RenderContext>) -> Result<String, ShortcodeError>;

    /// Offer a paragraph that consists only of plain text.
    ///
    /// Returning `Some` replaces the whole paragraph, `<p>` included.
    /// The default declines.
    fn block(
        &self,
        _text: &str,
        _ctx: Option<&dyn RenderContext>,
    ) -> Result<Option<String>, ShortcodeError> {
        Ok(None)
    }

    /// Render an image. `alt` is plain text.
    fn image(
        &self,
        src: &str,
        title: &str,
        alt: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError>;

    /// Render a link. `text` is the already rendered link content.
    fn link(
        &self,
        href: &str,
        title: &str,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError>;

    /// Render a paragraph. `html` is the already rendered content.
    fn paragraph(
        &self,
        html: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn text(&self, text: &str, ctx: Option<&dyn RenderContext>) -> Result<String, ShortcodeError> {
        (**self).text(text, ctx)
    }

    fn block(
        &self,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<Option<String>, ShortcodeError> {
        (**self).block(text, ctx)
    }

    fn image(
        &self,
        src: &str,
        title: &str,
        alt: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        (**self).image(src, title, alt, ctx)
    }

    fn link(
        &self,
        href: &str,
        title: &str,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        (**self).link(href, title, text, ctx)
    }

    fn paragraph(
        &self,
        html: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        (**self).paragraph(html, ctx)
    }
}
