//! Shortcode-aware overrides for text, images and links.
//!
//! Text runs have their directives expanded. Images and links accept an
//! argument tail after the last separator in their alt text or link text:
//!
//! ```text
//! ![A sunset:center w-50 border_radius=4px](@1 "Evening")
//! [Download the report:download -new-tab](report.pdf)
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{Attrs, class_list, thumbnail_width, tostyles, width_factor};
use crate::backend::Renderer;
use crate::config::ShortcodeConfig;
use crate::error::ShortcodeError;
use crate::shortcode::{
    Directive, ImageQuery, ParsedArgs, RenderContext, ShortcodeResolver, ShortcodeScanner,
};
use crate::state::escape_html;
use crate::util::{has_scheme, is_absolute_target};

/// `@3`: the third image attachment of the current record.
static ATTACHMENT_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@([0-9]+)$").unwrap());

/// `rel` set whenever a link opens in another browsing context.
const SAFE_REL: &str = "noreferrer noopener";

/// Wraps a renderer with directive expansion and attribute-aware images
/// and links.
pub struct ShortcodeRenderer<R> {
    inner: R,
    config: ShortcodeConfig,
    scanner: ShortcodeScanner,
}

impl<R: Renderer> ShortcodeRenderer<R> {
    /// Wrap `inner` using `config` for the delimiter, separator and
    /// thumbnail width.
    #[must_use]
    pub fn new(inner: R, config: &ShortcodeConfig) -> Self {
        Self {
            inner,
            config: config.clone(),
            scanner: ShortcodeScanner::new(config),
        }
    }

    /// The wrapped renderer.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn separator(&self) -> &str {
        self.config.separator()
    }

    /// Thumbnail URL for an attachment, or `src` unchanged when there is
    /// no record or no matching attachment.
    fn resolve_image_src(
        &self,
        src: &str,
        index: Option<usize>,
        parsed: &ParsedArgs,
        ctx: Option<&dyn RenderContext>,
    ) -> String {
        let Some(record) = ctx.and_then(|ctx| ctx.record()) else {
            return src.to_owned();
        };
        let query = match index {
            Some(n) => ImageQuery::Index(n),
            None if !has_scheme(src) => ImageQuery::Matching(src),
            None => return src.to_owned(),
        };
        let Some(image) = record.attachment_image(query) else {
            tracing::debug!(record = record.path(), src, "No matching image attachment");
            return src.to_owned();
        };

        let factor = width_factor(&parsed.args, &parsed.kwargs);
        let thumbnail = image.thumbnail(thumbnail_width(factor, self.config.img_width()));
        record.resolve_url(&thumbnail.url_path())
    }
}

impl<R: Renderer> Renderer for ShortcodeRenderer<R> {
    fn text(&self, text: &str, ctx: Option<&dyn RenderContext>) -> Result<String, ShortcodeError> {
        let resolver = ShortcodeResolver::new(ctx);
        let scanned = self
            .scanner
            .scan_with(text, &resolver, |literal| self.inner.text(literal, ctx))?;
        match scanned {
            Cow::Borrowed(_) => self.inner.text(text, ctx),
            Cow::Owned(html) => Ok(html),
        }
    }

    fn block(
        &self,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<Option<String>, ShortcodeError> {
        let Some(body) = self.scanner.sole_directive(text) else {
            return self.inner.block(text, ctx);
        };
        let directive = Directive::parse(body)?;
        ShortcodeResolver::new(ctx).render(&directive).map(Some)
    }

    fn image(
        &self,
        src: &str,
        title: &str,
        alt: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        let index = ATTACHMENT_INDEX
            .captures(src)
            .and_then(|caps| caps[1].parse::<usize>().ok());
        let (display, tail) = match (alt.rsplit_once(self.separator()), index) {
            (Some(split), _) => split,
            (None, Some(_)) => (alt, ""),
            (None, None) => return self.inner.image(src, title, alt, ctx),
        };

        let parsed = ParsedArgs::parse(tail);
        let src = self.resolve_image_src(src, index, &parsed, ctx);

        let style = tostyles(&parsed.kwargs);
        let mut attrs = Attrs::default();
        attrs
            .push("style", &style)
            .push("class", &class_list(&parsed.args))
            .push("alt", display)
            .push("title", title);
        Ok(format!(r#"<img src="{}"{}>"#, escape_html(&src), attrs.as_str()))
    }

    fn link(
        &self,
        href: &str,
        title: &str,
        text: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        let Some((display, tail)) = text.rsplit_once(self.separator()) else {
            return self.inner.link(href, title, text, ctx);
        };
        // Markup in the tail means the separator belongs to inline HTML.
        if tail.contains('>') {
            return self.inner.link(href, title, text, ctx);
        }

        let ParsedArgs { mut args, mut kwargs } = ParsedArgs::parse(tail);

        let href = match ctx.and_then(|ctx| ctx.record()) {
            Some(record) if !is_absolute_target(href) => Cow::Owned(record.resolve_url(href)),
            _ => Cow::Borrowed(href),
        };

        let mut new_tab = false;
        let mut download = false;
        args.retain(|arg| {
            if arg.is_str("-new-tab") {
                new_tab = true;
                false
            } else if arg.is_str("download") {
                download = true;
                false
            } else {
                true
            }
        });
        let target = match kwargs.shift_remove("target") {
            Some(target) => Some(target.to_string()),
            None => new_tab.then(|| "_blank".to_owned()),
        };

        let style = tostyles(&kwargs);
        let mut attrs = Attrs::default();
        if download {
            attrs.flag("download");
        }
        attrs
            .push("style", &style)
            .push("class", &class_list(&args))
            .push("title", title);
        if let Some(target) = target.filter(|t| !t.is_empty()) {
            attrs.push("target", &target).push("rel", SAFE_REL);
        }

        Ok(format!(
            r#"<a href="{}"{}>{display}</a>"#,
            escape_html(&href),
            attrs.as_str()
        ))
    }

    fn paragraph(
        &self,
        html: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        self.inner.paragraph(html, ctx)
    }
}
