//! Standard HTML renderer, the innermost link of every chain.

use std::fmt::Write;

use crate::backend::Renderer;
use crate::error::ShortcodeError;
use crate::shortcode::RenderContext;
use crate::state::escape_html;

/// Plain markdown-to-HTML callbacks with no shortcode awareness.
///
/// - text is escaped
/// - `<img src alt title>` for images
/// - `<a href title>` for links
/// - `<p>` for paragraphs
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn text(&self, text: &str, _ctx: Option<&dyn RenderContext>) -> Result<String, ShortcodeError> {
        Ok(escape_html(text))
    }

    fn image(
        &self,
        src: &str,
        title: &str,
        alt: &str,
        _ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        Ok(format!(
            r#"<img src="{}" alt="{}"{title_attr}>"#,
            escape_html(src),
            escape_html(alt)
        ))
    }

    fn link(
        &self,
        href: &str,
        title: &str,
        text: &str,
        _ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        Ok(anchor(href, title, text))
    }

    fn paragraph(
        &self,
        html: &str,
        _ctx: Option<&dyn RenderContext>,
    ) -> Result<String, ShortcodeError> {
        Ok(format!("<p>{html}</p>"))
    }
}

/// `<a>` element with escaped `href` and optional `title`.
pub(crate) fn anchor(href: &str, title: &str, text: &str) -> String {
    let mut out = format!(r#"<a href="{}""#, escape_html(href));
    if !title.is_empty() {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    write!(out, ">{text}</a>").unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_escaped() {
        assert_eq!(HtmlRenderer.text("a < b", None).unwrap(), "a &lt; b");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            HtmlRenderer.image("pic.jpg", "", "A pic", None).unwrap(),
            r#"<img src="pic.jpg" alt="A pic">"#
        );
        assert_eq!(
            HtmlRenderer.image("a&b.png", "T", "", None).unwrap(),
            r#"<img src="a&amp;b.png" alt="" title="T">"#
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            HtmlRenderer.link("/x", "", "<em>x</em>", None).unwrap(),
            r#"<a href="/x"><em>x</em></a>"#
        );
        assert_eq!(
            HtmlRenderer.link("/x", "Go", "x", None).unwrap(),
            r#"<a href="/x" title="Go">x</a>"#
        );
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(HtmlRenderer.paragraph("hi", None).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_block_declines() {
        assert_eq!(HtmlRenderer.block("{{ x }}", None).unwrap(), None);
    }
}
