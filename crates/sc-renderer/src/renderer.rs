//! Markdown event driver over a [`Renderer`] chain.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::backend::Renderer;
use crate::error::ShortcodeError;
use crate::html::anchor;
use crate::shortcode::RenderContext;
use crate::state::{CodeBlockState, Frame, ImageState, TableState, escape_html};
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
}

/// Markdown renderer that routes text, images, links and paragraphs
/// through a [`Renderer`].
///
/// Plain text is buffered until the next piece of markup so that a
/// directive split across soft line breaks reaches [`Renderer::text`] in
/// one piece. Code blocks and inline code never reach the renderer.
///
/// # Example
///
/// ```
/// use sc_renderer::{
///     AdmonitionRenderer, HtmlRenderer, MarkdownRenderer, ShortcodeConfig, ShortcodeRenderer,
/// };
///
/// let config = ShortcodeConfig::default();
/// let chain = AdmonitionRenderer::new(ShortcodeRenderer::new(HtmlRenderer, &config));
/// let mut renderer = MarkdownRenderer::new(chain);
///
/// let result = renderer.render_markdown("! Remember `{{ x }}`", None).unwrap();
/// assert!(result.html.contains("admonition-note"));
/// assert!(result.html.contains("<code>{{ x }}</code>"));
/// ```
pub struct MarkdownRenderer<R: Renderer> {
    renderer: R,
    gfm: bool,
    output: String,
    /// Elements whose callback needs their rendered content.
    frames: Vec<Frame>,
    /// Raw text not yet handed to the renderer.
    pending: String,
    code: CodeBlockState,
    table: TableState,
    image: Option<ImageState>,
}

impl<R: Renderer> MarkdownRenderer<R> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            gfm: true,
            output: String::with_capacity(4096),
            frames: Vec::new(),
            pending: String::new(),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// The renderer chain.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    ///
    /// # Errors
    ///
    /// Propagates fatal [`ShortcodeError`]s from the renderer chain.
    pub fn render_markdown(
        &mut self,
        markdown: &str,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<RenderResult, ShortcodeError> {
        let parser = self.create_parser(markdown);
        self.render(parser, ctx)
    }

    /// Render markdown events and return the result.
    ///
    /// # Errors
    ///
    /// Propagates fatal [`ShortcodeError`]s from the renderer chain.
    pub fn render<'a, I>(
        &mut self,
        events: I,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<RenderResult, ShortcodeError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        self.reset();
        for event in TextMergeStream::new(events) {
            self.process_event(event, ctx)?;
        }
        self.flush_text(ctx)?;

        Ok(RenderResult {
            html: std::mem::take(&mut self.output),
        })
    }

    fn reset(&mut self) {
        self.output.clear();
        self.frames.clear();
        self.pending.clear();
        self.code = CodeBlockState::default();
        self.table = TableState::default();
        self.image = None;
    }

    /// Innermost open buffer.
    fn buf(&mut self) -> &mut String {
        match self.frames.last_mut() {
            Some(frame) => frame.buffer(),
            None => &mut self.output,
        }
    }

    fn flush_text(&mut self, ctx: Option<&dyn RenderContext>) -> Result<(), ShortcodeError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        let html = self.renderer.text(&text, ctx)?;
        self.buf().push_str(&html);
        Ok(())
    }

    fn process_event(
        &mut self,
        event: Event<'_>,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<(), ShortcodeError> {
        if let Some(image) = self.image.as_mut() {
            if image.absorb(&event) {
                return self.finish_image(ctx);
            }
            return Ok(());
        }

        match &event {
            Event::Text(_) | Event::SoftBreak | Event::End(TagEnd::Paragraph) => {}
            _ => {
                if let Some(Frame::Paragraph { text_only, .. }) = self.frames.last_mut() {
                    *text_only = false;
                }
                self.flush_text(ctx)?;
            }
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag, ctx)?,
            Event::Text(text) => {
                if self.code.is_active() {
                    self.code.push_str(&text);
                } else {
                    self.pending.push_str(&text);
                }
            }
            Event::Code(code) => {
                write!(self.buf(), "<code>{}</code>", escape_html(&code)).unwrap();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.buf().push_str(&html),
            Event::SoftBreak => self.pending.push('\n'),
            Event::HardBreak => self.buf().push_str("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                self.buf().push_str(if checked {
                    r#"<input type="checkbox" checked disabled> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.frames.push(Frame::Paragraph {
                html: String::new(),
                text_only: true,
            }),
            Tag::Heading { level, .. } => self.frames.push(Frame::Heading {
                level: heading_level_to_num(level),
                html: String::new(),
            }),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => {
                match start {
                    Some(1) => self.output.push_str("<ol>"),
                    Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                    None => self.output.push_str("<ul>"),
                }
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.buf().push_str("<em>"),
            Tag::Strong => self.buf().push_str("<strong>"),
            Tag::Strikethrough => self.buf().push_str("<s>"),
            Tag::Superscript => self.buf().push_str("<sup>"),
            Tag::Subscript => self.buf().push_str("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = if link_type == LinkType::Email {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.into_string()
                };
                self.frames.push(Frame::Link {
                    href,
                    title: title.into_string(),
                    html: String::new(),
                    autolink: matches!(link_type, LinkType::Autolink | LinkType::Email),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(ImageState::new(dest_url.into_string(), title.into_string()));
            }
        }
    }

    fn end_tag(
        &mut self,
        tag: TagEnd,
        ctx: Option<&dyn RenderContext>,
    ) -> Result<(), ShortcodeError> {
        match tag {
            TagEnd::Paragraph => self.finish_paragraph(ctx)?,
            TagEnd::Heading(_) => {
                if let Some(Frame::Heading { level, html }) = self.frames.pop() {
                    write!(self.buf(), "<h{level}>{}</h{level}>", html.trim()).unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                if let Some(lang) = lang {
                    write!(
                        self.output,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(&lang),
                        escape_html(&content)
                    )
                    .unwrap();
                } else {
                    write!(self.output, "<pre><code>{}</code></pre>", escape_html(&content))
                        .unwrap();
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::Image => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.buf().push_str("</em>"),
            TagEnd::Strong => self.buf().push_str("</strong>"),
            TagEnd::Strikethrough => self.buf().push_str("</s>"),
            TagEnd::Superscript => self.buf().push_str("</sup>"),
            TagEnd::Subscript => self.buf().push_str("</sub>"),
            TagEnd::Link => {
                if let Some(Frame::Link {
                    href,
                    title,
                    html,
                    autolink,
                }) = self.frames.pop()
                {
                    let link = if autolink {
                        anchor(&href, &title, &html)
                    } else {
                        self.renderer.link(&href, &title, &html, ctx)?
                    };
                    self.buf().push_str(&link);
                }
            }
        }
        Ok(())
    }

    /// A paragraph of nothing but text is first offered to
    /// [`Renderer::block`].
    fn finish_paragraph(&mut self, ctx: Option<&dyn RenderContext>) -> Result<(), ShortcodeError> {
        let Some(Frame::Paragraph { mut html, text_only }) = self.frames.pop() else {
            return Ok(());
        };

        let text = std::mem::take(&mut self.pending);
        if text_only && !text.is_empty() {
            if let Some(block) = self.renderer.block(&text, ctx)? {
                self.buf().push_str(&block);
                return Ok(());
            }
        }
        if !text.is_empty() {
            html.push_str(&self.renderer.text(&text, ctx)?);
        }

        let paragraph = self.renderer.paragraph(&html, ctx)?;
        self.buf().push_str(&paragraph);
        Ok(())
    }

    fn finish_image(&mut self, ctx: Option<&dyn RenderContext>) -> Result<(), ShortcodeError> {
        let Some(image) = self.image.take() else {
            return Ok(());
        };
        let html = self
            .renderer
            .image(&image.src, &image.title, &image.alt, ctx)?;
        self.buf().push_str(&html);
        Ok(())
    }
}
