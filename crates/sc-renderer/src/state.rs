//! State structs for tracking context during event processing.

use pulldown_cmark::{Alignment, Event, Tag, TagEnd};

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Alignment style attribute for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Pending image: source, title and the alt text collected so far.
pub(crate) struct ImageState {
    pub(crate) src: String,
    pub(crate) title: String,
    pub(crate) alt: String,
    /// Images nested inside the alt text.
    nested: usize,
}

impl ImageState {
    pub(crate) fn new(src: String, title: String) -> Self {
        Self {
            src,
            title,
            alt: String::new(),
            nested: 0,
        }
    }

    /// Consume an event inside the image. Returns `true` at the image's own end.
    ///
    /// Alt text is plain: markup is dropped, breaks become spaces.
    pub(crate) fn absorb(&mut self, event: &Event<'_>) -> bool {
        match event {
            Event::Text(text) | Event::Code(text) => self.alt.push_str(text),
            Event::SoftBreak | Event::HardBreak => self.alt.push(' '),
            Event::Start(Tag::Image { .. }) => self.nested += 1,
            Event::End(TagEnd::Image) if self.nested > 0 => self.nested -= 1,
            Event::End(TagEnd::Image) => return true,
            _ => {}
        }
        false
    }
}

/// Inline output buffer for an element whose callback needs its rendered
/// content.
pub(crate) enum Frame {
    Paragraph {
        html: String,
        /// No markup seen yet, only text and soft breaks.
        text_only: bool,
    },
    Heading {
        level: u8,
        html: String,
    },
    Link {
        href: String,
        title: String,
        html: String,
        /// Autolinks bypass the renderer's link callback.
        autolink: bool,
    },
}

impl Frame {
    pub(crate) fn buffer(&mut self) -> &mut String {
        match self {
            Self::Paragraph { html, .. } | Self::Heading { html, .. } | Self::Link { html, .. } => {
                html
            }
        }
    }
}

/// Escape special HTML characters.
///
/// # Example
///
/// ```
/// use sc_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("AT&T <b>'q'</b>"), "AT&amp;T &lt;b&gt;&#x27;q&#x27;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_code_block_state() {
        let mut code = CodeBlockState::default();
        code.start(Some("rust".to_owned()));
        assert!(code.is_active());
        code.push_str("fn main() {}\n");
        let (lang, content) = code.end();
        assert!(!code.is_active());
        assert_eq!(lang.as_deref(), Some("rust"));
        assert_eq!(content, "fn main() {}\n");
    }

    #[test]
    fn test_table_alignment() {
        let mut table = TableState::default();
        table.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        assert_eq!(table.current_alignment_style(), r#" style="text-align:left""#);
        table.next_cell();
        assert_eq!(table.current_alignment_style(), "");
        table.next_cell();
        assert_eq!(table.current_alignment_style(), r#" style="text-align:right""#);
        table.start_row();
        assert_eq!(table.current_alignment_style(), r#" style="text-align:left""#);
    }

    #[test]
    fn test_image_alt_collection() {
        use pulldown_cmark::{CowStr, LinkType};

        let mut image = ImageState::new("a.png".to_owned(), String::new());
        let nested = Tag::Image {
            link_type: LinkType::Inline,
            dest_url: CowStr::Borrowed("b.png"),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        };
        assert!(!image.absorb(&Event::Text("big".into())));
        assert!(!image.absorb(&Event::SoftBreak));
        assert!(!image.absorb(&Event::Start(Tag::Emphasis)));
        assert!(!image.absorb(&Event::Code("cat".into())));
        assert!(!image.absorb(&Event::Start(nested)));
        assert!(!image.absorb(&Event::End(TagEnd::Image)));
        assert!(image.absorb(&Event::End(TagEnd::Image)));
        assert_eq!(image.alt, "big cat");
    }
}
