//! Shortcode-aware markdown rendering.
//!
//! Authors embed `{{ command arg key=value }}` directives in markdown. Each
//! directive is rendered through a host-provided template engine, and
//! images and links accept an argument tail after a separator:
//! `![alt:center w-50](@1)`.
//!
//! # Architecture
//!
//! - [`MarkdownRenderer`] walks pulldown-cmark events and calls a [`Renderer`].
//! - [`HtmlRenderer`] produces standard HTML.
//! - [`ShortcodeRenderer`] wraps any renderer with directive expansion and
//!   attribute-aware images and links.
//! - [`AdmonitionRenderer`] wraps any renderer with `!`-marked callouts.
//!
//! Host collaborators ([`RenderContext`], [`Record`], [`Image`]) are traits;
//! the core never owns host state.
//!
//! # Example
//!
//! ```
//! use sc_renderer::{
//!     AdmonitionRenderer, HtmlRenderer, MarkdownRenderer, ShortcodeConfig, ShortcodeRenderer,
//! };
//!
//! let config = ShortcodeConfig::default();
//! let chain = AdmonitionRenderer::new(ShortcodeRenderer::new(HtmlRenderer, &config));
//!
//! let result = MarkdownRenderer::new(chain)
//!     .render_markdown("![Logo:float-end width=64px](logo.png)", None)
//!     .unwrap();
//! assert_eq!(
//!     result.html,
//!     r#"<p><img src="logo.png" style="width:64px" class="float-end" alt="Logo"></p>"#
//! );
//! ```

mod admonition;
mod attrs;
mod backend;
mod config;
mod error;
mod html;
mod renderer;
pub mod shortcode;
mod shortcodes;
mod state;
mod util;

pub use admonition::{AdmonitionKind, AdmonitionRenderer};
pub use attrs::tostyles;
pub use backend::Renderer;
pub use config::{DEFAULT_IMG_WIDTH, DEFAULT_PATTERN, DEFAULT_SEPARATOR, ShortcodeConfig};
pub use error::{ShortcodeError, TemplateError};
pub use html::HtmlRenderer;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use shortcode::{
    Directive, Image, ImageQuery, ParsedArgs, Record, RenderContext, ShortcodeResolver,
    ShortcodeScanner, ShortcodeValues, Value,
};
pub use shortcodes::ShortcodeRenderer;
pub use state::escape_html;
pub use util::has_scheme;
