//! Shortcode directives: `{{ command arg key=value }}`.
//!
//! # Pipeline
//!
//! 1. [`ShortcodeScanner`] finds directive matches in a text run.
//! 2. [`Directive::parse`] turns each match body into a command plus
//!    arguments via [`ParsedArgs`].
//! 3. [`ShortcodeResolver`] renders the directive through the host's
//!    [`RenderContext`], degrading to inline diagnostics when the host has
//!    no context or no template.

mod args;
mod context;
mod directive;
mod resolver;
mod scanner;
mod value;

pub use args::ParsedArgs;
pub use context::{Image, ImageQuery, Record, RenderContext};
pub use directive::{Directive, ShortcodeValues};
pub use resolver::{DEFAULT_TEMPLATE, ShortcodeResolver, template_candidates};
pub use scanner::ShortcodeScanner;
pub use value::Value;
