//! Host collaborators available while a page is being built.
//!
//! The core never owns any of these: the host hands out a [`RenderContext`]
//! for the duration of one render call and the core only borrows it.

use crate::error::TemplateError;

use super::ShortcodeValues;

/// Ambient per-build state supplied by the host.
///
/// # Example
///
/// ```
/// use sc_renderer::{Record, RenderContext, ShortcodeValues, TemplateError};
///
/// struct Templates;
///
/// impl RenderContext for Templates {
///     fn render_template(
///         &self,
///         candidates: &[String],
///         values: &ShortcodeValues<'_>,
///     ) -> Result<String, TemplateError> {
///         if candidates[0] == "shortcodes/hr.html" {
///             Ok("<hr>".to_owned())
///         } else {
///             Err(TemplateError::NotFound { name: candidates[0].clone() })
///         }
///     }
///
///     fn record(&self) -> Option<&dyn Record> {
///         None
///     }
/// }
/// ```
pub trait RenderContext {
    /// Render the first of `candidates` that exists.
    ///
    /// The host binds `values` under the name `values`, together with its own
    /// site root (`pad`) and current record (`this`).
    ///
    /// Returns [`TemplateError::NotFound`] when no candidate resolves.
    fn render_template(
        &self,
        candidates: &[String],
        values: &ShortcodeValues<'_>,
    ) -> Result<String, TemplateError>;

    /// The content record being rendered, if any.
    fn record(&self) -> Option<&dyn Record>;
}

/// A content record (page) owned by the host.
pub trait Record {
    /// Unique key of the record, e.g. `/blog/first-post`.
    fn path(&self) -> &str;

    /// Resolve a path relative to this record into a URL.
    fn resolve_url(&self, target: &str) -> String;

    /// Look up one of this record's image attachments.
    fn attachment_image(&self, query: ImageQuery<'_>) -> Option<Box<dyn Image>>;
}

/// An image attachment, possibly a thumbnail of another.
pub trait Image {
    /// Path of the image relative to its record.
    fn url_path(&self) -> String;

    /// Scaled copy of this image, `width` pixels wide.
    fn thumbnail(&self, width: u32) -> Box<dyn Image>;
}

/// How an image attachment is addressed from markdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageQuery<'a> {
    /// The Nth image attachment, 1-based (`@2`).
    Index(usize),
    /// An attachment whose id or description equals the string.
    Matching(&'a str),
}
