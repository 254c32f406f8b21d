//! Error types for site building.

use sc_renderer::ShortcodeError;

/// Error from building a page.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Fatal shortcode error while rendering markdown.
    #[error("shortcode error: {0}")]
    Shortcode(#[from] ShortcodeError),

    /// Page template failed to load or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// No page is registered under the path.
    #[error("page not found: {0}")]
    PageNotFound(String),

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },
}
