//! Error types for shortcode rendering.

/// Error raised by a host template engine.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// None of the candidate templates exist.
    #[error("template not found: {name}")]
    NotFound {
        /// First candidate that was tried.
        name: String,
    },
    /// The template exists but failed to render.
    #[error("template render error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TemplateError {
    /// Wrap any host-side rendering error.
    pub fn render(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Render(Box::new(err))
    }
}

/// Fatal shortcode error.
///
/// Missing templates and a missing render context are not errors: they
/// render as bracketed inline diagnostics. Everything here aborts the page.
#[derive(Debug, thiserror::Error)]
pub enum ShortcodeError {
    /// A directive with no tokens, e.g. `{{ }}`.
    #[error("shortcode has no command: `{raw}`")]
    MissingCommand {
        /// The matched directive text.
        raw: String,
    },
    /// The configured delimiter pattern is not a valid regex.
    #[error("invalid shortcode pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// A shortcode template exists but failed to render.
    #[error("shortcode `{command}` failed to render: {source}")]
    Template {
        /// Directive command.
        command: String,
        /// Host error.
        #[source]
        source: TemplateError,
    },
}
