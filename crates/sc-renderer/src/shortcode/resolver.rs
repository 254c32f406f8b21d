//! Template lookup for directives.

use crate::error::{ShortcodeError, TemplateError};

use super::{Directive, RenderContext};

/// Fallback template used when no command-specific template exists.
pub const DEFAULT_TEMPLATE: &str = "shortcode/default.html";

/// Template names tried for `command`, in order.
#[must_use]
pub fn template_candidates(command: &str) -> [String; 2] {
    [
        format!("shortcodes/{command}.html"),
        DEFAULT_TEMPLATE.to_owned(),
    ]
}

/// Renders directives through the host's template engine.
///
/// Missing context and missing templates degrade to bracketed inline text
/// so that authors see what failed in place. A template that exists but
/// fails to render is a content bug and aborts with
/// [`ShortcodeError::Template`].
#[derive(Clone, Copy)]
pub struct ShortcodeResolver<'a> {
    context: Option<&'a dyn RenderContext>,
}

impl<'a> ShortcodeResolver<'a> {
    /// Create a resolver for one render call.
    #[must_use]
    pub fn new(context: Option<&'a dyn RenderContext>) -> Self {
        Self { context }
    }

    /// The borrowed render context, if a build is in progress.
    #[must_use]
    pub fn context(&self) -> Option<&'a dyn RenderContext> {
        self.context
    }

    /// Render one directive.
    pub fn render(&self, directive: &Directive) -> Result<String, ShortcodeError> {
        let command = &directive.command;
        let Some(ctx) = self.context else {
            tracing::debug!(command = %command, "No build context for shortcode");
            return Ok(format!("[no build context for {command}]"));
        };

        let candidates = template_candidates(command);
        match ctx.render_template(&candidates, &directive.values()) {
            Ok(html) => Ok(html),
            Err(TemplateError::NotFound { .. }) => {
                tracing::warn!(command = %command, "Shortcode template not found");
                Ok(format!(r#"[could not find "shortcode/{command}.html" template]"#))
            }
            Err(source) => Err(ShortcodeError::Template {
                command: command.clone(),
                source,
            }),
        }
    }
}
