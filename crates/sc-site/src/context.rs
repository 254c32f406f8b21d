//! Template-backed render context for one page build.

use minijinja::{Environment, ErrorKind, context};
use sc_renderer::{Record, RenderContext, ShortcodeValues, TemplateError};
use serde::Serialize;

use crate::page::Page;

/// Site-wide values bound as `pad` in every template.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Pad {
    pub pages: Vec<PageSummary>,
}

/// Entry of [`Pad::pages`].
#[derive(Clone, Debug, Serialize)]
pub struct PageSummary {
    pub path: String,
    pub url_path: String,
    pub title: String,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            path: page.path.clone(),
            url_path: page.url_path.clone(),
            title: page.title.clone(),
        }
    }
}

/// [`RenderContext`] over a minijinja environment while `page` is built.
pub struct PageContext<'a> {
    env: &'a Environment<'static>,
    page: &'a Page,
    pad: &'a Pad,
}

impl<'a> PageContext<'a> {
    pub fn new(env: &'a Environment<'static>, page: &'a Page, pad: &'a Pad) -> Self {
        Self { env, page, pad }
    }
}

impl RenderContext for PageContext<'_> {
    fn render_template(
        &self,
        candidates: &[String],
        values: &ShortcodeValues<'_>,
    ) -> Result<String, TemplateError> {
        for name in candidates {
            let template = match self.env.get_template(name) {
                Ok(template) => template,
                Err(err) if err.kind() == ErrorKind::TemplateNotFound => continue,
                Err(err) => return Err(TemplateError::render(err)),
            };
            return template
                .render(context! { values => values, this => self.page, pad => self.pad })
                .map_err(TemplateError::render);
        }
        Err(TemplateError::NotFound {
            name: candidates.first().cloned().unwrap_or_default(),
        })
    }

    fn record(&self) -> Option<&dyn Record> {
        Some(self.page)
    }
}

/// Render `name` with an empty context, or `None` if it does not exist.
pub(crate) fn render_if_exists(
    env: &Environment<'_>,
    name: &str,
) -> Result<Option<String>, minijinja::Error> {
    match env.get_template(name) {
        Ok(template) => template.render(context! {}).map(Some),
        Err(err) if err.kind() == ErrorKind::TemplateNotFound => Ok(None),
        Err(err) => Err(err),
    }
}
