//! Page building: markdown through the shortcode renderer chain, then the
//! page template.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use minijinja::{Environment, Value, context};
use sc_config::{Config, MarkdownConfig};
use sc_renderer::{
    AdmonitionRenderer, HtmlRenderer, MarkdownRenderer, ShortcodeConfig, ShortcodeRenderer,
};

use crate::assets::AssetRegistry;
use crate::context::{Pad, PageContext, PageSummary};
use crate::error::SiteError;
use crate::filters::Filters;
use crate::http::JsonClient;
use crate::page::Page;
use crate::readmore::{ReadMore, ReadMoreLink, ReadMoreOptions};

/// Renderer chain used for page bodies.
type BodyRenderer = AdmonitionRenderer<ShortcodeRenderer<HtmlRenderer>>;

/// A set of pages sharing one template environment and configuration.
///
/// # Example
///
/// ```
/// use sc_config::Config;
/// use sc_site::{Page, Site};
///
/// let mut site = Site::new(&Config::default()).unwrap();
/// site.add_template("shortcodes/hr.html", "<hr class=\"{{ values.args[0] }}\">")
///     .unwrap();
/// site.add_template("page.html", "{{ body }}").unwrap();
/// site.insert_page(Page::new("/about", "About", "Hello\n\n{{ hr wide }}"));
///
/// let html = site.render_page("/about", "page.html").unwrap();
/// assert_eq!(html, "<p>Hello</p><hr class=\"wide\">");
/// ```
pub struct Site {
    env: Environment<'static>,
    renderer: BodyRenderer,
    readmore: Arc<ReadMore>,
    assets: Arc<AssetRegistry>,
    pages: IndexMap<String, Page>,
    pad: Pad,
}

impl Site {
    /// Create a site with an empty template environment.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Shortcode`] if the configured delimiter pattern
    /// does not compile.
    pub fn new(config: &Config) -> Result<Self, SiteError> {
        let shortcodes = shortcode_config(&config.markdown)?;
        let readmore = Arc::new(ReadMore::new(&config.readmore));
        let assets = Arc::new(AssetRegistry::new());

        let mut env = Environment::new();
        Filters {
            readmore: Arc::clone(&readmore),
            assets: Arc::clone(&assets),
            actions: Arc::new(config.actions.clone()),
            http: JsonClient::default(),
        }
        .register(&mut env);

        tracing::info!(
            pattern = %shortcodes.pattern(),
            separator = %shortcodes.separator(),
            img_width = shortcodes.img_width(),
            actions = config.actions.len(),
            "Initialized shortcode site"
        );

        Ok(Self {
            env,
            renderer: AdmonitionRenderer::new(ShortcodeRenderer::new(HtmlRenderer, &shortcodes)),
            readmore,
            assets,
            pages: IndexMap::new(),
            pad: Pad::default(),
        })
    }

    /// Load templates from `dir` on demand.
    #[must_use]
    pub fn with_template_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.env.set_loader(minijinja::path_loader(dir));
        self
    }

    /// Register a template from source.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Template`] on a syntax error.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), SiteError> {
        self.env.add_template_owned(name.into(), source.into())?;
        Ok(())
    }

    /// Add or replace a page.
    pub fn insert_page(&mut self, page: Page) {
        self.pages.insert(page.path.clone(), page);
        self.pad.pages = self.pages.values().map(PageSummary::from).collect();
    }

    #[must_use]
    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    #[must_use]
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Render markdown as part of `page`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Shortcode`] when a shortcode template fails.
    pub fn render_markdown(&self, page: &Page, markdown: &str) -> Result<String, SiteError> {
        let ctx = PageContext::new(&self.env, page, &self.pad);
        let mut renderer = MarkdownRenderer::new(&self.renderer);
        Ok(renderer.render_markdown(markdown, Some(&ctx))?.html)
    }

    /// Build the page at `path` with `template`.
    ///
    /// The template sees `this` (the page), `pad`, `body` (rendered HTML)
    /// and `body_short` (the rendered read-more excerpt, or none). Assets
    /// registered during a previous build of the same page are discarded
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PageNotFound`] for an unknown path, or the first
    /// rendering error.
    pub fn render_page(&self, path: &str, template: &str) -> Result<String, SiteError> {
        let page = self
            .pages
            .get(path)
            .ok_or_else(|| SiteError::PageNotFound(path.to_owned()))?;

        self.assets.begin_record(&page.path);
        let result = self.build(page, template);
        self.assets.end_record(&page.path);

        if let Err(err) = &result {
            tracing::warn!(path = %page.path, error = %err, "Page build failed");
        }
        result
    }

    fn build(&self, page: &Page, template: &str) -> Result<String, SiteError> {
        let options = ReadMoreOptions {
            link: ReadMoreLink::Hidden,
            split: None,
        };
        let (body, body_short) = match self.readmore.process(&page.body, &page.url_path, &options) {
            Some(split) => (
                self.render_markdown(page, &split.full)?,
                Some(self.render_markdown(page, &split.short)?),
            ),
            None => (self.render_markdown(page, &page.body)?, None),
        };

        let html = self.env.get_template(template)?.render(context! {
            this => page,
            pad => &self.pad,
            body => Value::from_safe_string(body),
            body_short => body_short.map(Value::from_safe_string),
        })?;

        tracing::debug!(path = %page.path, template, "Rendered page");
        Ok(html)
    }
}

fn shortcode_config(markdown: &MarkdownConfig) -> Result<ShortcodeConfig, SiteError> {
    let mut config = ShortcodeConfig::new()
        .with_separator(&markdown.separator)
        .with_img_width(markdown.img_width);
    if let Some(pattern) = &markdown.shortcode {
        config = config.with_pattern(pattern)?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page::Attachment;

    const PAGE_TEMPLATE: &str = "<article>{{ body }}</article>\
        {% if body_short %}<aside>{{ body_short }}</aside>{% endif %}\
        {{ this|gen_js }}";

    fn site() -> Site {
        let mut site = Site::new(&Config::default()).unwrap();
        site.add_template(
            "shortcodes/tweet.html",
            "<blockquote data-id=\"{{ values.id }}\">{{ this.title }}</blockquote>\
             {{ this|add_script('https://platform.example.com/widgets.js', async=true) }}",
        )
        .unwrap();
        site.add_template("shortcodes/broken.html", "{% include 'gone.html' %}")
            .unwrap();
        site.add_template("page.html", PAGE_TEMPLATE).unwrap();
        site
    }

    fn trip() -> Page {
        Page::new("/blog/trip", "Trip", "")
            .with_attachment(Attachment::new("beach.jpg").with_description("Beach"))
    }

    #[test]
    fn test_render_markdown_resolves_shortcodes_and_images() {
        let site = site();
        let page = trip();
        let html = site
            .render_markdown(
                &page,
                "{{ tweet id=123 }}\n\n![Beach:w-50](@1)\n\nSee [map:-new-tab](map/).",
            )
            .unwrap();
        assert_eq!(
            html,
            "<blockquote data-id=\"123\">Trip</blockquote>\
             <p><img src=\"/blog/trip/beach@400.jpg\" class=\"w-50\" alt=\"Beach\"></p>\
             <p>See <a href=\"/blog/trip/map/\" target=\"_blank\" rel=\"noreferrer noopener\">map</a>.</p>"
        );
    }

    #[test]
    fn test_missing_shortcode_template_is_inline_diagnostic() {
        let site = site();
        let html = site.render_markdown(&trip(), "Before {{ nope 1 }} after").unwrap();
        assert_eq!(
            html,
            "<p>Before [could not find \"shortcode/nope.html\" template] after</p>"
        );
    }

    #[test]
    fn test_broken_shortcode_template_fails() {
        let site = site();
        let err = site.render_markdown(&trip(), "{{ broken }}").unwrap_err();
        assert!(matches!(err, SiteError::Shortcode(_)));
    }

    #[test]
    fn test_render_page_with_assets_and_readmore() {
        let mut site = site();
        site.insert_page(Page::new("/blog/post", "Post", "Intro\n---\n{{ tweet id=7 }}"));

        let html = site.render_page("/blog/post", "page.html").unwrap();
        assert_eq!(
            html,
            "<article><p>Intro</p><blockquote data-id=\"7\">Post</blockquote></article>\
             <aside><p>Intro</p></aside>\
             <script src=\"https://platform.example.com/widgets.js\" async></script>"
        );
        assert!(site.assets().bucket("/blog/post").is_none());
    }

    #[test]
    fn test_render_page_clears_previous_assets() {
        let mut site = site();
        site.insert_page(Page::new("/plain", "Plain", "Nothing here"));
        site.assets().add_script("/plain", "stale.js", crate::ScriptOptions::default());

        let html = site.render_page("/plain", "page.html").unwrap();
        assert_eq!(html, "<article><p>Nothing here</p></article>");
    }

    #[test]
    fn test_render_page_unknown_path() {
        let site = site();
        let err = site.render_page("/missing", "page.html").unwrap_err();
        assert!(matches!(err, SiteError::PageNotFound(ref p) if p == "/missing"));
    }

    #[test]
    fn test_custom_pattern_and_separator() {
        let mut config = Config::default();
        config.markdown.shortcode = Some(r"(?s)\[\[(.*?)\]\]".to_owned());
        config.markdown.separator = "|".to_owned();
        let mut site = Site::new(&config).unwrap();
        site.add_template("shortcodes/hr.html", "<hr>").unwrap();

        let html = site
            .render_markdown(&trip(), "[[ hr ]]\n\n![Logo|float-end](logo.png)")
            .unwrap();
        assert_eq!(
            html,
            "<hr><p><img src=\"logo.png\" class=\"float-end\" alt=\"Logo\"></p>"
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let mut config = Config::default();
        config.markdown.shortcode = Some("(unclosed".to_owned());
        assert!(matches!(Site::new(&config), Err(SiteError::Shortcode(_))));
    }

    #[test]
    fn test_template_dir_loader() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shortcodes")).unwrap();
        std::fs::write(dir.path().join("shortcodes/note.html"), "<em>{{ values.args[0] }}</em>")
            .unwrap();
        let site = Site::new(&Config::default()).unwrap().with_template_dir(dir.path());

        let html = site.render_markdown(&trip(), "A {{ note hi }}").unwrap();
        assert_eq!(html, "<p>A <em>hi</em></p>");
    }
}
