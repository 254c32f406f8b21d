//! Per-record script and stylesheet aggregation.
//!
//! Templates register assets while a page renders (`add_script`) and emit
//! them once at the end of the page (`gen_js`). Buckets are keyed by the
//! record's path and live for one build pass of that record.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use indexmap::{IndexMap, IndexSet};
use sc_renderer::escape_html;

/// Template included once whenever a stylesheet was registered.
pub const ADD_CSS_TEMPLATE: &str = "shortcodes/add_css.js";

/// How a script source should be registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScriptOptions {
    /// Source is inline JavaScript.
    pub embed: bool,
    /// Source is the name of a template to include.
    pub template: bool,
    /// Wrap inline JavaScript in a jQuery ready handler.
    pub jquery: bool,
    /// Source is a stylesheet URL.
    pub css: bool,
    /// Load the script link with `async`.
    pub is_async: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            embed: false,
            template: false,
            jquery: true,
            css: false,
            is_async: false,
        }
    }
}

/// Assets registered for one record, each category in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetBucket {
    links: IndexMap<String, bool>,
    embeds: IndexSet<String>,
    templates: IndexSet<String>,
    stylesheets: IndexSet<String>,
}

impl AssetBucket {
    /// Register `src`. Blank sources are ignored.
    ///
    /// A repeated script link keeps its position but takes the latest
    /// `is_async` flag.
    pub fn add(&mut self, src: &str, options: ScriptOptions) {
        let src = src.trim();
        if src.is_empty() {
            return;
        }
        if options.css {
            self.stylesheets.insert(src.to_owned());
        } else if options.embed {
            let code = if options.jquery {
                format!("jQuery(function($) {{ {src} }})")
            } else {
                src.to_owned()
            };
            self.embeds.insert(code);
        } else if options.template {
            self.templates.insert(src.to_owned());
        } else {
            self.links.insert(src.to_owned(), options.is_async);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.embeds.is_empty()
            && self.templates.is_empty()
            && self.stylesheets.is_empty()
    }

    /// Render the bucket as newline-joined markup.
    ///
    /// Stylesheets turn into an `API.add_css(..)` embed plus the
    /// [`ADD_CSS_TEMPLATE`] include. Output order is script links, template
    /// includes, then embeds. `include` renders a template by name and
    /// returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `include`.
    pub fn render<E>(
        &self,
        mut include: impl FnMut(&str) -> Result<Option<String>, E>,
    ) -> Result<String, E> {
        let mut templates = self.templates.clone();
        let mut embeds = self.embeds.clone();
        for href in &self.stylesheets {
            templates.insert(ADD_CSS_TEMPLATE.to_owned());
            embeds.insert(format!("API.add_css(\"{}\")", escape_html(href)));
        }

        let mut parts = Vec::with_capacity(self.links.len() + templates.len() + embeds.len());
        for (src, is_async) in &self.links {
            let flag = if *is_async { " async" } else { "" };
            parts.push(format!("<script src=\"{}\"{flag}></script>", escape_html(src)));
        }
        for name in &templates {
            match include(name)? {
                Some(js) => parts.push(format!("<script>{js}</script>")),
                None => {
                    tracing::warn!(template = %name, "Script template not found");
                    parts.push(format!("[shortcode template {name} not found]"));
                }
            }
        }
        for code in &embeds {
            parts.push(format!("<script>{code}</script>"));
        }
        Ok(parts.join("\n"))
    }
}

/// Asset buckets for every record currently being built.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    buckets: Mutex<HashMap<String, AssetBucket>>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a build pass for `key`, discarding anything left from a
    /// previous pass.
    pub fn begin_record(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Finish a build pass for `key`.
    pub fn end_record(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Register an asset for `key`. Always returns an empty string so it
    /// can be called from a template expression.
    pub fn add_script(&self, key: &str, src: &str, options: ScriptOptions) -> &'static str {
        if src.trim().is_empty() {
            return "";
        }
        tracing::debug!(record = %key, src = %src.trim(), ?options, "Registered asset");
        self.lock().entry(key.to_owned()).or_default().add(src, options);
        ""
    }

    /// Snapshot of the bucket for `key`.
    #[must_use]
    pub fn bucket(&self, key: &str) -> Option<AssetBucket> {
        self.lock().get(key).cloned()
    }

    /// Render the assets registered for `key`; empty when there are none.
    ///
    /// The registry is not locked while `include` runs, so included
    /// templates may register further assets.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `include`.
    pub fn gen_js<E>(
        &self,
        key: &str,
        include: impl FnMut(&str) -> Result<Option<String>, E>,
    ) -> Result<String, E> {
        match self.bucket(key) {
            Some(bucket) => bucket.render(include),
            None => Ok(String::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, AssetBucket>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use pretty_assertions::assert_eq;

    use super::*;

    fn no_templates(_: &str) -> Result<Option<String>, Infallible> {
        Ok(None)
    }

    fn embed() -> ScriptOptions {
        ScriptOptions {
            embed: true,
            ..ScriptOptions::default()
        }
    }

    #[test]
    fn test_add_script_returns_empty_string() {
        let registry = AssetRegistry::new();
        assert_eq!(registry.add_script("/a", "a.js", ScriptOptions::default()), "");
    }

    #[test]
    fn test_blank_source_ignored() {
        let registry = AssetRegistry::new();
        registry.add_script("/a", "   ", ScriptOptions::default());
        assert!(registry.bucket("/a").is_none());
    }

    #[test]
    fn test_duplicate_link_last_write_wins() {
        let registry = AssetRegistry::new();
        registry.add_script("/a", "a.js", ScriptOptions::default());
        registry.add_script(
            "/a",
            " a.js ",
            ScriptOptions {
                is_async: true,
                ..ScriptOptions::default()
            },
        );

        let html = registry.gen_js("/a", no_templates).unwrap();
        assert_eq!(html, r#"<script src="a.js" async></script>"#);
    }

    #[test]
    fn test_async_flag_can_be_cleared() {
        let registry = AssetRegistry::new();
        let async_opts = ScriptOptions {
            is_async: true,
            ..ScriptOptions::default()
        };
        registry.add_script("/a", "a.js", async_opts);
        registry.add_script("/a", "b.js", ScriptOptions::default());
        registry.add_script("/a", "a.js", ScriptOptions::default());

        let html = registry.gen_js("/a", no_templates).unwrap();
        assert_eq!(html, "<script src=\"a.js\"></script>\n<script src=\"b.js\"></script>");
    }

    #[test]
    fn test_embed_wrapped_in_jquery() {
        let mut bucket = AssetBucket::default();
        bucket.add("init()", embed());
        bucket.add(
            "raw()",
            ScriptOptions {
                jquery: false,
                ..embed()
            },
        );
        bucket.add("init()", embed());

        let html = bucket.render(no_templates).unwrap();
        assert_eq!(html, "<script>jQuery(function($) { init() })</script>\n<script>raw()</script>");
    }

    #[test]
    fn test_category_priority() {
        let mut bucket = AssetBucket::default();
        bucket.add(
            "x",
            ScriptOptions {
                css: true,
                embed: true,
                template: true,
                ..ScriptOptions::default()
            },
        );
        bucket.add(
            "y",
            ScriptOptions {
                embed: true,
                template: true,
                jquery: false,
                ..ScriptOptions::default()
            },
        );

        let expected = AssetBucket {
            stylesheets: IndexSet::from(["x".to_owned()]),
            embeds: IndexSet::from(["y".to_owned()]),
            ..AssetBucket::default()
        };
        assert_eq!(bucket, expected);
    }

    #[test]
    fn test_render_order() {
        let mut bucket = AssetBucket::default();
        bucket.add("go()", embed());
        bucket.add(
            "shortcodes/map.js",
            ScriptOptions {
                template: true,
                ..ScriptOptions::default()
            },
        );
        bucket.add("lib.js", ScriptOptions::default());
        bucket.add(
            "https://cdn.example.com/a.css?x=1&y=2",
            ScriptOptions {
                css: true,
                ..ScriptOptions::default()
            },
        );

        let html = bucket
            .render(|name| Ok::<_, Infallible>(Some(format!("/* {name} */"))))
            .unwrap();
        assert_eq!(
            html,
            [
                r#"<script src="lib.js"></script>"#,
                "<script>/* shortcodes/map.js */</script>",
                "<script>/* shortcodes/add_css.js */</script>",
                "<script>jQuery(function($) { go() })</script>",
                r#"<script>API.add_css("https://cdn.example.com/a.css?x=1&amp;y=2")</script>"#,
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_missing_template_diagnostic() {
        let mut bucket = AssetBucket::default();
        bucket.add(
            "shortcodes/gone.js",
            ScriptOptions {
                template: true,
                ..ScriptOptions::default()
            },
        );

        let html = bucket.render(no_templates).unwrap();
        assert_eq!(html, "[shortcode template shortcodes/gone.js not found]");
    }

    #[test]
    fn test_include_error_propagates() {
        let mut bucket = AssetBucket::default();
        bucket.add(
            "shortcodes/broken.js",
            ScriptOptions {
                template: true,
                ..ScriptOptions::default()
            },
        );

        let result = bucket.render(|_| Err("boom"));
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_gen_js_without_bucket_is_empty() {
        let registry = AssetRegistry::new();
        assert_eq!(registry.gen_js("/nothing", no_templates).unwrap(), "");
    }

    #[test]
    fn test_begin_record_clears_previous_pass() {
        let registry = AssetRegistry::new();
        registry.add_script("/a", "a.js", ScriptOptions::default());
        registry.add_script("/b", "b.js", ScriptOptions::default());

        registry.begin_record("/a");

        assert!(registry.bucket("/a").is_none());
        assert!(registry.bucket("/b").is_some());
    }

    #[test]
    fn test_buckets_isolated_per_record() {
        let registry = AssetRegistry::new();
        registry.add_script("/a", "a.js", ScriptOptions::default());
        registry.add_script("/b", "b.js", ScriptOptions::default());

        assert_eq!(registry.gen_js("/a", no_templates).unwrap(), r#"<script src="a.js"></script>"#);
        registry.end_record("/a");
        assert_eq!(registry.gen_js("/a", no_templates).unwrap(), "");
        assert_eq!(registry.gen_js("/b", no_templates).unwrap(), r#"<script src="b.js"></script>"#);
    }
}
