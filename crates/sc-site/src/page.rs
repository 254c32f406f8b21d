//! Content records and their image attachments.

use sc_renderer::{Image, ImageQuery, Record};
use serde::Serialize;

/// File extensions treated as image attachments.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// A file attached to a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// File name, unique within the page.
    pub id: String,
    /// Author-supplied description, matched by `![..](Description)`.
    pub description: Option<String>,
}

impl Attachment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.id.rsplit_once('.').is_some_and(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
    }

    fn matches(&self, needle: &str) -> bool {
        self.id == needle || self.description.as_deref() == Some(needle)
    }
}

/// A content page: the unit that is built, and the `this` of its templates.
#[derive(Clone, Debug, Serialize)]
pub struct Page {
    /// Record key, e.g. `/blog/first-post` or `/blog@2` for pagination.
    pub path: String,
    /// Last path segment.
    pub slug: String,
    /// URL of the page, always ending in `/`.
    pub url_path: String,
    pub title: String,
    /// Markdown source.
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl Page {
    /// Create a page. `path` is normalized to a leading `/` without a
    /// trailing one.
    pub fn new(path: &str, title: impl Into<String>, body: impl Into<String>) -> Self {
        let trimmed = path.trim_matches('/');
        let path = format!("/{trimmed}");
        let base = trimmed.split_once('@').map_or(trimmed, |(base, _)| base);
        let slug = base.rsplit('/').next().unwrap_or_default().to_owned();
        let url_path = if base.is_empty() {
            "/".to_owned()
        } else {
            format!("/{base}/")
        };
        Self {
            path,
            slug,
            url_path,
            title: title.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    fn images(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.is_image())
    }
}

impl Record for Page {
    fn path(&self) -> &str {
        &self.path
    }

    fn resolve_url(&self, target: &str) -> String {
        join_url(&self.url_path, target)
    }

    fn attachment_image(&self, query: ImageQuery<'_>) -> Option<Box<dyn Image>> {
        let found = match query {
            ImageQuery::Index(0) => None,
            ImageQuery::Index(n) => self.images().nth(n - 1),
            ImageQuery::Matching(needle) => self.images().find(|a| a.matches(needle)),
        };
        found.map(|a| Box::new(AttachmentImage::new(a.id.clone())) as Box<dyn Image>)
    }
}

/// An image attachment or one of its thumbnails, addressed relative to its
/// page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentImage {
    path: String,
}

impl AttachmentImage {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Image for AttachmentImage {
    fn url_path(&self) -> String {
        self.path.clone()
    }

    /// Thumbnails are named `stem@WIDTH.ext` next to the original.
    fn thumbnail(&self, width: u32) -> Box<dyn Image> {
        let path = match self.path.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}@{width}.{ext}"),
            None => format!("{}@{width}", self.path),
        };
        Box::new(Self { path })
    }
}

/// Resolve `target` against the directory URL `base`.
///
/// Absolute targets are returned unchanged; `.` and `..` segments are
/// collapsed. A query or fragment is carried over as is.
fn join_url(base: &str, target: &str) -> String {
    if target.starts_with('/') {
        return target.to_owned();
    }
    let (path, suffix) = target
        .find(['?', '#'])
        .map_or((target, ""), |i| target.split_at(i));

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let last = path.rsplit('/').next().unwrap_or_default();
    let is_dir = matches!(last, "" | "." | "..");
    let mut url = format!("/{}", segments.join("/"));
    if is_dir && !segments.is_empty() {
        url.push('/');
    }
    url.push_str(suffix);
    url
}
