//! Template host for shortcode rendering.
//!
//! [`Site`] owns a minijinja environment, the renderer chain from
//! `sc-renderer` and the per-record [`AssetRegistry`]. Shortcode templates
//! are looked up as `shortcodes/{command}.html` and see `values`, `this`
//! and `pad`.
//!
//! Templates also get these filters: `mergedict`, `page_slugs`, `split`,
//! `tostyles`, `shorten`, `readmore`, `add_script`, `gen_js` and
//! `action_url`, plus the `json_request(url, params)` global.

mod assets;
mod context;
mod error;
mod filters;
mod http;
mod page;
mod readmore;
mod site;

pub use assets::{ADD_CSS_TEMPLATE, AssetBucket, AssetRegistry, ScriptOptions};
pub use context::{Pad, PageContext, PageSummary};
pub use error::SiteError;
pub use filters::truncate;
pub use http::JsonClient;
pub use page::{Attachment, AttachmentImage, Page};
pub use readmore::{DEFAULT_LINK_LABEL, ReadMore, ReadMoreLink, ReadMoreOptions, ReadMoreSplit};
pub use site::Site;
