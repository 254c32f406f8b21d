//! Read-more excerpts for long-form posts.

use sc_config::ReadMoreConfig;

/// Display text of the read-more link when none is given.
pub const DEFAULT_LINK_LABEL: &str = "Read Full Post";

/// Whether a read-more link is appended to the excerpt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReadMoreLink {
    /// No link unless the site enables `display_link`.
    Hidden,
    /// Link labelled [`DEFAULT_LINK_LABEL`].
    #[default]
    Default,
    /// Link with a custom label.
    Custom(String),
}

/// Per-call read-more options.
#[derive(Clone, Debug, Default)]
pub struct ReadMoreOptions {
    pub link: ReadMoreLink,
    /// Split marker overriding the configured one.
    pub split: Option<String>,
}

/// A body split at its read-more marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadMoreSplit {
    /// Text before the first marker, plus the link when requested.
    pub short: String,
    /// The whole body with the first marker line replaced by a blank line.
    pub full: String,
}

/// Splits bodies at a marker line.
#[derive(Clone, Debug)]
pub struct ReadMore {
    display_link: bool,
    split_text: String,
    link_text: String,
}

impl ReadMore {
    #[must_use]
    pub fn new(config: &ReadMoreConfig) -> Self {
        Self {
            display_link: config.display_link,
            split_text: config.split_text.clone(),
            link_text: config.link_text.clone(),
        }
    }

    /// Fill the link template for a post at `url_path`.
    #[must_use]
    pub fn link_text(&self, url_path: &str, label: &str) -> String {
        self.link_text
            .replace("{URL_PATH}", url_path)
            .replace("{TEXT}", label)
    }

    /// Split `body` at the first marker line.
    ///
    /// Returns `None` when the body has no marker.
    #[must_use]
    pub fn process(
        &self,
        body: &str,
        url_path: &str,
        options: &ReadMoreOptions,
    ) -> Option<ReadMoreSplit> {
        let split_text = options.split.as_deref().unwrap_or(&self.split_text);
        let marker = format!("\n{split_text}\n");
        let (head, tail) = body.split_once(&marker)?;

        let mut short = head.to_owned();
        let full = format!("{head}\n\n{tail}");

        let label = match &options.link {
            ReadMoreLink::Custom(text) => Some(text.as_str()),
            ReadMoreLink::Default => Some(DEFAULT_LINK_LABEL),
            ReadMoreLink::Hidden if self.display_link => Some(DEFAULT_LINK_LABEL),
            ReadMoreLink::Hidden => None,
        };
        if let Some(label) = label {
            short.push_str(&self.link_text(url_path, label));
        }

        tracing::debug!(url_path, excerpt_len = head.len(), "Split read-more body");
        Some(ReadMoreSplit { short, full })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn hidden() -> ReadMoreOptions {
        ReadMoreOptions {
            link: ReadMoreLink::Hidden,
            split: None,
        }
    }

    #[test]
    fn test_no_marker() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        assert_eq!(readmore.process("Intro\nRest", "/p/", &hidden()), None);
        assert_eq!(readmore.process("Intro ---\nRest", "/p/", &hidden()), None);
    }

    #[test]
    fn test_split_without_link() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let split = readmore.process("Intro\n---\nRest", "/p/", &hidden()).unwrap();
        assert_eq!(split.short, "Intro");
        assert_eq!(split.full, "Intro\n\nRest");
    }

    #[test]
    fn test_split_with_default_link() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let split = readmore
            .process("Intro\n---\nRest", "/blog/post/", &ReadMoreOptions::default())
            .unwrap();
        assert_eq!(split.short, "Intro<br/>[Read Full Post](/blog/post/)");
    }

    #[test]
    fn test_custom_link_label() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let options = ReadMoreOptions {
            link: ReadMoreLink::Custom("More".to_owned()),
            split: None,
        };
        let split = readmore.process("A\n---\nB", "/x/", &options).unwrap();
        assert_eq!(split.short, "A<br/>[More](/x/)");
    }

    #[test]
    fn test_display_link_forces_link() {
        let config = ReadMoreConfig {
            display_link: true,
            link_text: "\n\n[{TEXT}]({URL_PATH})".to_owned(),
            ..ReadMoreConfig::default()
        };
        let readmore = ReadMore::new(&config);
        let split = readmore.process("A\n---\nB", "/x/", &hidden()).unwrap();
        assert_eq!(split.short, "A\n\n[Read Full Post](/x/)");
    }

    #[test]
    fn test_multiple_markers() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let split = readmore.process("A\n---\nB\n---\nC", "/x/", &hidden()).unwrap();
        assert_eq!(split.short, "A");
        assert_eq!(split.full, "A\n\nB\n---\nC");
    }

    #[test]
    fn test_later_rule_kept_in_full_body() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let split = readmore
            .process("Intro\n---\nPart one\n\n---\nPart two", "/x/", &hidden())
            .unwrap();
        assert_eq!(split.short, "Intro");
        assert_eq!(split.full, "Intro\n\nPart one\n\n---\nPart two");
    }

    #[test]
    fn test_split_override() {
        let readmore = ReadMore::new(&ReadMoreConfig::default());
        let options = ReadMoreOptions {
            link: ReadMoreLink::Hidden,
            split: Some("<!-- more -->".to_owned()),
        };
        assert_eq!(readmore.process("A\n---\nB", "/x/", &options), None);
        let split = readmore.process("A\n<!-- more -->\nB", "/x/", &options).unwrap();
        assert_eq!(split.short, "A");
    }
}
