//! Configuration management for shortcodes.
//!
//! Parses `shortcodes.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [markdown]
//! separator = ":"
//! img_width = 800
//! shortcode = '(?s)\{\{(.*?)\}\}'
//!
//! [readmore]
//! display_link = true
//! split_text = "---"
//! link_text = "<br/>[{TEXT}]({URL_PATH})"
//!
//! [actions]
//! subscribe = "https://${LIST_HOST}/subscribe"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `readmore.link_text`
//! - every `actions` URL

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "shortcodes.toml";

/// Default read-more link template.
pub const DEFAULT_LINK_TEXT: &str = "<br/>[{TEXT}]({URL_PATH})";

/// Plugin configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering options.
    pub markdown: MarkdownConfig,
    /// Read-more splitting options.
    pub readmore: ReadMoreConfig,
    /// Named form/action URLs for the `action_url` filter.
    pub actions: HashMap<String, String>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[markdown]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Separator between display text and arguments in image/link text.
    pub separator: String,
    /// Base width in pixels for attachment thumbnails.
    pub img_width: u32,
    /// Custom directive delimiter pattern.
    pub shortcode: Option<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            separator: ":".to_owned(),
            img_width: 800,
            shortcode: None,
        }
    }
}

/// `[readmore]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReadMoreConfig {
    /// Append the link to every excerpt.
    pub display_link: bool,
    /// Line that separates the excerpt from the rest of the body.
    pub split_text: String,
    /// Link template with `{URL_PATH}` and `{TEXT}` placeholders.
    pub link_text: String,
}

impl Default for ReadMoreConfig {
    fn default() -> Self {
        Self {
            display_link: false,
            split_text: "---".to_owned(),
            link_text: DEFAULT_LINK_TEXT.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`actions.subscribe`").
        field: String,
        /// Error message (e.g., "${`LIST_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty after trimming.
fn require_non_blank(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `shortcodes.toml` in the current directory
    /// and parents, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Search for the config file in `start` and its parents.
    #[must_use]
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand and validate configuration text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_blank(&self.markdown.separator, "markdown.separator")?;
        if self.markdown.img_width == 0 {
            return Err(ConfigError::Validation(
                "markdown.img_width must be greater than 0".to_owned(),
            ));
        }
        if let Some(pattern) = &self.markdown.shortcode {
            require_non_blank(pattern, "markdown.shortcode")?;
            Regex::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("markdown.shortcode is not a valid regex: {e}"))
            })?;
        }
        require_non_blank(&self.readmore.split_text, "readmore.split_text")?;
        Ok(())
    }

    /// URL for a named action, or the name itself when it is not configured.
    #[must_use]
    pub fn action_url<'a>(&'a self, action: &'a str) -> &'a str {
        self.actions.get(action).map_or(action, String::as_str)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.readmore.link_text =
            expand::expand_env(&self.readmore.link_text, "readmore.link_text")?;
        for (name, url) in &mut self.actions {
            *url = expand::expand_env(url, &format!("actions.{name}"))?;
        }
        Ok(())
    }
}
