//! Session configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! default_filename = "labeled.html"
//! color_seed = 42
//! palette = ["#6aa3ff", "#20c997"]
//!
//! [markup]
//! marker_tag = "manual_label"
//! schema_sentinel = "labelize-schema"
//! ```
//!
//! Every key is optional.

use crate::error::{SessionError, SessionResult};
use labelize_document::MarkupConfig;
use labelize_taxonomy::{is_hex_color, Palette, DEFAULT_PALETTE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suggested name for saved documents without a source file name
pub const DEFAULT_FILENAME: &str = "labeled.html";

/// Labelize configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelizeConfig {
    /// Suggested file name when the document has none
    pub default_filename: String,
    /// Seed for label color generation (random when absent)
    pub color_seed: Option<u64>,
    /// Colors handed to labels created without one
    pub palette: Vec<String>,
    /// Marker and descriptor names
    pub markup: MarkupConfig,
}

impl Default for LabelizeConfig {
    fn default() -> Self {
        Self {
            default_filename: DEFAULT_FILENAME.to_string(),
            color_seed: None,
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            markup: MarkupConfig::default(),
        }
    }
}

impl LabelizeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `Config` for syntax errors or invalid values
    pub fn from_toml_str(text: &str) -> SessionResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Config` if it is invalid
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// `Config` if serialization fails
    pub fn to_toml_string(&self) -> SessionResult<String> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Check every value
    ///
    /// # Errors
    /// `Config` naming the first offending key
    pub fn validate(&self) -> SessionResult<()> {
        let invalid = |key: &str, reason: String| Err(SessionError::Config(format!("{key}: {reason}")));

        let tag = &self.markup.marker_tag;
        if tag.is_empty()
            || !tag.starts_with(|c: char| c.is_ascii_alphabetic())
            || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return invalid("markup.marker_tag", format!("'{tag}' is not an element name"));
        }

        let sentinel = &self.markup.schema_sentinel;
        if sentinel.is_empty() || sentinel.contains(char::is_whitespace) || sentinel.contains("--") {
            return invalid(
                "markup.schema_sentinel",
                format!("'{sentinel}' must be one token without '--'"),
            );
        }

        if let Some(color) = self.palette.iter().find(|c| !is_hex_color(c)) {
            return invalid("palette", format!("'{color}' is not a hex color"));
        }

        if self.default_filename.trim().is_empty() {
            return invalid("default_filename", "must not be empty".to_string());
        }
        Ok(())
    }

    /// Palette for new label colors
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::new(&self.palette, self.color_seed)
    }

    /// Builder: set markup names
    #[inline]
    #[must_use]
    pub fn with_markup(mut self, markup: MarkupConfig) -> Self {
        self.markup = markup;
        self
    }

    /// Builder: set color seed
    #[inline]
    #[must_use]
    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Builder: set palette
    #[must_use]
    pub fn with_palette<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set default file name
    #[inline]
    #[must_use]
    pub fn with_default_filename(mut self, name: impl Into<String>) -> Self {
        self.default_filename = name.into();
        self
    }
}
