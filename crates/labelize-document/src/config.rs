//! Markup conventions

use serde::{Deserialize, Serialize};

/// Default marker element name
pub const DEFAULT_MARKER_TAG: &str = "manual_label";

/// Default token opening the descriptor comment
pub const DEFAULT_SCHEMA_SENTINEL: &str = "labelize-schema";

/// Names used to find markers and the descriptor comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Element name wrapping each mention
    pub marker_tag: String,
    /// First token of the descriptor comment
    pub schema_sentinel: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            marker_tag: DEFAULT_MARKER_TAG.to_string(),
            schema_sentinel: DEFAULT_SCHEMA_SENTINEL.to_string(),
        }
    }
}

impl MarkupConfig {
    /// Builder: set marker element name
    #[must_use]
    pub fn with_marker_tag(mut self, tag: impl Into<String>) -> Self {
        self.marker_tag = tag.into();
        self
    }

    /// Builder: set descriptor sentinel
    #[must_use]
    pub fn with_schema_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.schema_sentinel = sentinel.into();
        self
    }
}
