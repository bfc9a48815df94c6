//! Mention entity
//!
//! The in-memory form of one labeled span. Business logic works with
//! [`Mention`] values; only the codec reads and writes marker attributes.

use indexmap::IndexMap;
use labelize_taxonomy::LabelPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Identity of a mention within a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionId(Uuid);

impl MentionId {
    /// Fresh random identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MentionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MentionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One application of a label to a text span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Identity of the underlying marker
    pub id: MentionId,
    /// Taxonomy node the mention points at
    pub label_path: LabelPath,
    /// Per-mention parameter values (name → value)
    pub attribute_values: IndexMap<String, String>,
    /// Captured span text
    pub text: String,
    /// Display color
    pub color: String,
    /// False when the label path does not resolve in the taxonomy
    pub resolved: bool,
}

impl Mention {
    /// Label name (last path segment)
    #[must_use]
    pub fn label_name(&self) -> &str {
        self.label_path.last().unwrap_or_default()
    }

    /// Parent label name, empty for root labels
    #[must_use]
    pub fn parent_name(&self) -> &str {
        self.label_path.parent_name().unwrap_or_default()
    }

    /// Current value of a parameter
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.attribute_values.get(name).map(String::as_str)
    }
}
