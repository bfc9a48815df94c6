//! Error types for taxonomy operations
//!
//! Every failing operation leaves the taxonomy exactly as it was.

use crate::path::LabelPath;

/// Errors from taxonomy mutations and spec construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    /// Name already used by a sibling label (or sibling parameter)
    #[error("'{name}' already exists under {parent}")]
    DuplicateName {
        /// Scope the collision happened in
        parent: LabelPath,
        /// Colliding name
        name: String,
    },

    /// Parent path does not resolve to a label
    #[error("unknown parent: {0}")]
    UnknownParent(LabelPath),

    /// Path does not resolve to a label
    #[error("unknown label: {0}")]
    UnknownPath(LabelPath),

    /// Label has no parameter with this name
    #[error("label {path} has no parameter '{name}'")]
    UnknownParameter {
        /// Label the lookup ran against
        path: LabelPath,
        /// Missing parameter name
        name: String,
    },

    /// Name is empty or contains characters the document cannot carry
    #[error("invalid name: '{0}'")]
    InvalidName(String),

    /// Parameter name collides with a reserved marker attribute
    #[error("'{0}' is a reserved marker attribute")]
    ReservedName(String),

    /// Color is not a `#rgb` / `#rrggbb` hex string
    #[error("invalid color: '{0}' (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    /// Default value is not a valid value of the spec's type
    #[error("invalid default '{value}' for {kind} parameter")]
    InvalidDefault {
        /// Spec kind (`string`, `checkbox`, `dropdown`)
        kind: &'static str,
        /// Rejected value
        value: String,
    },
}

impl TaxonomyError {
    /// Create duplicate-name error
    pub fn duplicate(parent: &LabelPath, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            parent: parent.clone(),
            name: name.into(),
        }
    }

    /// Create unknown-parameter error
    pub fn unknown_parameter(path: &LabelPath, name: impl Into<String>) -> Self {
        Self::UnknownParameter {
            path: path.clone(),
            name: name.into(),
        }
    }
}

/// Result type alias for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_display() {
        let err = TaxonomyError::duplicate(&LabelPath::root(), "Person");
        assert_eq!(err.to_string(), "'Person' already exists under <root>");
    }

    #[test]
    fn unknown_path_display() {
        let err = TaxonomyError::UnknownPath(LabelPath::from(["Person", "Author"]));
        assert_eq!(err.to_string(), "unknown label: Person/Author");
    }

    #[test]
    fn invalid_default_display() {
        let err = TaxonomyError::InvalidDefault {
            kind: "dropdown",
            value: "c".to_string(),
        };
        assert!(err.to_string().contains("dropdown"));
    }
}
