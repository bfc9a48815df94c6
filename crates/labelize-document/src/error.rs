//! Error types for document codecs
//!
//! - [`CodecError`]: mention encode / edit / remove failures
//! - [`SchemaError`]: embedded descriptor failures

use crate::mention::MentionId;
use labelize_taxonomy::{LabelPath, ParameterKind, TaxonomyError};

/// Errors from the mention codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Selection holds no text once trimmed
    #[error("selection is empty")]
    EmptySelection,

    /// Selection does not address a text span of the document
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// No marker with this identity
    #[error("unknown mention: {0}")]
    UnknownMention(MentionId),

    /// Label path does not resolve in the taxonomy
    #[error("unknown label: {0}")]
    UnknownLabel(LabelPath),

    /// Label has no such parameter
    #[error("label {path} has no parameter '{name}'")]
    UnknownParameter {
        /// Label path
        path: LabelPath,
        /// Parameter name
        name: String,
    },

    /// Value not allowed by the parameter spec
    #[error("'{value}' is not a valid {kind} value for '{name}'")]
    InvalidValue {
        /// Parameter name
        name: String,
        /// Rejected value
        value: String,
        /// Spec type
        kind: ParameterKind,
    },

    /// Taxonomy rule violated
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

/// Errors from the schema codec
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Descriptor comment present but not a valid descriptor
    #[error("malformed descriptor: {reason}")]
    MalformedDescriptor {
        /// Parser or validation message
        reason: String,
    },

    /// Descriptor node rejected by the taxonomy
    #[error("descriptor node {path}: {source}")]
    Taxonomy {
        /// Node being built
        path: LabelPath,
        /// Underlying rule violation
        #[source]
        source: TaxonomyError,
    },

    /// Descriptor could not be serialized
    #[error("descriptor serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl SchemaError {
    /// Create malformed-descriptor error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor { reason: reason.into() }
    }

    /// True for descriptor contents the loader should recover from
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDescriptor { .. } | Self::Taxonomy { .. })
    }
}

/// Result alias for mention codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Result alias for schema codec operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = CodecError::UnknownParameter {
            path: LabelPath::single("Person"),
            name: "size".into(),
        };
        assert_eq!(err.to_string(), "label Person has no parameter 'size'");

        let err = SchemaError::Taxonomy {
            path: LabelPath::from(["Person", "Author"]),
            source: TaxonomyError::InvalidColor("blue".into()),
        };
        assert!(err.to_string().starts_with("descriptor node Person/Author"));
        assert!(err.is_malformed());
    }
}
