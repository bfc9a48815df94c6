//! Labelize Document
//!
//! Reads and writes label annotations inside markup documents.
//!
//! # Core Concepts
//!
//! - [`Document`]: lossless node sequence (markup, text, comments, markers)
//! - [`Mention`]: one labeled span with its own parameter values
//! - [`MentionCodec`]: selection → marker, marker → mention
//! - [`SchemaCodec`]: taxonomy ⇄ descriptor comment
//! - [`infer_taxonomy`]: label definitions for documents without a descriptor
//!
//! # Example
//!
//! ```rust
//! use labelize_document::{Document, MarkupConfig, MentionCodec, SchemaCodec};
//! use labelize_taxonomy::{LabelPath, LabelTaxonomy};
//!
//! let mut taxonomy = LabelTaxonomy::new();
//! taxonomy.add_label(&LabelPath::root(), "Person", "#6aa3ff").unwrap();
//!
//! let mut doc = Document::parse("<html><head></head><body>Marie Curie</body></html>", &MarkupConfig::default());
//! let selection = doc.find_text("Marie Curie").unwrap();
//! let mention = MentionCodec
//!     .encode(&mut doc, &selection, &LabelPath::single("Person"), &taxonomy)
//!     .unwrap();
//! assert_eq!(mention.text, "Marie Curie");
//!
//! SchemaCodec::default().embed(&mut doc, &taxonomy).unwrap();
//! assert!(doc.render().contains("<!-- labelize-schema"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod marker;
pub mod markup;
pub mod mention;
pub mod selection;

// Re-exports
pub use codec::{infer_taxonomy, MentionCodec, SchemaCodec};
pub use config::{MarkupConfig, DEFAULT_MARKER_TAG, DEFAULT_SCHEMA_SENTINEL};
pub use descriptor::{Descriptor, DescriptorNode};
pub use error::{CodecError, CodecResult, SchemaError, SchemaResult};
pub use marker::Marker;
pub use markup::{Document, Node};
pub use mention::{Mention, MentionId};
pub use selection::Selection;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for document operations
    pub use crate::{
        CodecError, Descriptor, Document, MarkupConfig, Mention, MentionCodec, MentionId, SchemaCodec, SchemaError,
        Selection,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
