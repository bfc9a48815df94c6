//! Labelize Core
//!
//! Editing sessions over annotated documents.
//!
//! A [`Session`] holds one label taxonomy and one document. Loading a
//! document rebuilds the taxonomy from its embedded descriptor (or infers it
//! from the markers); saving writes the descriptor back, so the document is
//! the only thing that needs to be kept.
//!
//! # Example
//!
//! ```rust
//! use labelize_core::{LabelizeConfig, Session};
//! use labelize_taxonomy::LabelPath;
//!
//! let mut session = Session::new(LabelizeConfig::default());
//! session.load_document("<html><head></head><body>Marie Curie</body></html>");
//! session.add_label(&LabelPath::root(), "Person", Some("#6aa3ff")).unwrap();
//!
//! let selection = session.select_text("Marie Curie", 0).unwrap();
//! session.apply_label(&selection, &LabelPath::single("Person")).unwrap();
//!
//! let saved = session.serialize_for_save().unwrap();
//! assert!(saved.contains("labelize-schema"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod io;
pub mod session;
pub mod stats;

// Re-exports
pub use config::{LabelizeConfig, DEFAULT_FILENAME};
pub use error::{SessionError, SessionResult};
pub use fingerprint::Fingerprint;
pub use io::{DirectorySink, DocumentSink, DocumentSource, FileDocument, MemoryDocument};
pub use session::{Session, TaxonomyOrigin};
pub use stats::SessionStats;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for sessions
    pub use crate::{
        DocumentSink, DocumentSource, FileDocument, LabelizeConfig, Session, SessionError, SessionResult,
        TaxonomyOrigin,
    };
    pub use labelize_document::{Mention, MentionId, Selection};
    pub use labelize_taxonomy::{LabelPath, LabelTaxonomy, ParameterSpec};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
