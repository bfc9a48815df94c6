//! Labelize Taxonomy
//!
//! Ordered label trees with typed parameter specifications.
//!
//! # Core Concepts
//!
//! - [`LabelTaxonomy`]: ordered tree of label definitions
//! - [`Label`]: named, colored node owning parameters and child labels
//! - [`ParameterSpec`]: typed (string / checkbox / dropdown) attribute definition
//! - [`LabelPath`]: hierarchical addressing within the taxonomy
//! - [`Palette`]: color source for labels created without an explicit color
//!
//! # Example
//!
//! ```rust
//! use labelize_taxonomy::{LabelPath, LabelTaxonomy};
//!
//! let mut taxonomy = LabelTaxonomy::new();
//! taxonomy.add_label(&LabelPath::root(), "Person", "#6aa3ff").unwrap();
//! taxonomy.add_label(&LabelPath::single("Person"), "Author", "#20c997").unwrap();
//!
//! let paths: Vec<String> = taxonomy.enumerate().map(|(p, _)| p.to_string()).collect();
//! assert_eq!(paths, ["Person", "Person/Author"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod color;
pub mod error;
pub mod label;
pub mod parameter;
pub mod path;
pub mod taxonomy;

// Re-exports
pub use color::{css_color_to_hex, is_hex_color, same_color, Palette, DEFAULT_PALETTE};
pub use error::{TaxonomyError, TaxonomyResult};
pub use label::{is_reserved_attribute, Label, RESERVED_ATTRIBUTES};
pub use parameter::{bool_literal, parse_bool, ParameterKind, ParameterSpec};
pub use path::{LabelPath, PathError};
pub use taxonomy::{Enumerate, LabelTaxonomy};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for taxonomy operations
    pub use crate::{Label, LabelPath, LabelTaxonomy, ParameterKind, ParameterSpec, TaxonomyError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
