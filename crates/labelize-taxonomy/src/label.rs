//! Label nodes
//!
//! A [`Label`] owns its parameter specs and its child labels. Both maps keep
//! insertion order; names are unique within each map.

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::parameter::ParameterSpec;
use crate::path::PATH_SEPARATOR;
use indexmap::IndexMap;

/// Marker attributes with fixed meaning; parameters may not use these names
/// (compared case-insensitively).
pub const RESERVED_ATTRIBUTES: [&str; 6] = ["labelName", "parent", "labelPath", "style", "class", "color"];

/// Named, colored category with typed parameters and child labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    name: String,
    color: String,
    parameters: IndexMap<String, ParameterSpec>,
    children: IndexMap<String, Label>,
}

impl Label {
    pub(crate) fn new(name: String, color: String) -> Self {
        Self {
            name,
            color,
            parameters: IndexMap::new(),
            children: IndexMap::new(),
        }
    }

    /// Label name (unique among its siblings)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display color
    #[inline]
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Parameter specs in definition order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &IndexMap<String, ParameterSpec> {
        &self.parameters
    }

    /// Look up one parameter spec
    #[inline]
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    /// Child labels in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &IndexMap<String, Label> {
        &self.children
    }

    /// Look up one child label
    #[inline]
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Label> {
        self.children.get(name)
    }

    /// Number of labels in this subtree, excluding this one
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    pub(crate) fn set_color(&mut self, color: String) {
        self.color = color;
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut IndexMap<String, ParameterSpec> {
        &mut self.parameters
    }

    pub(crate) fn children_mut(&mut self) -> &mut IndexMap<String, Label> {
        &mut self.children
    }
}

/// Check a marker attribute name against [`RESERVED_ATTRIBUTES`]
#[must_use]
pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Validate and trim a label name
///
/// # Errors
/// `InvalidName` for empty names, names containing the path separator or
/// control characters
pub fn validate_label_name(name: &str) -> TaxonomyResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains(PATH_SEPARATOR)
        || trimmed.chars().any(char::is_control)
    {
        return Err(TaxonomyError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Validate and trim a parameter name
///
/// Parameter names become marker attribute names, so they follow markup
/// attribute-name rules and must avoid the reserved attributes.
///
/// # Errors
/// `InvalidName` or `ReservedName`
pub fn validate_parameter_name(name: &str) -> TaxonomyResult<&str> {
    let trimmed = name.trim();
    let bad_char =
        |c: char| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=' | '`');
    if trimmed.is_empty() || trimmed.chars().any(bad_char) {
        return Err(TaxonomyError::InvalidName(name.to_string()));
    }
    if is_reserved_attribute(trimmed) {
        return Err(TaxonomyError::ReservedName(trimmed.to_string()));
    }
    Ok(trimmed)
}
