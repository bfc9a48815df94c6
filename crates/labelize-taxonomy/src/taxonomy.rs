//! Label taxonomy
//!
//! Provides [`LabelTaxonomy`], the ordered tree of label definitions, and its
//! depth-first [`Enumerate`] iterator.

use crate::color::is_hex_color;
use crate::error::{TaxonomyError, TaxonomyResult};
use crate::label::{validate_label_name, validate_parameter_name, Label};
use crate::parameter::ParameterSpec;
use crate::path::LabelPath;
use indexmap::IndexMap;
use std::iter::FusedIterator;

/// Ordered tree of label definitions
///
/// Roots and every label's children keep insertion order. All mutations
/// validate first and mutate last: a failed call leaves the tree unchanged.
///
/// # Example
/// ```
/// use labelize_taxonomy::{LabelPath, LabelTaxonomy, ParameterSpec};
///
/// let mut taxonomy = LabelTaxonomy::new();
/// taxonomy.add_label(&LabelPath::root(), "Person", "#6aa3ff").unwrap();
/// taxonomy
///     .add_parameter(&LabelPath::single("Person"), "role", ParameterSpec::dropdown(["author", "subject"]))
///     .unwrap();
///
/// let person = taxonomy.resolve(&LabelPath::single("Person")).unwrap();
/// assert_eq!(person.parameter("role").unwrap().default_value(), "author");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTaxonomy {
    roots: IndexMap<String, Label>,
}

impl LabelTaxonomy {
    /// Create empty taxonomy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root labels in insertion order
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &IndexMap<String, Label> {
        &self.roots
    }

    /// True when no labels are defined
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of labels at every depth
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.roots.values().map(|r| 1 + r.descendant_count()).sum()
    }

    /// Remove every label
    pub fn clear(&mut self) {
        self.roots.clear();
        tracing::debug!("taxonomy cleared");
    }

    /// Resolve a path to its label
    #[must_use]
    pub fn resolve(&self, path: &LabelPath) -> Option<&Label> {
        let (first, rest) = path.segments().split_first()?;
        rest.iter()
            .try_fold(self.roots.get(first)?, |label, segment| label.child(segment))
    }

    fn resolve_mut(&mut self, path: &LabelPath) -> Option<&mut Label> {
        let (first, rest) = path.segments().split_first()?;
        let mut label = self.roots.get_mut(first)?;
        for segment in rest {
            label = label.children_mut().get_mut(segment)?;
        }
        Some(label)
    }

    /// Sibling map under `parent` (the root map for the empty path)
    fn scope_mut(&mut self, parent: &LabelPath) -> Option<&mut IndexMap<String, Label>> {
        if parent.is_empty() {
            Some(&mut self.roots)
        } else {
            self.resolve_mut(parent).map(Label::children_mut)
        }
    }

    /// Add a label under `parent_path`
    ///
    /// The new label is appended after its existing siblings.
    ///
    /// # Errors
    /// - `InvalidName` / `InvalidColor` for malformed input
    /// - `UnknownParent` if `parent_path` does not resolve
    /// - `DuplicateName` if a sibling already uses `name`
    pub fn add_label(
        &mut self,
        parent_path: &LabelPath,
        name: &str,
        color: &str,
    ) -> TaxonomyResult<&Label> {
        let name = validate_label_name(name)?.to_string();
        let color = color.trim();
        if !is_hex_color(color) {
            return Err(TaxonomyError::InvalidColor(color.to_string()));
        }

        let siblings = self
            .scope_mut(parent_path)
            .ok_or_else(|| TaxonomyError::UnknownParent(parent_path.clone()))?;
        if siblings.contains_key(&name) {
            return Err(TaxonomyError::duplicate(parent_path, name));
        }

        tracing::debug!(parent = %parent_path, name = %name, color, "label added");
        let entry = siblings
            .entry(name.clone())
            .or_insert_with(|| Label::new(name, color.to_string()));
        Ok(entry)
    }

    /// Remove a label and its entire subtree
    ///
    /// Remaining siblings keep their relative order.
    ///
    /// # Errors
    /// `UnknownPath` if `path` does not resolve
    pub fn remove_label(&mut self, path: &LabelPath) -> TaxonomyResult<Label> {
        let unknown = || TaxonomyError::UnknownPath(path.clone());
        let (parent, name) = path.parent().zip(path.last()).ok_or_else(unknown)?;
        let removed = self
            .scope_mut(&parent)
            .and_then(|siblings| siblings.shift_remove(name))
            .ok_or_else(unknown)?;

        tracing::debug!(path = %path, descendants = removed.descendant_count(), "label removed");
        Ok(removed)
    }

    /// Recolor a label
    ///
    /// # Errors
    /// `InvalidColor` or `UnknownPath`
    pub fn set_color(&mut self, path: &LabelPath, color: &str) -> TaxonomyResult<()> {
        let color = color.trim();
        if !is_hex_color(color) {
            return Err(TaxonomyError::InvalidColor(color.to_string()));
        }
        let label = self
            .resolve_mut(path)
            .ok_or_else(|| TaxonomyError::UnknownPath(path.clone()))?;
        label.set_color(color.to_string());
        Ok(())
    }

    /// Insert or overwrite a parameter spec
    ///
    /// Overwriting keeps the parameter's position; new names are appended.
    /// Returns the replaced spec, if any.
    ///
    /// # Errors
    /// - `InvalidName` / `ReservedName` for unusable names
    /// - `InvalidDefault` if the spec violates its own invariants
    /// - `UnknownPath` if `path` does not resolve
    pub fn add_parameter(
        &mut self,
        path: &LabelPath,
        name: &str,
        spec: ParameterSpec,
    ) -> TaxonomyResult<Option<ParameterSpec>> {
        let name = validate_parameter_name(name)?.to_string();
        spec.validate()?;
        let label = self
            .resolve_mut(path)
            .ok_or_else(|| TaxonomyError::UnknownPath(path.clone()))?;

        tracing::debug!(path = %path, name = %name, kind = %spec.kind(), "parameter set");
        Ok(label.parameters_mut().insert(name, spec))
    }

    /// Delete a parameter spec
    ///
    /// # Errors
    /// `UnknownPath` or `UnknownParameter`
    pub fn remove_parameter(&mut self, path: &LabelPath, name: &str) -> TaxonomyResult<ParameterSpec> {
        let label = self
            .resolve_mut(path)
            .ok_or_else(|| TaxonomyError::UnknownPath(path.clone()))?;
        let removed = label
            .parameters_mut()
            .shift_remove(name)
            .ok_or_else(|| TaxonomyError::unknown_parameter(path, name))?;

        tracing::debug!(path = %path, name, "parameter removed");
        Ok(removed)
    }

    /// Rename and/or retype a parameter in one step, keeping its position
    ///
    /// # Errors
    /// - `UnknownPath` / `UnknownParameter` if the target is missing
    /// - `DuplicateName` if `new_name` is taken by another parameter
    /// - name and spec validation errors as for [`add_parameter`](Self::add_parameter)
    pub fn rename_parameter(
        &mut self,
        path: &LabelPath,
        old_name: &str,
        new_name: &str,
        spec: ParameterSpec,
    ) -> TaxonomyResult<()> {
        let new_name = validate_parameter_name(new_name)?.to_string();
        spec.validate()?;
        let label = self
            .resolve_mut(path)
            .ok_or_else(|| TaxonomyError::UnknownPath(path.clone()))?;
        let parameters = label.parameters_mut();
        let index = parameters
            .get_index_of(old_name)
            .ok_or_else(|| TaxonomyError::unknown_parameter(path, old_name))?;
        if new_name != old_name && parameters.contains_key(&new_name) {
            return Err(TaxonomyError::duplicate(path, new_name));
        }

        parameters.shift_remove_index(index);
        parameters.shift_insert(index, new_name.clone(), spec);
        tracing::debug!(path = %path, from = old_name, to = %new_name, "parameter renamed");
        Ok(())
    }

    /// Depth-first walk: parent before children, siblings in insertion order
    ///
    /// The iterator is lazy and borrows the taxonomy; call again to restart.
    #[inline]
    #[must_use]
    pub fn enumerate(&self) -> Enumerate<'_> {
        Enumerate {
            stack: vec![(LabelPath::root(), self.roots.iter())],
        }
    }

    /// Every label path in [`enumerate`](Self::enumerate) order
    #[must_use]
    pub fn label_paths(&self) -> Vec<LabelPath> {
        self.enumerate().map(|(path, _)| path).collect()
    }
}

/// Depth-first iterator over `(path, label)` pairs
#[derive(Debug, Clone)]
pub struct Enumerate<'a> {
    stack: Vec<(LabelPath, indexmap::map::Iter<'a, String, Label>)>,
}

impl<'a> Iterator for Enumerate<'a> {
    type Item = (LabelPath, &'a Label);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, siblings) = self.stack.last_mut()?;
            match siblings.next() {
                Some((name, label)) => {
                    let path = prefix.child(name.clone());
                    if !label.children().is_empty() {
                        self.stack.push((path.clone(), label.children().iter()));
                    }
                    return Some((path, label));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl FusedIterator for Enumerate<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root() -> LabelPath {
        LabelPath::root()
    }

    fn sample() -> LabelTaxonomy {
        let mut t = LabelTaxonomy::new();
        t.add_label(&root(), "Person", "#6aa3ff").unwrap();
        t.add_label(&root(), "Place", "#20c997").unwrap();
        t.add_label(&LabelPath::single("Person"), "Author", "#ffc107").unwrap();
        t.add_label(&LabelPath::single("Person"), "Subject", "#dc3545").unwrap();
        t.add_label(&LabelPath::from(["Person", "Author"]), "Poet", "#6f42c1").unwrap();
        t
    }

    #[test]
    fn add_then_resolve() {
        let t = sample();
        let poet = t.resolve(&LabelPath::from(["Person", "Author", "Poet"])).unwrap();
        assert_eq!(poet.name(), "Poet");
        assert_eq!(poet.color(), "#6f42c1");
        assert!(t.resolve(&LabelPath::from(["Person", "Nobody"])).is_none());
        assert!(t.resolve(&root()).is_none());
    }

    #[test]
    fn duplicate_sibling_rejected() {
        let mut t = sample();
        let before = t.clone();
        let err = t.add_label(&LabelPath::single("Person"), "Author", "#000").unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateName { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn same_name_allowed_at_other_levels() {
        let mut t = sample();
        t.add_label(&LabelPath::single("Place"), "Author", "#000").unwrap();
        assert!(t.resolve(&LabelPath::from(["Place", "Author"])).is_some());
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut t = sample();
        let err = t.add_label(&LabelPath::single("Thing"), "X", "#000").unwrap_err();
        assert_eq!(err, TaxonomyError::UnknownParent(LabelPath::single("Thing")));
    }

    #[test]
    fn invalid_input_rejected() {
        let mut t = LabelTaxonomy::new();
        assert!(matches!(t.add_label(&root(), " ", "#000"), Err(TaxonomyError::InvalidName(_))));
        assert!(matches!(t.add_label(&root(), "A", "blue"), Err(TaxonomyError::InvalidColor(_))));
        assert!(t.is_empty());
    }

    #[test]
    fn remove_drops_subtree_and_keeps_order() {
        let mut t = sample();
        t.add_label(&root(), "Event", "#fd7e14").unwrap();
        let removed = t.remove_label(&LabelPath::single("Person")).unwrap();
        assert_eq!(removed.descendant_count(), 3);

        let names: Vec<String> = t.enumerate().map(|(p, _)| p.to_string()).collect();
        assert_eq!(names, vec!["Place", "Event"]);
    }

    #[test]
    fn remove_unknown_path() {
        let mut t = sample();
        assert!(matches!(
            t.remove_label(&LabelPath::from(["Person", "Ghost"])),
            Err(TaxonomyError::UnknownPath(_))
        ));
        assert!(matches!(t.remove_label(&root()), Err(TaxonomyError::UnknownPath(_))));
    }

    #[test]
    fn enumerate_is_depth_first_preorder() {
        let t = sample();
        let paths: Vec<String> = t.enumerate().map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            paths,
            vec!["Person", "Person/Author", "Person/Author/Poet", "Person/Subject", "Place"]
        );
        // restartable
        assert_eq!(t.enumerate().count(), 5);
        assert_eq!(t.label_count(), 5);
    }

    #[test]
    fn parameter_upsert_keeps_position() {
        let mut t = sample();
        let person = LabelPath::single("Person");
        t.add_parameter(&person, "role", ParameterSpec::string("a")).unwrap();
        t.add_parameter(&person, "size", ParameterSpec::string("1")).unwrap();
        let previous = t
            .add_parameter(&person, "role", ParameterSpec::checkbox(true))
            .unwrap();
        assert_eq!(previous, Some(ParameterSpec::string("a")));

        let params: Vec<_> = t.resolve(&person).unwrap().parameters().keys().cloned().collect();
        assert_eq!(params, vec!["role", "size"]);
        assert_eq!(
            t.resolve(&person).unwrap().parameter("role"),
            Some(&ParameterSpec::checkbox(true))
        );
    }

    #[test]
    fn parameter_errors() {
        let mut t = sample();
        let person = LabelPath::single("Person");
        assert!(matches!(
            t.add_parameter(&LabelPath::single("Ghost"), "x", ParameterSpec::string("")),
            Err(TaxonomyError::UnknownPath(_))
        ));
        assert!(matches!(
            t.add_parameter(&person, "labelName", ParameterSpec::string("")),
            Err(TaxonomyError::ReservedName(_))
        ));
        assert!(matches!(
            t.remove_parameter(&person, "missing"),
            Err(TaxonomyError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn remove_parameter_keeps_others_in_order() {
        let mut t = sample();
        let person = LabelPath::single("Person");
        for name in ["a", "b", "c"] {
            t.add_parameter(&person, name, ParameterSpec::string("")).unwrap();
        }
        t.remove_parameter(&person, "b").unwrap();
        let params: Vec<_> = t.resolve(&person).unwrap().parameters().keys().cloned().collect();
        assert_eq!(params, vec!["a", "c"]);
    }

    #[test]
    fn rename_parameter_in_place() {
        let mut t = sample();
        let person = LabelPath::single("Person");
        for name in ["a", "b", "c"] {
            t.add_parameter(&person, name, ParameterSpec::string("")).unwrap();
        }
        t.rename_parameter(&person, "b", "beta", ParameterSpec::checkbox(false))
            .unwrap();
        let params: Vec<_> = t.resolve(&person).unwrap().parameters().keys().cloned().collect();
        assert_eq!(params, vec!["a", "beta", "c"]);

        let before = t.clone();
        let err = t
            .rename_parameter(&person, "a", "c", ParameterSpec::string(""))
            .unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateName { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn set_color_validates() {
        let mut t = sample();
        t.set_color(&LabelPath::single("Place"), "#123456").unwrap();
        assert_eq!(t.resolve(&LabelPath::single("Place")).unwrap().color(), "#123456");
        assert!(t.set_color(&LabelPath::single("Place"), "green").is_err());
    }
}
