//! Serialized taxonomy form
//!
//! ```json
//! { "Person": { "color": "#6aa3ff",
//!               "sublabels": { "Author": { ... } },
//!               "attributes": { "role": { "type": "dropdown", "options": ["author"], "default": "author" } } } }
//! ```

use indexmap::IndexMap;
use labelize_taxonomy::{Label, LabelTaxonomy, ParameterSpec};
use serde::{Deserialize, Serialize};

/// Nested `name → node` mapping describing a whole taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(pub IndexMap<String, DescriptorNode>);

/// One label in a [`Descriptor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorNode {
    /// Hex display color
    pub color: String,
    /// Child labels
    #[serde(default)]
    pub sublabels: IndexMap<String, DescriptorNode>,
    /// Parameter specs
    #[serde(default)]
    pub attributes: IndexMap<String, ParameterSpec>,
}

impl Descriptor {
    /// Describe `taxonomy`, depth-first with insertion order kept
    #[must_use]
    pub fn from_taxonomy(taxonomy: &LabelTaxonomy) -> Self {
        Self(describe_level(taxonomy.roots()))
    }

    /// Root entries
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &IndexMap<String, DescriptorNode> {
        &self.0
    }

    /// True when the descriptor defines no labels
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn describe_level(labels: &IndexMap<String, Label>) -> IndexMap<String, DescriptorNode> {
    labels
        .iter()
        .map(|(name, label)| {
            let node = DescriptorNode {
                color: label.color().to_string(),
                sublabels: describe_level(label.children()),
                attributes: label.parameters().clone(),
            };
            (name.clone(), node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelize_taxonomy::LabelPath;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_in_documented_shape() {
        let mut t = LabelTaxonomy::new();
        t.add_label(&LabelPath::root(), "Person", "#6aa3ff").unwrap();
        t.add_parameter(
            &LabelPath::single("Person"),
            "role",
            ParameterSpec::dropdown(["author", "subject"]),
        )
        .unwrap();
        t.add_label(&LabelPath::single("Person"), "Author", "#20c997").unwrap();

        let value = serde_json::to_value(Descriptor::from_taxonomy(&t)).unwrap();
        assert_eq!(
            value,
            json!({
                "Person": {
                    "color": "#6aa3ff",
                    "sublabels": { "Author": { "color": "#20c997", "sublabels": {}, "attributes": {} } },
                    "attributes": {
                        "role": { "type": "dropdown", "options": ["author", "subject"], "default": "author" }
                    }
                }
            })
        );
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let d: Descriptor = serde_json::from_str(r##"{"Place": {"color": "#20c997"}}"##).unwrap();
        let place = &d.roots()["Place"];
        assert!(place.sublabels.is_empty());
        assert!(place.attributes.is_empty());
    }

    #[test]
    fn legacy_bare_string_attribute() {
        let d: Descriptor =
            serde_json::from_str(r##"{"Place": {"color": "#20c997", "attributes": {"country": "FR"}}}"##).unwrap();
        assert_eq!(d.roots()["Place"].attributes["country"], ParameterSpec::string("FR"));
    }
}
