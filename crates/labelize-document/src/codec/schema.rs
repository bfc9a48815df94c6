//! Schema codec
//!
//! Persists the taxonomy as a [`Descriptor`] inside one comment:
//!
//! ```html
//! <!-- labelize-schema
//! { "Person": { "color": "#6aa3ff", "sublabels": {}, "attributes": {} } }
//! -->
//! ```
//!
//! `--` would end the comment early, so the payload writes its second dash
//! as the JSON escape `\u002d`.

use crate::config::DEFAULT_SCHEMA_SENTINEL;
use crate::descriptor::{Descriptor, DescriptorNode};
use crate::error::{SchemaError, SchemaResult};
use crate::markup::tokenizer::is_open_tag_named;
use crate::markup::{Document, Node};
use indexmap::IndexMap;
use labelize_taxonomy::{LabelPath, LabelTaxonomy, TaxonomyError};

/// Reads and writes the descriptor comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCodec {
    sentinel: String,
}

impl Default for SchemaCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_SENTINEL)
    }
}

impl SchemaCodec {
    /// Codec for comments opening with `sentinel`
    #[must_use]
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Sentinel token
    #[inline]
    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// JSON payload of a descriptor comment body, if it is one
    fn payload<'a>(&self, body: &'a str) -> Option<&'a str> {
        let rest = body.trim_start().strip_prefix(self.sentinel.as_str())?;
        match rest.chars().next() {
            None => Some(rest),
            Some(c) if c.is_whitespace() || c == '{' => Some(rest),
            Some(_) => None,
        }
    }

    /// Node indices of every descriptor comment, in document order
    fn descriptor_comments(&self, document: &Document) -> Vec<usize> {
        document
            .comments()
            .filter(|(_, body)| self.payload(body).is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// Parse the first descriptor comment
    ///
    /// Returns `Ok(None)` when the document has none.
    ///
    /// # Errors
    /// `MalformedDescriptor` if the payload is not a valid descriptor
    pub fn try_extract(&self, document: &Document) -> SchemaResult<Option<Descriptor>> {
        let Some(payload) = document.comments().find_map(|(_, body)| self.payload(body)) else {
            return Ok(None);
        };
        serde_json::from_str(payload.trim())
            .map(Some)
            .map_err(|e| SchemaError::malformed(e.to_string()))
    }

    /// Parse the first descriptor comment, treating failure as absence
    ///
    /// A malformed descriptor is logged and reported as `None`, which sends
    /// the caller down the inference path.
    #[must_use]
    pub fn extract(&self, document: &Document) -> Option<Descriptor> {
        match self.try_extract(document) {
            Ok(Some(descriptor)) => {
                tracing::debug!(roots = descriptor.roots().len(), "descriptor extracted");
                Some(descriptor)
            }
            Ok(None) => {
                tracing::info!(sentinel = %self.sentinel, "no descriptor comment found");
                None
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring malformed descriptor");
                None
            }
        }
    }

    /// Build a taxonomy from a descriptor
    ///
    /// Labels and parameters keep descriptor order.
    ///
    /// # Errors
    /// `Taxonomy` naming the first node the taxonomy rejects
    pub fn build(&self, descriptor: &Descriptor) -> SchemaResult<LabelTaxonomy> {
        let mut taxonomy = LabelTaxonomy::new();
        build_level(&mut taxonomy, &LabelPath::root(), descriptor.roots())?;
        Ok(taxonomy)
    }

    /// Describe a taxonomy
    #[inline]
    #[must_use]
    pub fn describe(&self, taxonomy: &LabelTaxonomy) -> Descriptor {
        Descriptor::from_taxonomy(taxonomy)
    }

    /// Comment body carrying `descriptor`
    ///
    /// # Errors
    /// `Serialize` if JSON encoding fails
    pub fn comment_body(&self, descriptor: &Descriptor) -> SchemaResult<String> {
        let json = serde_json::to_string_pretty(descriptor).map_err(SchemaError::Serialize)?;
        let json = json.replace("--", "-\\u002d");
        Ok(format!(" {}\n{json}\n", self.sentinel))
    }

    /// Write the taxonomy into the document
    ///
    /// Overwrites the first descriptor comment and drops any others. With no
    /// descriptor present the comment goes right before the `<head>` tag,
    /// else before `<body>`, else at the start of the document (after a
    /// leading doctype). Embedding an unchanged taxonomy again yields the
    /// same text.
    ///
    /// # Errors
    /// `Serialize` if JSON encoding fails
    pub fn embed(&self, document: &mut Document, taxonomy: &LabelTaxonomy) -> SchemaResult<()> {
        let body = self.comment_body(&self.describe(taxonomy))?;
        let existing = self.descriptor_comments(document);

        match existing.split_first() {
            Some((&first, rest)) => {
                for &index in rest.iter().rev() {
                    document.remove_node(index);
                }
                document.set_comment(first, body);
                if !rest.is_empty() {
                    tracing::warn!(removed = rest.len(), "duplicate descriptor comments removed");
                }
            }
            None => {
                let index = insertion_point(document);
                document.insert_node(index, Node::Comment(body));
            }
        }
        tracing::debug!(labels = taxonomy.label_count(), "descriptor embedded");
        Ok(())
    }
}

fn build_level(
    taxonomy: &mut LabelTaxonomy,
    parent: &LabelPath,
    nodes: &IndexMap<String, DescriptorNode>,
) -> SchemaResult<()> {
    for (name, node) in nodes {
        let path = parent.child(name.clone());
        let reject = |source: TaxonomyError| SchemaError::Taxonomy {
            path: path.clone(),
            source,
        };
        taxonomy.add_label(parent, name, &node.color).map_err(reject)?;
        for (param, spec) in &node.attributes {
            taxonomy
                .add_parameter(&path, param, spec.clone())
                .map_err(reject)?;
        }
        build_level(taxonomy, &path, &node.sublabels)?;
    }
    Ok(())
}

fn insertion_point(document: &Document) -> usize {
    let nodes = document.nodes();
    let tag_position = |name: &str| {
        nodes
            .iter()
            .position(|node| matches!(node, Node::Markup(tag) if is_open_tag_named(tag, name)))
    };
    tag_position("head")
        .or_else(|| tag_position("body"))
        .unwrap_or_else(|| {
            let doctype = matches!(
                nodes.first(),
                Some(Node::Markup(tag)) if tag.get(..9).is_some_and(|t| t.eq_ignore_ascii_case("<!doctype"))
            );
            usize::from(doctype)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkupConfig;
    use labelize_taxonomy::ParameterSpec;
    use pretty_assertions::assert_eq;

    fn taxonomy() -> LabelTaxonomy {
        let mut t = LabelTaxonomy::new();
        t.add_label(&LabelPath::root(), "Person", "#6aa3ff").unwrap();
        t.add_parameter(
            &LabelPath::single("Person"),
            "role",
            ParameterSpec::dropdown(["author", "subject"]),
        )
        .unwrap();
        t.add_label(&LabelPath::single("Person"), "Author", "#20c997").unwrap();
        t.add_parameter(
            &LabelPath::from(["Person", "Author"]),
            "note",
            ParameterSpec::string("a -- b"),
        )
        .unwrap();
        t
    }

    fn doc(src: &str) -> Document {
        Document::parse(src, &MarkupConfig::default())
    }

    #[test]
    fn embed_inserts_before_head() {
        let mut d = doc("<!DOCTYPE html><html><head><title>x</title></head><body></body></html>");
        SchemaCodec::default().embed(&mut d, &taxonomy()).unwrap();
        let out = d.render();
        let comment = out.find("<!-- labelize-schema").unwrap();
        assert!(comment < out.find("<head>").unwrap());
        assert!(comment > out.find("<html>").unwrap());
    }

    #[test]
    fn embed_falls_back_to_body_then_start() {
        let mut d = doc("<body><p>x</p></body>");
        SchemaCodec::default().embed(&mut d, &taxonomy()).unwrap();
        assert!(d.render().starts_with("<!-- labelize-schema"));

        let mut d = doc("<!doctype html><p>x</p>");
        SchemaCodec::default().embed(&mut d, &taxonomy()).unwrap();
        assert!(d.render().starts_with("<!doctype html><!-- labelize-schema"));
    }

    #[test]
    fn embed_is_idempotent_and_single() {
        let codec = SchemaCodec::default();
        let mut d = doc("<html><head></head><body>x</body></html>");
        codec.embed(&mut d, &taxonomy()).unwrap();
        let once = d.render();
        codec.embed(&mut d, &taxonomy()).unwrap();
        assert_eq!(d.render(), once);

        let mut reparsed = doc(&once);
        codec.embed(&mut reparsed, &taxonomy()).unwrap();
        assert_eq!(reparsed.render(), once);
        assert_eq!(codec.descriptor_comments(&reparsed).len(), 1);
    }

    #[test]
    fn embed_replaces_first_and_drops_duplicates() {
        let codec = SchemaCodec::default();
        let src = "<html><!-- labelize-schema {} --><head></head><!-- keep --><!-- labelize-schema {\"Old\":{\"color\":\"#000\"}} --></html>";
        let mut d = doc(src);
        codec.embed(&mut d, &taxonomy()).unwrap();
        let out = d.render();
        assert_eq!(out.matches("labelize-schema").count(), 1);
        assert!(out.contains("<!-- keep -->"));
        assert!(out.starts_with("<html><!-- labelize-schema\n"));
        assert!(!out.contains("Old"));
    }

    #[test]
    fn payload_never_closes_the_comment() {
        let codec = SchemaCodec::default();
        let mut d = doc("<html><head></head></html>");
        codec.embed(&mut d, &taxonomy()).unwrap();
        let (_, body) = d.comments().next().unwrap();
        assert!(!body.contains("--"));

        let reparsed = doc(&d.render());
        let built = codec.build(&codec.extract(&reparsed).unwrap()).unwrap();
        assert_eq!(built, taxonomy());
    }

    #[test]
    fn malformed_payload_is_reported_and_recoverable() {
        let codec = SchemaCodec::default();
        let d = doc("<!-- labelize-schema { not json --><p>x</p>");
        assert!(matches!(
            codec.try_extract(&d),
            Err(SchemaError::MalformedDescriptor { .. })
        ));
        assert!(codec.extract(&d).is_none());
    }

    #[test]
    fn sentinel_must_be_a_whole_token() {
        let codec = SchemaCodec::default();
        let d = doc("<!-- labelize-schemas {} -->");
        assert_eq!(codec.try_extract(&d).unwrap(), None);
        let d = doc("<!--labelize-schema{}-->");
        assert_eq!(codec.try_extract(&d).unwrap(), Some(Descriptor::default()));
    }

    #[test]
    fn build_rejects_invalid_nodes() {
        let codec = SchemaCodec::default();
        let descriptor: Descriptor = serde_json::from_str(
            r##"{"Person": {"color": "#6aa3ff", "sublabels": {"Bad": {"color": "blue"}}}}"##,
        )
        .unwrap();
        let err = codec.build(&descriptor).unwrap_err();
        assert!(matches!(err, SchemaError::Taxonomy { ref path, .. } if *path == LabelPath::from(["Person", "Bad"])));
    }

    #[test]
    fn dropdown_default_outside_options_is_malformed() {
        let codec = SchemaCodec::default();
        let d = doc(
            r##"<!-- labelize-schema {"P": {"color": "#fff", "attributes": {"r": {"type": "dropdown", "options": ["a"], "default": "z"}}}} -->"##,
        );
        assert!(codec.try_extract(&d).is_err());
    }
}
