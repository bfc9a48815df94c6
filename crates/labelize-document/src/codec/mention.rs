//! Mention codec
//!
//! Encodes selections into markers and decodes markers into [`Mention`]s.
//!
//! Marker layout:
//!
//! ```html
//! <manual_label labelName="Author" parent="Person" role="author"
//!               style="background-color: #20c997;">Marie Curie</manual_label>
//! ```
//!
//! Labels deeper than two levels also carry `labelPath`, a JSON array of
//! every segment, since `labelName`/`parent` alone cannot address them.

use super::{marker_color, marker_path, LABEL_NAME, LABEL_PATH, PARENT, STYLE};
use crate::error::{CodecError, CodecResult};
use crate::marker::Marker;
use crate::markup::attributes::{style_background, with_background, Attributes};
use crate::markup::Document;
use crate::mention::{Mention, MentionId};
use crate::selection::Selection;
use indexmap::IndexMap;
use labelize_taxonomy::label::validate_parameter_name;
use labelize_taxonomy::{
    bool_literal, is_reserved_attribute, parse_bool, same_color, LabelPath, LabelTaxonomy, ParameterKind,
};

/// Stateless encoder/decoder between markers and mentions
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionCodec;

impl MentionCodec {
    /// Create codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wrap the selected span in a marker for `path`
    ///
    /// The selection is shrunk to its trimmed text. Every parameter of the
    /// label is written with its spec default.
    ///
    /// # Errors
    /// - `UnknownLabel` if `path` does not resolve
    /// - `InvalidSelection` if the selection is not a text span
    /// - `EmptySelection` if only whitespace is selected (nothing changes)
    pub fn encode(
        &self,
        document: &mut Document,
        selection: &Selection,
        path: &LabelPath,
        taxonomy: &LabelTaxonomy,
    ) -> CodecResult<Mention> {
        let label = taxonomy
            .resolve(path)
            .ok_or_else(|| CodecError::UnknownLabel(path.clone()))?;
        let raw = document.selected_raw(selection)?;
        let trimmed = selection.trimmed(raw).ok_or(CodecError::EmptySelection)?;

        let mut attributes = Attributes::new();
        attributes.insert(LABEL_NAME.into(), label.name().to_string());
        attributes.insert(PARENT.into(), path.parent_name().unwrap_or_default().to_string());
        if path.len() > 2 {
            let segments = serde_json::Value::from(path.segments().to_vec());
            attributes.insert(LABEL_PATH.into(), segments.to_string());
        }
        for (name, spec) in label.parameters() {
            attributes.insert(name.clone(), spec.default_value());
        }
        attributes.insert(STYLE.into(), with_background("", label.color()));

        let tag = document.marker_tag().to_string();
        let id = document.wrap(&trimmed, |inner| Marker::new(tag, attributes, inner))?;

        tracing::debug!(mention = %id, label = %path, "mention encoded");
        self.decode_one(document, id, taxonomy)
    }

    /// Decode every marker against `taxonomy`
    ///
    /// Marker attributes only supply per-mention values; label identity
    /// comes from `labelName`/`parent` (or `labelPath`). Markers whose label
    /// does not resolve are returned unresolved with their raw attributes.
    #[must_use]
    pub fn decode_all(&self, document: &Document, taxonomy: &LabelTaxonomy) -> Vec<Mention> {
        let mentions: Vec<Mention> = document
            .markers()
            .filter_map(|marker| decode_marker(marker, taxonomy))
            .collect();
        let orphans = mentions.iter().filter(|m| !m.resolved).count();
        if orphans > 0 {
            tracing::warn!(orphans, "markers reference labels missing from the taxonomy");
        }
        mentions
    }

    /// Decode a single marker
    ///
    /// # Errors
    /// `UnknownMention` if no marker has this id or it lacks a label name
    pub fn decode_one(&self, document: &Document, id: MentionId, taxonomy: &LabelTaxonomy) -> CodecResult<Mention> {
        document
            .marker(id)
            .and_then(|marker| decode_marker(marker, taxonomy))
            .ok_or(CodecError::UnknownMention(id))
    }

    /// Overwrite one parameter value on one mention
    ///
    /// When the label resolves, the name must be one of its parameters and
    /// the value must be accepted by the spec; checkbox values are
    /// normalized to `"true"`/`"false"`. Orphan mentions accept any valid,
    /// non-reserved attribute name. The taxonomy is never touched.
    ///
    /// # Errors
    /// `UnknownMention`, `UnknownParameter`, `InvalidValue`, or a name error
    pub fn set_parameter_value(
        &self,
        document: &mut Document,
        id: MentionId,
        name: &str,
        value: &str,
        taxonomy: &LabelTaxonomy,
    ) -> CodecResult<Mention> {
        let marker = document.marker_mut(id)?;
        let path = marker_path(marker).ok_or(CodecError::UnknownMention(id))?;

        let (name, value) = match taxonomy.resolve(&path) {
            Some(label) => {
                let (name, spec) = label
                    .parameters()
                    .get_key_value(name)
                    .ok_or_else(|| CodecError::UnknownParameter {
                        path: path.clone(),
                        name: name.to_string(),
                    })?;
                let value = match spec.kind() {
                    ParameterKind::Checkbox => parse_bool(value).map_or(value, |b| bool_literal(b)),
                    _ => value,
                };
                if !spec.accepts(value) {
                    return Err(CodecError::InvalidValue {
                        name: name.clone(),
                        value: value.to_string(),
                        kind: spec.kind(),
                    });
                }
                (name.clone(), value.to_string())
            }
            None => (validate_parameter_name(name)?.to_string(), value.to_string()),
        };

        marker.set_attribute(&name, value);
        tracing::debug!(mention = %id, parameter = %name, "mention value set");
        self.decode_one(document, id, taxonomy)
    }

    /// Revert a mention to plain text
    ///
    /// Returns the captured text now standing in the marker's place.
    ///
    /// # Errors
    /// `UnknownMention`
    pub fn remove(&self, document: &mut Document, id: MentionId) -> CodecResult<String> {
        let text = document.unwrap_marker(id)?;
        tracing::debug!(mention = %id, "mention removed");
        Ok(text)
    }

    /// Sync marker background colors with the taxonomy
    ///
    /// Only markers whose color differs are touched; `rgb(...)` or named
    /// spellings of the same color count as equal. Returns how many changed.
    pub fn refresh_styles(&self, document: &mut Document, taxonomy: &LabelTaxonomy) -> usize {
        let mut changed = 0;
        document.for_each_marker_mut(|marker| {
            let Some(label) = marker_path(marker).and_then(|path| taxonomy.resolve(&path)) else {
                return;
            };
            let style = marker.attribute(STYLE).unwrap_or_default();
            if style_background(style).is_some_and(|current| same_color(current, label.color())) {
                return;
            }
            let style = with_background(style, label.color());
            marker.set_attribute(STYLE, style);
            changed += 1;
        });
        if changed > 0 {
            tracing::debug!(changed, "marker colors refreshed");
        }
        changed
    }
}

fn decode_marker(marker: &Marker, taxonomy: &LabelTaxonomy) -> Option<Mention> {
    let Some(label_path) = marker_path(marker) else {
        tracing::warn!(mention = %marker.id(), "marker without labelName skipped");
        return None;
    };

    let mention = match taxonomy.resolve(&label_path) {
        Some(label) => {
            let attribute_values = label
                .parameters()
                .iter()
                .map(|(name, spec)| {
                    let value = marker
                        .attribute(name)
                        .map_or_else(|| spec.default_value(), str::to_string);
                    (name.clone(), value)
                })
                .collect();
            Mention {
                id: marker.id(),
                label_path,
                attribute_values,
                text: marker.text(),
                color: label.color().to_string(),
                resolved: true,
            }
        }
        None => {
            let attribute_values: IndexMap<String, String> = marker
                .attributes()
                .iter()
                .filter(|(name, _)| !is_reserved_attribute(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            Mention {
                id: marker.id(),
                label_path,
                attribute_values,
                text: marker.text(),
                color: marker_color(marker).unwrap_or_default(),
                resolved: false,
            }
        }
    };
    Some(mention)
}
