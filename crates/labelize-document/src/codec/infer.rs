//! Label definitions recovered from markers alone
//!
//! Used for documents without a descriptor comment. The contract:
//!
//! - labels are keyed by their full path; missing ancestors are created
//! - the first marker of a label decides its color: a readable `color`
//!   attribute, else a readable inline background, else the palette;
//!   `rgb()` and named colors are stored as hex
//! - every non-reserved attribute becomes a string parameter whose default
//!   is the last value observed, in first-seen order
//!
//! Dropdown and checkbox types cannot be recovered this way.

use super::{color_candidates, declared_color, marker_path};
use crate::markup::Document;
use labelize_taxonomy::{is_reserved_attribute, LabelPath, LabelTaxonomy, Palette, ParameterSpec};

/// Build a taxonomy from the markers of `document`
#[must_use]
pub fn infer_taxonomy(document: &Document, palette: &mut Palette) -> LabelTaxonomy {
    let mut taxonomy = LabelTaxonomy::new();

    for marker in document.markers() {
        let Some(path) = marker_path(marker) else {
            tracing::warn!(mention = %marker.id(), "marker without labelName skipped");
            continue;
        };

        if taxonomy.resolve(&path).is_none() {
            let declared = declared_color(marker);
            if declared.is_none() {
                if let Some(invalid) = color_candidates(marker).next() {
                    tracing::warn!(label = %path, color = invalid, "ignoring unusable marker color");
                }
            }
            if let Err(error) = ensure_path(&mut taxonomy, &path, declared.as_deref(), palette) {
                tracing::warn!(label = %path, %error, "marker label cannot be inferred");
                continue;
            }
        }

        for (name, value) in marker.attributes() {
            if is_reserved_attribute(name) {
                continue;
            }
            if let Err(error) = taxonomy.add_parameter(&path, name, ParameterSpec::string(value.as_str())) {
                tracing::debug!(label = %path, attribute = %name, %error, "attribute not inferred");
            }
        }
    }

    tracing::info!(labels = taxonomy.label_count(), "taxonomy inferred from markers");
    taxonomy
}

/// Create every missing label along `path`
///
/// The leaf gets `color` when given; synthesized ancestors draw from the palette.
fn ensure_path(
    taxonomy: &mut LabelTaxonomy,
    path: &LabelPath,
    color: Option<&str>,
    palette: &mut Palette,
) -> labelize_taxonomy::TaxonomyResult<()> {
    let mut prefix = LabelPath::root();
    for (depth, segment) in path.iter().enumerate() {
        let next = prefix.child(segment);
        if taxonomy.resolve(&next).is_none() {
            let is_leaf = depth + 1 == path.len();
            let color = match color.filter(|_| is_leaf) {
                Some(color) => color.to_string(),
                None => palette.next_color(),
            };
            taxonomy.add_label(&prefix, segment, &color)?;
        }
        prefix = next;
    }
    Ok(())
}
