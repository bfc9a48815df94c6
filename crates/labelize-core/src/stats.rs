//! Session statistics

use indexmap::IndexMap;
use labelize_document::Mention;
use labelize_taxonomy::LabelTaxonomy;
use serde::Serialize;

/// Counts shown in a status bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Markers in the document
    pub total_mentions: usize,
    /// Labels defined at every depth
    pub label_types: usize,
    /// Mentions whose label is not in the taxonomy
    pub unresolved_mentions: usize,
    /// Mentions per label path, in taxonomy order, then orphans by first use
    pub mentions_per_label: IndexMap<String, usize>,
}

impl SessionStats {
    /// Tally `mentions` against `taxonomy`
    #[must_use]
    pub fn collect(taxonomy: &LabelTaxonomy, mentions: &[Mention]) -> Self {
        let mut per_label: IndexMap<String, usize> = taxonomy
            .label_paths()
            .into_iter()
            .map(|path| (path.to_string(), 0))
            .collect();
        for mention in mentions {
            *per_label.entry(mention.label_path.to_string()).or_default() += 1;
        }
        Self {
            total_mentions: mentions.len(),
            label_types: taxonomy.label_count(),
            unresolved_mentions: mentions.iter().filter(|m| !m.resolved).count(),
            mentions_per_label: per_label,
        }
    }
}
