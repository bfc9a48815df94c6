//! Text selections
//!
//! A [`Selection`] addresses a byte range inside one text node. Ranges are
//! over the raw (escaped) node text, as found by
//! [`Document::find_text`](crate::Document::find_text).

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Span of a single text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    node: usize,
    start: usize,
    end: usize,
}

impl Selection {
    /// Select `range` within node `node`
    #[inline]
    #[must_use]
    pub fn new(node: usize, range: Range<usize>) -> Self {
        Self {
            node,
            start: range.start,
            end: range.end,
        }
    }

    /// Node index
    #[inline]
    #[must_use]
    pub fn node(&self) -> usize {
        self.node
    }

    /// Byte range within the node text
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True for a zero-length selection
    #[inline]
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.start >= self.end
    }

    /// Shrink to the non-whitespace part of `selected`, the text this
    /// selection covers
    ///
    /// Returns `None` when nothing but whitespace is selected.
    #[must_use]
    pub fn trimmed(&self, selected: &str) -> Option<Self> {
        let trimmed_start = selected.trim_start();
        if trimmed_start.is_empty() {
            return None;
        }
        let start = self.start + (selected.len() - trimmed_start.len());
        let end = start + trimmed_start.trim_end().len();
        Some(Self { node: self.node, start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_shrinks_to_content() {
        let text = "by  Marie Curie \n.";
        let sel = Selection::new(0, 2..16);
        let trimmed = sel.trimmed(&text[sel.range()]).unwrap();
        assert_eq!(&text[trimmed.range()], "Marie Curie");
    }

    #[test]
    fn blank_selection_trims_to_none() {
        assert!(Selection::new(0, 1..4).trimmed("   ").is_none());
        assert!(Selection::new(0, 2..2).trimmed("").is_none());
    }
}
