//! Reversible edit records.
//!
//! An [`EditRecord`] describes one text mutation as *the information needed to
//! reverse it*: where the inserted text sits in the post-mutation document and
//! what occupied that place before. Records are immutable once built and are
//! shared through [`Arc`] so a redo-side record can point back at the exact
//! undo-side record it was derived from.

use crate::text::char_len;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// How the selection is placed after a record's text is applied back to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Select the text that was just applied.
    Select,
    /// Collapse the caret to the start of the applied text.
    CaretStart,
    /// Collapse the caret to the end of the applied text.
    CaretEnd,
}

/// One atomic, reversible text mutation.
///
/// Invariant: `range_end - range_start == replacement_text.chars().count()`.
/// The constructor derives `range_end`, so the invariant holds for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    replacement_text: String,
    range_start: usize,
    range_end: usize,
    prior_text: String,
    selection_policy: SelectionPolicy,
    chains_to_next: bool,
    inverse_source: Option<Arc<EditRecord>>,
}

impl EditRecord {
    /// Create a record for text `replacement_text` that now starts at `range_start`
    /// and replaced `prior_text`.
    pub fn new(
        replacement_text: impl Into<String>,
        range_start: usize,
        prior_text: impl Into<String>,
        selection_policy: SelectionPolicy,
    ) -> Self {
        let replacement_text = replacement_text.into();
        let range_end = range_start + char_len(&replacement_text);
        Self {
            replacement_text,
            range_start,
            range_end,
            prior_text: prior_text.into(),
            selection_policy,
            chains_to_next: false,
            inverse_source: None,
        }
    }

    /// Set whether undoing/redoing this record continues with the next record on the same stack.
    pub fn chained(mut self, chains_to_next: bool) -> Self {
        self.chains_to_next = chains_to_next;
        self
    }

    /// Build the redo-side record for `original` after it has been undone.
    ///
    /// The result describes `original.prior_text` sitting at `original.range_start`
    /// (what the undo just wrote) and remembers `original` itself, so a redo hands
    /// back the very same record instead of a recomputed copy.
    pub(crate) fn invert(original: &Arc<EditRecord>, chains_to_next: bool) -> Self {
        let mut inverse = EditRecord::new(
            original.prior_text.clone(),
            original.range_start,
            original.replacement_text.clone(),
            original.selection_policy,
        );
        inverse.chains_to_next = chains_to_next;
        inverse.inverse_source = Some(Arc::clone(original));
        inverse
    }

    /// Text the recorded mutation inserted (empty for a pure deletion).
    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    /// Start of the replacement text in the post-mutation document.
    pub fn range_start(&self) -> usize {
        self.range_start
    }

    /// Exclusive end of the replacement text in the post-mutation document.
    pub fn range_end(&self) -> usize {
        self.range_end
    }

    /// `range_start..range_end`.
    pub fn range(&self) -> Range<usize> {
        self.range_start..self.range_end
    }

    /// Text that occupied the location before the mutation.
    pub fn prior_text(&self) -> &str {
        &self.prior_text
    }

    /// Selection placement used when this record is reversed.
    pub fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy
    }

    /// Whether reversing this record continues with the adjacent record.
    pub fn chains_to_next(&self) -> bool {
        self.chains_to_next
    }

    /// The undo-side record this redo-side record was derived from.
    pub fn inverse_source(&self) -> Option<&Arc<EditRecord>> {
        self.inverse_source.as_ref()
    }

    /// True when nothing was replaced (an insertion into an empty range).
    pub fn is_insertion(&self) -> bool {
        self.prior_text.is_empty() && !self.replacement_text.is_empty()
    }

    /// True when nothing was inserted.
    pub fn is_deletion(&self) -> bool {
        self.replacement_text.is_empty() && !self.prior_text.is_empty()
    }

    /// True when reversing the record would not change any text.
    pub fn is_noop(&self) -> bool {
        self.replacement_text.is_empty() && self.prior_text.is_empty()
    }
}

impl fmt::Display for EditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}-{}) value: {}, before: {}",
            self.range_start, self.range_end, self.replacement_text, self.prior_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_end_counts_chars_not_bytes() {
        let record = EditRecord::new("日本", 4, "", SelectionPolicy::CaretEnd);
        assert_eq!(record.range(), 4..6);
        assert!(record.is_insertion());
    }

    #[test]
    fn invert_swaps_texts_and_keeps_the_original() {
        let original = Arc::new(
            EditRecord::new("XY", 1, "b", SelectionPolicy::Select).chained(true),
        );
        let inverse = EditRecord::invert(&original, false);

        assert_eq!(inverse.replacement_text(), "b");
        assert_eq!(inverse.prior_text(), "XY");
        assert_eq!(inverse.range(), 1..2);
        assert_eq!(inverse.selection_policy(), SelectionPolicy::Select);
        assert!(!inverse.chains_to_next());
        assert!(Arc::ptr_eq(inverse.inverse_source().unwrap(), &original));
    }

    #[test]
    fn display_matches_log_line_format() {
        let record = EditRecord::new("", 2, "c", SelectionPolicy::CaretStart);
        assert_eq!(record.to_string(), "(2-2) value: , before: c");
        assert!(record.is_deletion());
    }
}
