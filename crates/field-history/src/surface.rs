//! Text surface capability.
//!
//! The history core never renders or owns the editable field; it reads the
//! current text and selection and writes range replacements back through
//! [`TextSurface`]. [`RopeSurface`] is an in-memory implementation for headless
//! hosts and tests.

use crate::error::HistoryError;
use crate::record::SelectionPolicy;
use ropey::Rope;
use std::ops::Range;

/// The editable text field the history engine drives.
///
/// All offsets are character offsets. `replace_range` must update content
/// and selection together before returning.
pub trait TextSurface {
    /// Full text content.
    fn text(&self) -> String;

    /// Content length in characters.
    fn len_chars(&self) -> usize {
        self.text().chars().count()
    }

    /// Current selection as a normalized `start..end` range (collapsed for a caret).
    fn selection(&self) -> Range<usize>;

    /// Text within `range`.
    fn slice(&self, range: Range<usize>) -> Result<String, HistoryError> {
        let text = self.text();
        let len = text.chars().count();
        HistoryError::check_range(range.start, range.end, len)?;
        Ok(text
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect())
    }

    /// Replace `range` with `text` and place the selection according to `mode`.
    fn replace_range(
        &mut self,
        text: &str,
        range: Range<usize>,
        mode: SelectionPolicy,
    ) -> Result<(), HistoryError>;
}

/// Rope-backed text surface with a single selection.
#[derive(Debug, Clone, Default)]
pub struct RopeSurface {
    rope: Rope,
    selection: Range<usize>,
    revision: u64,
}

impl RopeSurface {
    /// Create a surface holding `text` with the caret at the end.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let end = rope.len_chars();
        Self {
            rope,
            selection: end..end,
            revision: 0,
        }
    }

    /// Borrow the underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of content mutations applied since creation or the last reset.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole content, collapsing the caret at the end.
    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let end = self.rope.len_chars();
        self.selection = end..end;
        self.revision = 0;
    }

    /// Set the selection. The range is normalized so `start <= end`.
    pub fn set_selection(&mut self, range: Range<usize>) -> Result<(), HistoryError> {
        let (start, end) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };
        HistoryError::check_range(start, end, self.rope.len_chars())?;
        self.selection = start..end;
        Ok(())
    }

    /// Collapse the selection to a caret at `offset`.
    pub fn set_caret(&mut self, offset: usize) -> Result<(), HistoryError> {
        self.set_selection(offset..offset)
    }

    /// Currently selected text.
    pub fn selected_text(&self) -> String {
        self.rope.slice(self.selection.clone()).to_string()
    }
}

impl TextSurface for RopeSurface {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn slice(&self, range: Range<usize>) -> Result<String, HistoryError> {
        HistoryError::check_range(range.start, range.end, self.rope.len_chars())?;
        Ok(self.rope.slice(range).to_string())
    }

    fn replace_range(
        &mut self,
        text: &str,
        range: Range<usize>,
        mode: SelectionPolicy,
    ) -> Result<(), HistoryError> {
        HistoryError::check_range(range.start, range.end, self.rope.len_chars())?;
        let start = range.start;
        if range.start < range.end {
            self.rope.remove(range);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        let inserted_end = start + text.chars().count();
        self.selection = match mode {
            SelectionPolicy::Select => start..inserted_end,
            SelectionPolicy::CaretStart => start..start,
            SelectionPolicy::CaretEnd => inserted_end..inserted_end,
        };
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }
}
