//! Undo/redo stack engine.
//!
//! # Overview
//!
//! [`HistoryEngine`] owns two LIFO stacks of shared [`EditRecord`]s.
//!
//! - **Capture** pushes a freshly normalized record onto the undo stack and
//!   empties the redo stack.
//! - **Undo** pops a record, writes its `prior_text` back over its range, and
//!   pushes the inverse record (which remembers the original) onto the redo stack.
//! - **Redo** pops an inverse record, writes its `prior_text` back the same way,
//!   and pushes the *original* record back onto the undo stack.
//!
//! Records flagged with `chains_to_next` pull the adjacent record along, so a
//! multi-record action (a drag-and-drop move) undoes and redoes as one unit.
//! Chains are followed with a loop, never recursion.
//!
//! # Example
//!
//! ```rust
//! use field_history::{EditRecord, HistoryEngine, RopeSurface, SelectionPolicy, TextSurface};
//!
//! let mut surface = RopeSurface::new("abcd");
//! let mut history = HistoryEngine::new();
//!
//! // "d" was typed at offset 3.
//! history.capture(EditRecord::new("d", 3, "", SelectionPolicy::CaretEnd));
//!
//! assert_eq!(history.undo(&mut surface).unwrap(), 1);
//! assert_eq!(surface.text(), "abc");
//! assert_eq!(history.redo(&mut surface).unwrap(), 1);
//! assert_eq!(surface.text(), "abcd");
//! ```

use crate::error::HistoryError;
use crate::record::EditRecord;
use crate::state::{HistoryLog, HistoryState};
use crate::surface::TextSurface;
use std::sync::Arc;
use tracing::{trace, warn};

const TRACE_TARGET: &str = "field_history::history";

/// What happened to the stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChangeKind {
    /// A new record was captured.
    Capture,
    /// A record was undone.
    Undo,
    /// A record was redone.
    Redo,
    /// Both stacks were emptied.
    Cleared,
}

/// Notification passed to history observers after a stack mutation.
#[derive(Debug, Clone, Copy)]
pub struct HistoryChange<'a> {
    /// Change type
    pub kind: HistoryChangeKind,
    /// The record that was captured or applied (`None` for [`HistoryChangeKind::Cleared`]).
    pub record: Option<&'a Arc<EditRecord>>,
    /// Undo stack after the change, bottom first.
    pub undo_stack: &'a [Arc<EditRecord>],
    /// Redo stack after the change, bottom first.
    pub redo_stack: &'a [Arc<EditRecord>],
}

/// History observer callback type
pub type HistoryChangeCallback = Box<dyn FnMut(&HistoryChange<'_>) + Send>;

/// Two-stack undo/redo engine.
pub struct HistoryEngine {
    undo_stack: Vec<Arc<EditRecord>>,
    redo_stack: Vec<Arc<EditRecord>>,
    callbacks: Vec<HistoryChangeCallback>,
    notify_chain_steps: bool,
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryEngine {
    /// Create an engine with empty stacks.
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            callbacks: Vec::new(),
            notify_chain_steps: true,
        }
    }

    /// Choose between one notification per chained record (`true`) and one per call.
    pub fn set_notify_chain_steps(&mut self, enabled: bool) {
        self.notify_chain_steps = enabled;
    }

    /// Register an observer fired after every stack mutation.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&HistoryChange<'_>) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Push a record produced by a new edit and invalidate the redo stack.
    ///
    /// Replays never come through here: only records built from user edits are captured.
    pub fn capture(&mut self, record: EditRecord) -> Arc<EditRecord> {
        debug_assert!(
            record.inverse_source().is_none(),
            "captured records must not carry an inverse source"
        );
        let record = Arc::new(record);
        if !self.redo_stack.is_empty() {
            trace!(target: TRACE_TARGET, discarded = self.redo_stack.len(), "redo_cleared");
            self.redo_stack.clear();
        }
        self.undo_stack.push(Arc::clone(&record));
        trace!(
            target: TRACE_TARGET,
            start = record.range_start(),
            end = record.range_end(),
            chains = record.chains_to_next(),
            undo_depth = self.undo_stack.len(),
            "capture"
        );
        self.notify(HistoryChangeKind::Capture, Some(&record));
        record
    }

    /// Undo the most recent logical action.
    ///
    /// Returns the number of records reversed; `0` when the undo stack is empty.
    /// If a record's range does not fit the surface, that record stays on the undo
    /// stack and the error is returned. Earlier steps of the same chain stay applied.
    pub fn undo<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> Result<usize, HistoryError> {
        let mut applied = 0;
        let mut chain_inverse = false;
        let mut last: Option<Arc<EditRecord>> = None;

        while let Some(record) = self.undo_stack.pop() {
            if let Err(err) = apply_prior_text(surface, &record) {
                self.undo_stack.push(record);
                self.notify_collapsed(HistoryChangeKind::Undo, last.as_ref());
                return Err(err);
            }
            let inverse = Arc::new(EditRecord::invert(&record, chain_inverse));
            self.redo_stack.push(inverse);
            applied += 1;
            trace!(
                target: TRACE_TARGET,
                step = applied,
                start = record.range_start(),
                end = record.range_end(),
                undo_depth = self.undo_stack.len(),
                redo_depth = self.redo_stack.len(),
                "undo_step"
            );
            if self.notify_chain_steps {
                self.notify(HistoryChangeKind::Undo, Some(&record));
            }
            let chains = record.chains_to_next();
            last = Some(record);
            if !chains {
                break;
            }
            chain_inverse = true;
        }

        self.notify_collapsed(HistoryChangeKind::Undo, last.as_ref());
        Ok(applied)
    }

    /// Redo the most recently undone logical action.
    ///
    /// Returns the number of records reapplied; `0` when the redo stack is empty.
    /// Each reapplied record hands its original undo-side record back to the undo
    /// stack unchanged.
    pub fn redo<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> Result<usize, HistoryError> {
        let mut applied = 0;
        let mut last: Option<Arc<EditRecord>> = None;

        while let Some(record) = self.redo_stack.pop() {
            if let Err(err) = apply_prior_text(surface, &record) {
                self.redo_stack.push(record);
                self.notify_collapsed(HistoryChangeKind::Redo, last.as_ref());
                return Err(err);
            }
            self.undo_stack.push(reinstated(&record));
            applied += 1;
            trace!(
                target: TRACE_TARGET,
                step = applied,
                start = record.range_start(),
                end = record.range_end(),
                undo_depth = self.undo_stack.len(),
                redo_depth = self.redo_stack.len(),
                "redo_step"
            );
            if self.notify_chain_steps {
                self.notify(HistoryChangeKind::Redo, Some(&record));
            }
            let chains = record.chains_to_next();
            last = Some(record);
            if !chains {
                break;
            }
        }

        self.notify_collapsed(HistoryChangeKind::Redo, last.as_ref());
        Ok(applied)
    }

    /// Empty both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: TRACE_TARGET, "cleared");
        self.notify(HistoryChangeKind::Cleared, None);
    }

    /// Undo stack, bottom first.
    pub fn undo_stack(&self) -> &[Arc<EditRecord>] {
        &self.undo_stack
    }

    /// Redo stack, bottom first.
    pub fn redo_stack(&self) -> &[Arc<EditRecord>] {
        &self.redo_stack
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo stack depth in records.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Redo stack depth in records.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Snapshot of stack depths.
    pub fn state(&self) -> HistoryState {
        HistoryState::from_stacks(&self.undo_stack, &self.redo_stack)
    }

    /// Render both stacks as log lines.
    pub fn log(&self) -> HistoryLog {
        HistoryLog::from_stacks(&self.undo_stack, &self.redo_stack)
    }

    fn notify_collapsed(&mut self, kind: HistoryChangeKind, last: Option<&Arc<EditRecord>>) {
        if !self.notify_chain_steps && last.is_some() {
            self.notify(kind, last);
        }
    }

    fn notify(&mut self, kind: HistoryChangeKind, record: Option<&Arc<EditRecord>>) {
        if self.callbacks.is_empty() {
            return;
        }
        let change = HistoryChange {
            kind,
            record,
            undo_stack: &self.undo_stack,
            redo_stack: &self.redo_stack,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

/// Write `record.prior_text` over `record.range()`.
fn apply_prior_text<S: TextSurface + ?Sized>(
    surface: &mut S,
    record: &EditRecord,
) -> Result<(), HistoryError> {
    HistoryError::check_range(record.range_start(), record.range_end(), surface.len_chars())?;
    surface.replace_range(record.prior_text(), record.range(), record.selection_policy())
}

/// The undo-side record a redo-side record came from.
fn reinstated(record: &EditRecord) -> Arc<EditRecord> {
    match record.inverse_source() {
        Some(original) => Arc::clone(original),
        None => {
            warn!(target: TRACE_TARGET, "redo record without inverse source; recomputing");
            Arc::new(EditRecord::new(
                record.prior_text(),
                record.range_start(),
                record.replacement_text(),
                record.selection_policy(),
            ))
        }
    }
}
