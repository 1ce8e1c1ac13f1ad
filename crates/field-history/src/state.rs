//! Display-facing history snapshots.
//!
//! These are plain values copied out of the engine for a UI or log collaborator;
//! the engine itself never consults them.

use crate::record::EditRecord;
use std::fmt;
use std::sync::Arc;

/// Undo/redo stack state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryState {
    /// Can undo
    pub can_undo: bool,
    /// Can redo
    pub can_redo: bool,
    /// Undo stack depth (records, not logical actions)
    pub undo_depth: usize,
    /// Redo stack depth (records, not logical actions)
    pub redo_depth: usize,
}

impl HistoryState {
    pub(crate) fn from_stacks(undo: &[Arc<EditRecord>], redo: &[Arc<EditRecord>]) -> Self {
        Self {
            can_undo: !undo.is_empty(),
            can_redo: !redo.is_empty(),
            undo_depth: undo.len(),
            redo_depth: redo.len(),
        }
    }
}

/// Rendered history, one line per record, bottom of each stack first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    /// Undo stack lines.
    pub undo: Vec<String>,
    /// Redo stack lines.
    pub redo: Vec<String>,
}

impl HistoryLog {
    pub(crate) fn from_stacks(undo: &[Arc<EditRecord>], redo: &[Arc<EditRecord>]) -> Self {
        Self {
            undo: undo.iter().map(|record| record.to_string()).collect(),
            redo: redo.iter().map(|record| record.to_string()).collect(),
        }
    }
}

impl fmt::Display for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "undo:")?;
        for line in &self.undo {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "redo:")?;
        for line in &self.redo {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
