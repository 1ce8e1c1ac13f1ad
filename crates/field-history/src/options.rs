//! Behavior switches for a [`HistoryField`](crate::HistoryField).

/// How far the pre-delete hook widens a collapsed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteGranularity {
    /// One Unicode scalar value.
    #[default]
    Char,
    /// One extended grapheme cluster, for surfaces whose delete keys remove whole clusters.
    Grapheme,
}

/// Options controlling normalization and observer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// If `true`, a native history replay reported by the surface is reverted to the
    /// last text the normalizer observed, so only this history ever moves the text.
    pub neutralize_native_replay: bool,
    /// If `true`, observers are notified once per record of a chained undo/redo;
    /// otherwise once per `undo()`/`redo()` call.
    pub notify_chain_steps: bool,
    /// Widening used by the pre-delete hook.
    pub delete_granularity: DeleteGranularity,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            neutralize_native_replay: true,
            notify_chain_steps: true,
            delete_granularity: DeleteGranularity::Char,
        }
    }
}
