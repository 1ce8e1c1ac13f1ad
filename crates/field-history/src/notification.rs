//! Notifications a text surface delivers to the history core.
//!
//! Timing contract:
//! - [`SurfaceEvent::Edit`] arrives *after* the surface applied the mutation.
//! - [`SurfaceEvent::BeforeDelete`] arrives immediately *before* a backward or
//!   forward delete, while the characters are still present.
//! - [`SurfaceEvent::CompositionStart`] arrives before the first preedit text
//!   is rendered; [`SurfaceEvent::CompositionUpdate`] after each rendering.
//! - [`SurfaceEvent::SelectionChanged`] arrives whenever the selection moved.

use std::ops::Range;

/// Why the surface content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCause {
    /// Characters typed directly (no IME).
    TypedInsert,
    /// A line break inserted with Enter.
    LineBreak,
    /// Clipboard paste.
    Paste,
    /// Text dropped at the drop point of a drag-and-drop.
    Drop,
    /// An IME composition session committed its text.
    CompositionCommit,
    /// Backspace.
    BackwardDelete,
    /// Delete.
    ForwardDelete,
    /// Source side of a drag-and-drop move inside the same surface.
    DragDelete,
    /// Clipboard cut.
    Cut,
    /// The surface replayed its own native history.
    HistoryReplay,
}

/// Direction of a pending delete, reported by the pre-mutation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDirection {
    /// Backspace: the character before the caret.
    Backward,
    /// Delete: the character after the caret.
    Forward,
}

impl DeleteDirection {
    /// The edit cause that follows this pre-mutation hook.
    pub fn cause(self) -> EditCause {
        match self {
            DeleteDirection::Backward => EditCause::BackwardDelete,
            DeleteDirection::Forward => EditCause::ForwardDelete,
        }
    }
}

/// A post-mutation change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNotification {
    /// Why the content changed.
    pub cause: EditCause,
    /// Inserted text, for typed input and paste. `None` for everything else.
    pub data: Option<String>,
}

impl EditNotification {
    /// A notification without payload.
    pub fn new(cause: EditCause) -> Self {
        Self { cause, data: None }
    }

    /// A notification carrying the inserted text.
    pub fn with_data(cause: EditCause, data: impl Into<String>) -> Self {
        Self {
            cause,
            data: Some(data.into()),
        }
    }
}

/// Everything a surface can report to the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The selection changed.
    SelectionChanged,
    /// A delete is about to happen.
    BeforeDelete(DeleteDirection),
    /// An IME composition session began.
    CompositionStart,
    /// The IME rendered new preedit text.
    CompositionUpdate {
        /// Character range the preedit text occupies.
        marked: Range<usize>,
    },
    /// The content changed.
    Edit(EditNotification),
}

impl SurfaceEvent {
    /// Shorthand for `SurfaceEvent::Edit(EditNotification::new(cause))`.
    pub fn edit(cause: EditCause) -> Self {
        SurfaceEvent::Edit(EditNotification::new(cause))
    }

    /// Shorthand for an edit notification with inserted text.
    pub fn edit_with(cause: EditCause, data: impl Into<String>) -> Self {
        SurfaceEvent::Edit(EditNotification::with_data(cause, data))
    }
}
