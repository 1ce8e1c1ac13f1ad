#![warn(missing_docs)]
//! Field History - Application-Controlled Undo/Redo for Editable Text Fields
//!
//! # Overview
//!
//! `field-history` replaces a text field's native undo/redo with an explicit history
//! engine. Hosts forward the field's edit notifications (typed keys, IME commits,
//! paste, drag-and-drop, line breaks, deletes, cut); the crate normalizes each one
//! into a reversible [`EditRecord`] and replays records back onto the field on
//! undo/redo, restoring both text and caret/selection placement.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  HistoryField (commands, observers)         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Normalizer (shadow selection / IME state)  │  ← Notification → EditRecord
//! ├─────────────────────────────────────────────┤
//! │  HistoryEngine (undo/redo stacks, chains)   │  ← Replay
//! ├─────────────────────────────────────────────┤
//! │  EditRecord                                 │  ← Reversible mutation
//! ├─────────────────────────────────────────────┤
//! │  TextSurface (host field / RopeSurface)     │  ← Text + selection
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use field_history::{EditCause, HistoryField, SelectionPolicy, SurfaceEvent, TextSurface};
//!
//! let mut field = HistoryField::new("ab");
//! field.surface_mut().set_caret(1).unwrap();
//! field.handle(SurfaceEvent::SelectionChanged).unwrap();
//!
//! // Paste "XY" at offset 1.
//! field.surface_mut().replace_range("XY", 1..1, SelectionPolicy::CaretEnd).unwrap();
//! let record = field
//!     .handle(SurfaceEvent::edit_with(EditCause::Paste, "XY"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(record.range(), 1..3);
//! assert_eq!(field.text(), "aXYb");
//!
//! field.undo().unwrap();
//! assert_eq!(field.text(), "ab");
//! ```
//!
//! # Module Description
//!
//! - [`record`] - Reversible edit records and selection policies
//! - [`history`] - Undo/redo stack engine and observer hook
//! - [`normalizer`] - Notification normalizer and shadow state
//! - [`notification`] - Notification vocabulary delivered by the surface
//! - [`surface`] - Text surface capability and the rope-backed implementation
//! - [`field`] - Facade tying surface, normalizer, and engine together
//!
//! # Offsets
//!
//! All offsets are character offsets (Unicode scalar values), as half-open ranges.

mod error;
pub mod field;
pub mod history;
pub mod normalizer;
pub mod notification;
mod options;
pub mod record;
mod state;
pub mod surface;
mod text;

pub use error::HistoryError;
pub use field::{HistoryCommand, HistoryField};
pub use history::{HistoryChange, HistoryChangeCallback, HistoryChangeKind, HistoryEngine};
pub use normalizer::Normalizer;
pub use notification::{DeleteDirection, EditCause, EditNotification, SurfaceEvent};
pub use options::{DeleteGranularity, HistoryOptions};
pub use record::{EditRecord, SelectionPolicy};
pub use state::{HistoryLog, HistoryState};
pub use surface::{RopeSurface, TextSurface};
