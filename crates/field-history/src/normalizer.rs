//! Edit-notification normalizer.
//!
//! The surface reports *post*-mutation state, so everything an undo needs about the
//! text before the mutation has to be remembered ahead of time. [`Normalizer`] keeps
//! that shadow state and turns each [`SurfaceEvent`] into at most one [`EditRecord`].
//!
//! Shadow state and the only events allowed to write it:
//!
//! | field | written by |
//! |---|---|
//! | selection text | `SelectionChanged`, every non-replay `Edit`, [`Normalizer::sync`] |
//! | pending delete | `BeforeDelete` (consumed by the next delete `Edit`) |
//! | composition | `CompositionStart`, `CompositionUpdate` (consumed by `CompositionCommit`) |
//! | last known value | every `Edit`, [`Normalizer::sync`] |
//! | drag source pending | every non-replay `Edit`, [`Normalizer::sync`] |

use crate::error::HistoryError;
use crate::notification::{DeleteDirection, EditCause, EditNotification, SurfaceEvent};
use crate::options::{DeleteGranularity, HistoryOptions};
use crate::record::{EditRecord, SelectionPolicy};
use crate::surface::TextSurface;
use crate::text::{char_len, next_grapheme_offset, prev_grapheme_offset};
use std::ops::Range;
use tracing::{debug, trace};

const TRACE_TARGET: &str = "field_history::normalizer";

/// IME session snapshot, rebuilt at every composition start.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompositionShadow {
    /// Text the composition replaces (the selection at composition start).
    prior_text: String,
    /// Range of the latest preedit text, or the initial selection before any update.
    range: Range<usize>,
}

/// Turns surface notifications into reversible edit records.
#[derive(Debug, Clone)]
pub struct Normalizer {
    selection_text: String,
    pending_delete: Option<String>,
    composition: Option<CompositionShadow>,
    last_known_value: String,
    drag_source_pending: bool,
    neutralize_native_replay: bool,
    delete_granularity: DeleteGranularity,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&HistoryOptions::default())
    }
}

impl Normalizer {
    /// Create a normalizer with empty shadow state.
    pub fn new(options: &HistoryOptions) -> Self {
        Self {
            selection_text: String::new(),
            pending_delete: None,
            composition: None,
            last_known_value: String::new(),
            drag_source_pending: false,
            neutralize_native_replay: options.neutralize_native_replay,
            delete_granularity: options.delete_granularity,
        }
    }

    /// Create a normalizer whose shadow state mirrors `surface`.
    pub fn for_surface<S: TextSurface + ?Sized>(
        surface: &S,
        options: &HistoryOptions,
    ) -> Result<Self, HistoryError> {
        let mut normalizer = Self::new(options);
        normalizer.sync(surface)?;
        Ok(normalizer)
    }

    pub(crate) fn seeded(options: &HistoryOptions, text: String, selection_text: String) -> Self {
        Self {
            selection_text,
            last_known_value: text,
            ..Self::new(options)
        }
    }

    /// Text selected before the most recent mutation.
    pub fn selection_text(&self) -> &str {
        &self.selection_text
    }

    /// Surface text as of the last observed edit.
    pub fn last_known_value(&self) -> &str {
        &self.last_known_value
    }

    /// True between a composition start and its commit.
    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    /// Re-read the shadow state from the surface after the history itself rewrote it.
    ///
    /// Any half-finished pairing (pending delete, drag source) is dropped.
    pub fn sync<S: TextSurface + ?Sized>(&mut self, surface: &S) -> Result<(), HistoryError> {
        self.last_known_value = surface.text();
        self.selection_text = surface.slice(surface.selection())?;
        self.pending_delete = None;
        self.drag_source_pending = false;
        Ok(())
    }

    /// Process one notification. Returns the record to capture, if the event produced one.
    pub fn handle<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        event: &SurfaceEvent,
    ) -> Result<Option<EditRecord>, HistoryError> {
        match event {
            SurfaceEvent::SelectionChanged => {
                self.selection_text = surface.slice(surface.selection())?;
                Ok(None)
            }
            SurfaceEvent::BeforeDelete(direction) => {
                self.capture_pending_delete(&*surface, *direction)?;
                Ok(None)
            }
            SurfaceEvent::CompositionStart => {
                let selection = surface.selection();
                self.composition = Some(CompositionShadow {
                    prior_text: surface.slice(selection.clone())?,
                    range: selection,
                });
                Ok(None)
            }
            SurfaceEvent::CompositionUpdate { marked } => {
                match self.composition.as_mut() {
                    Some(shadow) => shadow.range = marked.clone(),
                    None => debug!(target: TRACE_TARGET, "composition_update_without_start"),
                }
                Ok(None)
            }
            SurfaceEvent::Edit(notification) if notification.cause == EditCause::HistoryReplay => {
                self.handle_replay(surface)?;
                Ok(None)
            }
            SurfaceEvent::Edit(notification) => self.normalize_edit(&*surface, notification),
        }
    }

    fn capture_pending_delete<S: TextSurface + ?Sized>(
        &mut self,
        surface: &S,
        direction: DeleteDirection,
    ) -> Result<(), HistoryError> {
        let selection = surface.selection();
        let range = if selection.is_empty() {
            self.widen(surface, selection.start, direction)
        } else {
            selection
        };
        self.pending_delete = Some(surface.slice(range)?);
        Ok(())
    }

    /// The range one unit around `caret` in `direction`, clamped to the text.
    fn widen<S: TextSurface + ?Sized>(
        &self,
        surface: &S,
        caret: usize,
        direction: DeleteDirection,
    ) -> Range<usize> {
        match (self.delete_granularity, direction) {
            (DeleteGranularity::Char, DeleteDirection::Backward) => caret.saturating_sub(1)..caret,
            (DeleteGranularity::Char, DeleteDirection::Forward) => {
                caret..(caret + 1).min(surface.len_chars())
            }
            (DeleteGranularity::Grapheme, DeleteDirection::Backward) => {
                prev_grapheme_offset(&surface.text(), caret)..caret
            }
            (DeleteGranularity::Grapheme, DeleteDirection::Forward) => {
                caret..next_grapheme_offset(&surface.text(), caret)
            }
        }
    }

    fn handle_replay<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> Result<(), HistoryError> {
        if self.neutralize_native_replay && surface.text() != self.last_known_value {
            let len = surface.len_chars();
            surface.replace_range(&self.last_known_value, 0..len, SelectionPolicy::CaretEnd)?;
            trace!(target: TRACE_TARGET, restored_chars = char_len(&self.last_known_value), "replay_neutralized");
        } else {
            self.last_known_value = surface.text();
        }
        self.selection_text = surface.slice(surface.selection())?;
        Ok(())
    }

    fn normalize_edit<S: TextSurface + ?Sized>(
        &mut self,
        surface: &S,
        notification: &EditNotification,
    ) -> Result<Option<EditRecord>, HistoryError> {
        let cause = notification.cause;
        let record = self.build_record(surface, notification)?;

        self.last_known_value = surface.text();
        self.selection_text = surface.slice(surface.selection())?;

        let record = match record {
            Some(record) if record.is_noop() => {
                debug!(target: TRACE_TARGET, ?cause, start = record.range_start(), "noop_discarded");
                None
            }
            other => other,
        };
        self.drag_source_pending = cause == EditCause::DragDelete && record.is_some();

        if let Some(record) = &record {
            trace!(
                target: TRACE_TARGET,
                ?cause,
                start = record.range_start(),
                end = record.range_end(),
                prior_chars = char_len(record.prior_text()),
                chains = record.chains_to_next(),
                "record_built"
            );
        }
        Ok(record)
    }

    fn build_record<S: TextSurface + ?Sized>(
        &mut self,
        surface: &S,
        notification: &EditNotification,
    ) -> Result<Option<EditRecord>, HistoryError> {
        let cause = notification.cause;
        let selection = surface.selection();
        let caret = selection.end;

        let record = match cause {
            EditCause::TypedInsert | EditCause::Paste => {
                let Some(data) = notification.data.as_deref() else {
                    debug!(target: TRACE_TARGET, ?cause, "insert_without_data_ignored");
                    return Ok(None);
                };
                let start = inserted_start(cause, caret, char_len(data))?;
                EditRecord::new(data, start, self.selection_text.clone(), SelectionPolicy::CaretEnd)
            }
            EditCause::LineBreak => {
                let start = inserted_start(cause, caret, 1)?;
                EditRecord::new("\n", start, self.selection_text.clone(), SelectionPolicy::CaretEnd)
            }
            EditCause::Drop => {
                let dropped = surface.slice(selection.clone())?;
                EditRecord::new(dropped, selection.start, "", SelectionPolicy::Select)
                    .chained(self.drag_source_pending)
            }
            EditCause::CompositionCommit => return self.commit_composition(surface),
            EditCause::BackwardDelete => {
                let removed = self.take_pending_delete();
                EditRecord::new("", caret, removed, SelectionPolicy::CaretEnd)
            }
            EditCause::ForwardDelete => {
                let removed = self.take_pending_delete();
                EditRecord::new("", caret, removed, SelectionPolicy::CaretStart)
            }
            EditCause::DragDelete => {
                EditRecord::new("", caret, self.selection_text.clone(), SelectionPolicy::Select)
            }
            EditCause::Cut => {
                EditRecord::new("", caret, self.selection_text.clone(), SelectionPolicy::Select)
            }
            EditCause::HistoryReplay => return Ok(None),
        };

        HistoryError::check_range(record.range_start(), record.range_end(), surface.len_chars())?;
        Ok(Some(record))
    }

    fn take_pending_delete(&mut self) -> String {
        match self.pending_delete.take() {
            Some(removed) => removed,
            None => {
                debug!(target: TRACE_TARGET, "delete_without_pre_hook");
                self.selection_text.clone()
            }
        }
    }

    fn commit_composition<S: TextSurface + ?Sized>(
        &mut self,
        surface: &S,
    ) -> Result<Option<EditRecord>, HistoryError> {
        let Some(shadow) = self.composition.take() else {
            debug!(target: TRACE_TARGET, "composition_commit_without_start");
            return Ok(None);
        };
        let start = shadow.range.start;
        let end = surface.selection().end;
        if end == start && shadow.prior_text.is_empty() {
            debug!(target: TRACE_TARGET, start, "empty_composition_discarded");
            return Ok(None);
        }
        // An emptied composition over a selection still deleted that selection.
        let committed = surface.slice(start..end.max(start))?;
        Ok(Some(EditRecord::new(
            committed,
            start,
            shadow.prior_text,
            SelectionPolicy::CaretEnd,
        )))
    }
}

/// Start of text of `inserted` chars that ends at `caret`.
fn inserted_start(cause: EditCause, caret: usize, inserted: usize) -> Result<usize, HistoryError> {
    caret
        .checked_sub(inserted)
        .ok_or(HistoryError::MalformedNotification {
            cause,
            caret,
            inserted,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RopeSurface;

    fn normalizer_for(surface: &RopeSurface) -> Normalizer {
        Normalizer::for_surface(surface, &HistoryOptions::default()).unwrap()
    }

    #[test]
    fn typed_insert_replacing_a_selection_remembers_it() {
        let mut surface = RopeSurface::new("abc");
        surface.set_selection(1..3).unwrap();
        let mut normalizer = normalizer_for(&surface);

        surface
            .replace_range("z", 1..3, SelectionPolicy::CaretEnd)
            .unwrap();
        let record = normalizer
            .handle(&mut surface, &SurfaceEvent::edit_with(EditCause::TypedInsert, "z"))
            .unwrap()
            .unwrap();

        assert_eq!(record.range(), 1..2);
        assert_eq!(record.prior_text(), "bc");
        assert_eq!(normalizer.selection_text(), "");
        assert_eq!(normalizer.last_known_value(), "az");
    }

    #[test]
    fn insert_longer_than_caret_is_malformed() {
        let mut surface = RopeSurface::new("a");
        let mut normalizer = normalizer_for(&surface);
        let err = normalizer
            .handle(&mut surface, &SurfaceEvent::edit_with(EditCause::TypedInsert, "abc"))
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::MalformedNotification {
                cause: EditCause::TypedInsert,
                caret: 1,
                inserted: 3
            }
        );
    }

    #[test]
    fn backspace_at_start_of_text_is_discarded() {
        let mut surface = RopeSurface::new("abc");
        surface.set_caret(0).unwrap();
        let mut normalizer = normalizer_for(&surface);

        normalizer
            .handle(&mut surface, &SurfaceEvent::BeforeDelete(DeleteDirection::Backward))
            .unwrap();
        let record = normalizer
            .handle(&mut surface, &SurfaceEvent::edit(EditCause::BackwardDelete))
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn grapheme_granularity_captures_whole_cluster() {
        let options = HistoryOptions {
            delete_granularity: DeleteGranularity::Grapheme,
            ..HistoryOptions::default()
        };
        let mut surface = RopeSurface::new("ae\u{301}");
        let mut normalizer = Normalizer::for_surface(&surface, &options).unwrap();

        normalizer
            .handle(&mut surface, &SurfaceEvent::BeforeDelete(DeleteDirection::Backward))
            .unwrap();
        surface
            .replace_range("", 1..3, SelectionPolicy::CaretStart)
            .unwrap();
        let record = normalizer
            .handle(&mut surface, &SurfaceEvent::edit(EditCause::BackwardDelete))
            .unwrap()
            .unwrap();
        assert_eq!(record.prior_text(), "e\u{301}");
        assert_eq!(record.range(), 1..1);
    }
}
