#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use field_history::{
    DeleteDirection, EditCause, EditRecord, HistoryField, HistoryOptions, SelectionPolicy,
    SurfaceEvent, TextSurface,
};
use std::ops::Range;
use std::sync::Arc;

/// Simulated host: applies user edits to the rope surface in the order a browser
/// text field does, and forwards each notification to the field.
pub struct Session {
    pub field: HistoryField,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self {
            field: HistoryField::new(text),
        }
    }

    pub fn with_options(text: &str, options: HistoryOptions) -> Self {
        Self {
            field: HistoryField::with_options(text, options),
        }
    }

    pub fn text(&self) -> String {
        self.field.text()
    }

    pub fn selection(&self) -> Range<usize> {
        self.field.surface().selection()
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.field.surface_mut().set_selection(range).unwrap();
        self.notify(SurfaceEvent::SelectionChanged);
    }

    pub fn caret(&mut self, offset: usize) {
        self.select(offset..offset);
    }

    pub fn type_text(&mut self, text: &str) -> Option<Arc<EditRecord>> {
        self.replace_selection(text);
        self.edit(SurfaceEvent::edit_with(EditCause::TypedInsert, text))
    }

    pub fn line_break(&mut self) -> Option<Arc<EditRecord>> {
        self.replace_selection("\n");
        self.edit(SurfaceEvent::edit(EditCause::LineBreak))
    }

    pub fn paste(&mut self, text: &str) -> Option<Arc<EditRecord>> {
        self.replace_selection(text);
        self.edit(SurfaceEvent::edit_with(EditCause::Paste, text))
    }

    pub fn cut(&mut self) -> Option<Arc<EditRecord>> {
        let selection = self.selection();
        self.apply("", selection, SelectionPolicy::CaretStart);
        self.edit(SurfaceEvent::edit(EditCause::Cut))
    }

    pub fn backspace(&mut self) -> Option<Arc<EditRecord>> {
        self.notify(SurfaceEvent::BeforeDelete(DeleteDirection::Backward));
        let selection = self.selection();
        let range = if selection.is_empty() {
            selection.start.saturating_sub(1)..selection.end
        } else {
            selection
        };
        self.apply("", range, SelectionPolicy::CaretStart);
        self.edit(SurfaceEvent::edit(EditCause::BackwardDelete))
    }

    pub fn delete_forward(&mut self) -> Option<Arc<EditRecord>> {
        self.notify(SurfaceEvent::BeforeDelete(DeleteDirection::Forward));
        let selection = self.selection();
        let len = self.field.surface().len_chars();
        let range = if selection.is_empty() {
            selection.start..(selection.end + 1).min(len)
        } else {
            selection
        };
        self.apply("", range, SelectionPolicy::CaretStart);
        self.edit(SurfaceEvent::edit(EditCause::ForwardDelete))
    }

    /// Drag the current selection to `drop_at`, given in pre-move coordinates.
    /// Returns `(source_record, drop_record)`.
    pub fn drag_move(
        &mut self,
        drop_at: usize,
    ) -> (Option<Arc<EditRecord>>, Option<Arc<EditRecord>>) {
        let selection = self.selection();
        let dragged = self.field.surface().slice(selection.clone()).unwrap();
        assert!(
            drop_at <= selection.start || drop_at >= selection.end,
            "drop point inside the dragged text"
        );
        self.apply("", selection.clone(), SelectionPolicy::CaretStart);
        let source = self.edit(SurfaceEvent::edit(EditCause::DragDelete));

        let target = if drop_at >= selection.end {
            drop_at - selection.len()
        } else {
            drop_at
        };
        self.apply(&dragged, target..target, SelectionPolicy::Select);
        let dropped = self.edit(SurfaceEvent::edit(EditCause::Drop));
        (source, dropped)
    }

    /// Drop text dragged in from outside the field.
    pub fn drop_external(&mut self, at: usize, text: &str) -> Option<Arc<EditRecord>> {
        self.apply(text, at..at, SelectionPolicy::Select);
        self.edit(SurfaceEvent::edit(EditCause::Drop))
    }

    /// Run an IME session rendering each preedit in turn, then committing `commit`.
    pub fn compose(&mut self, preedits: &[&str], commit: &str) -> Option<Arc<EditRecord>> {
        self.notify(SurfaceEvent::CompositionStart);
        let mut marked = self.selection();
        for preedit in preedits {
            self.apply(preedit, marked.clone(), SelectionPolicy::CaretEnd);
            marked = marked.start..marked.start + preedit.chars().count();
            self.notify(SurfaceEvent::CompositionUpdate {
                marked: marked.clone(),
            });
        }
        self.apply(commit, marked, SelectionPolicy::CaretEnd);
        self.edit(SurfaceEvent::edit(EditCause::CompositionCommit))
    }

    /// The surface runs its own native undo, leaving `replayed_text` behind.
    pub fn native_replay(&mut self, replayed_text: &str) {
        let len = self.field.surface().len_chars();
        self.apply(replayed_text, 0..len, SelectionPolicy::CaretEnd);
        self.notify(SurfaceEvent::edit(EditCause::HistoryReplay));
    }

    pub fn undo(&mut self) -> usize {
        self.field.undo().unwrap()
    }

    pub fn redo(&mut self) -> usize {
        self.field.redo().unwrap()
    }

    fn replace_selection(&mut self, text: &str) {
        let selection = self.selection();
        self.apply(text, selection, SelectionPolicy::CaretEnd);
    }

    fn apply(&mut self, text: &str, range: Range<usize>, mode: SelectionPolicy) {
        self.field
            .surface_mut()
            .replace_range(text, range, mode)
            .unwrap();
    }

    fn edit(&mut self, event: SurfaceEvent) -> Option<Arc<EditRecord>> {
        let record = self.field.handle(event).unwrap();
        self.notify(SurfaceEvent::SelectionChanged);
        record
    }

    fn notify(&mut self, event: SurfaceEvent) {
        let record = self.field.handle(event).unwrap();
        assert!(record.is_none());
    }
}

/// `(replacement, start, end, prior, policy, chains)` for compact assertions.
pub fn shape(record: &EditRecord) -> (String, usize, usize, String, SelectionPolicy, bool) {
    (
        record.replacement_text().to_string(),
        record.range_start(),
        record.range_end(),
        record.prior_text().to_string(),
        record.selection_policy(),
        record.chains_to_next(),
    )
}
