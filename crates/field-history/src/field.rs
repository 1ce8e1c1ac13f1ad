//! History-controlled text field.
//!
//! [`HistoryField`] is the entry point for hosts. It owns the text surface, the
//! [`Normalizer`] and the [`HistoryEngine`], and keeps them consistent:
//!
//! 1. The host forwards every surface notification to [`handle()`](HistoryField::handle).
//! 2. The normalizer turns it into at most one record, which is captured.
//! 3. Command dispatch calls [`undo()`](HistoryField::undo) / [`redo()`](HistoryField::redo)
//!    (or [`execute()`](HistoryField::execute)); after each replay the normalizer
//!    re-reads its shadow state so the replay itself is never captured.
//!
//! # Example
//!
//! ```rust
//! use field_history::{EditCause, HistoryCommand, HistoryField, SelectionPolicy, SurfaceEvent, TextSurface};
//!
//! let mut field = HistoryField::new("abc");
//!
//! // The user types "d" at the end; the surface applies it, then notifies.
//! field.surface_mut().replace_range("d", 3..3, SelectionPolicy::CaretEnd).unwrap();
//! field.handle(SurfaceEvent::edit_with(EditCause::TypedInsert, "d")).unwrap();
//! assert_eq!(field.text(), "abcd");
//!
//! field.execute(HistoryCommand::Undo).unwrap();
//! assert_eq!(field.text(), "abc");
//! field.execute(HistoryCommand::Redo).unwrap();
//! assert_eq!(field.text(), "abcd");
//! ```

use crate::error::HistoryError;
use crate::history::{HistoryChange, HistoryEngine};
use crate::normalizer::Normalizer;
use crate::notification::SurfaceEvent;
use crate::options::HistoryOptions;
use crate::record::EditRecord;
use crate::state::{HistoryLog, HistoryState};
use crate::surface::{RopeSurface, TextSurface};
use std::sync::Arc;

/// Commands accepted from command dispatch (shortcut handling, menus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Undo the most recent logical action.
    Undo,
    /// Redo the most recently undone logical action.
    Redo,
    /// Forget all history.
    Clear,
}

/// A text surface whose undo/redo is driven by this crate.
pub struct HistoryField<S: TextSurface = RopeSurface> {
    surface: S,
    normalizer: Normalizer,
    history: HistoryEngine,
    options: HistoryOptions,
}

impl HistoryField<RopeSurface> {
    /// Create a field over an in-memory surface holding `text`.
    pub fn new(text: &str) -> Self {
        Self::with_options(text, HistoryOptions::default())
    }

    /// Create an empty field.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create a field over an in-memory surface with explicit options.
    pub fn with_options(text: &str, options: HistoryOptions) -> Self {
        let surface = RopeSurface::new(text);
        let normalizer = Normalizer::seeded(&options, surface.text(), surface.selected_text());
        Self::assemble(surface, normalizer, options)
    }

    /// Replace the whole content and forget all history.
    pub fn reset(&mut self, text: &str) {
        self.surface.reset(text);
        self.normalizer = Normalizer::seeded(
            &self.options,
            self.surface.text(),
            self.surface.selected_text(),
        );
        self.history.clear();
    }
}

impl<S: TextSurface> HistoryField<S> {
    /// Wrap a host surface.
    pub fn with_surface(surface: S, options: HistoryOptions) -> Result<Self, HistoryError> {
        let normalizer = Normalizer::for_surface(&surface, &options)?;
        Ok(Self::assemble(surface, normalizer, options))
    }

    fn assemble(surface: S, normalizer: Normalizer, options: HistoryOptions) -> Self {
        let mut history = HistoryEngine::new();
        history.set_notify_chain_steps(options.notify_chain_steps);
        Self {
            surface,
            normalizer,
            history,
            options,
        }
    }

    /// Process one surface notification, capturing the record it produces.
    pub fn handle(&mut self, event: SurfaceEvent) -> Result<Option<Arc<EditRecord>>, HistoryError> {
        let record = self.normalizer.handle(&mut self.surface, &event)?;
        Ok(record.map(|record| self.history.capture(record)))
    }

    /// Process notifications in order, stopping at the first error.
    pub fn handle_all<I>(&mut self, events: I) -> Result<Vec<Arc<EditRecord>>, HistoryError>
    where
        I: IntoIterator<Item = SurfaceEvent>,
    {
        let mut captured = Vec::new();
        for event in events {
            if let Some(record) = self.handle(event)? {
                captured.push(record);
            }
        }
        Ok(captured)
    }

    /// Execute a history command. Returns the number of records applied.
    pub fn execute(&mut self, command: HistoryCommand) -> Result<usize, HistoryError> {
        match command {
            HistoryCommand::Undo => self.undo(),
            HistoryCommand::Redo => self.redo(),
            HistoryCommand::Clear => {
                self.clear();
                Ok(0)
            }
        }
    }

    /// Undo the most recent logical action; a no-op returning `0` when there is none.
    pub fn undo(&mut self) -> Result<usize, HistoryError> {
        let result = self.history.undo(&mut self.surface);
        self.normalizer.sync(&self.surface)?;
        result
    }

    /// Redo the most recently undone logical action; a no-op returning `0` when there is none.
    pub fn redo(&mut self) -> Result<usize, HistoryError> {
        let result = self.history.redo(&mut self.surface);
        self.normalizer.sync(&self.surface)?;
        result
    }

    /// Forget all history, keeping the text.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Register a history observer.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&HistoryChange<'_>) + Send + 'static,
    {
        self.history.subscribe(callback);
    }

    /// Current text of the surface.
    pub fn text(&self) -> String {
        self.surface.text()
    }

    /// Borrow the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface, to apply user edits before notifying.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Borrow the history engine.
    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    /// Borrow the normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Options this field was built with.
    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Stack depth snapshot.
    pub fn state(&self) -> HistoryState {
        self.history.state()
    }

    /// Rendered undo/redo log.
    pub fn log(&self) -> HistoryLog {
        self.history.log()
    }
}
