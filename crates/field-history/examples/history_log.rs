//! History log example
//!
//! Drives a `HistoryField` the way a host text field would and prints the
//! undo/redo log after every step, with the crate's debug events on stdout.

use field_history::{
    DeleteDirection, EditCause, HistoryCommand, HistoryField, SelectionPolicy, SurfaceEvent,
    TextSurface,
};
use std::ops::Range;

fn main() -> Result<(), field_history::HistoryError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .init();

    println!("=== field history log ===\n");

    let mut field = HistoryField::new("Hello world");

    field.subscribe(|change| {
        let line = change
            .record
            .map(|record| record.to_string())
            .unwrap_or_default();
        println!(
            "  [{:?}] {} (undo: {}, redo: {})",
            change.kind,
            line,
            change.undo_stack.len(),
            change.redo_stack.len()
        );
    });

    println!("1. type '!' at the end");
    select(&mut field, 11..11)?;
    field
        .surface_mut()
        .replace_range("!", 11..11, SelectionPolicy::CaretEnd)?;
    field.handle(SurfaceEvent::edit_with(EditCause::TypedInsert, "!"))?;
    print_field(&field);

    println!("2. backspace over \"world\"");
    select(&mut field, 6..11)?;
    field.handle(SurfaceEvent::BeforeDelete(DeleteDirection::Backward))?;
    field
        .surface_mut()
        .replace_range("", 6..11, SelectionPolicy::CaretStart)?;
    field.handle(SurfaceEvent::edit(EditCause::BackwardDelete))?;
    print_field(&field);

    println!("3. compose \"世界\" through an IME");
    field.handle(SurfaceEvent::CompositionStart)?;
    field
        .surface_mut()
        .replace_range("sekai", 6..6, SelectionPolicy::CaretEnd)?;
    field.handle(SurfaceEvent::CompositionUpdate { marked: 6..11 })?;
    field
        .surface_mut()
        .replace_range("世界", 6..11, SelectionPolicy::CaretEnd)?;
    field.handle(SurfaceEvent::edit(EditCause::CompositionCommit))?;
    print_field(&field);

    println!("4. undo twice");
    field.execute(HistoryCommand::Undo)?;
    field.execute(HistoryCommand::Undo)?;
    print_field(&field);

    println!("5. redo once");
    field.execute(HistoryCommand::Redo)?;
    print_field(&field);

    Ok(())
}

fn select(field: &mut HistoryField, range: Range<usize>) -> Result<(), field_history::HistoryError> {
    field.surface_mut().set_selection(range)?;
    field.handle(SurfaceEvent::SelectionChanged)?;
    Ok(())
}

fn print_field(field: &HistoryField) {
    println!("  text: {:?}, selection: {:?}", field.text(), field.surface().selection());
    print!("{}", field.log());
    println!();
}
