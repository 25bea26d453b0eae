//! Directory and palette editors against the in-process fake server

mod common;

use std::sync::Arc;

use common::FakeGateway;
use fleetgrid_app::controller::status;
use fleetgrid_app::{DirectoryEditor, PaletteEditor, TaskRunner};
use fleetgrid_types::Palette;

#[test]
fn test_directory_load_and_upsert() {
    let fake = Arc::new(FakeGateway::new());
    let mut editor = DirectoryEditor::new(fake.clone(), TaskRunner::Inline);
    editor.load();
    assert_eq!(editor.status(), status::LOADING);
    editor.poll();
    assert_eq!(editor.rows.len(), 1);
    assert_eq!(editor.status(), "Строк: 1");

    editor.add_row();
    editor.rows[0].vehicle_plate = "  В777ВВ ".to_string();
    editor.rows[0].schedule_text = "2/2".to_string();
    editor.save(0);
    assert_eq!(editor.status(), status::SAVING);
    editor.poll();

    assert_eq!(editor.status(), "Строк: 2");
    assert!(editor.rows.iter().any(|r| r.vehicle_plate == "В777ВВ"));
}

#[test]
fn test_directory_upsert_error_shows_server_text() {
    let fake = Arc::new(FakeGateway::new());
    let mut editor = DirectoryEditor::new(fake, TaskRunner::Inline);
    editor.load();
    editor.poll();

    editor.add_row();
    editor.save(0);
    editor.poll();
    assert_eq!(editor.status(), "Ошибка: vehicle_plate is required");
    assert_eq!(editor.rows.len(), 2);
}

#[test]
fn test_directory_delete_reloads() {
    let fake = Arc::new(FakeGateway::new());
    let mut editor = DirectoryEditor::new(fake, TaskRunner::Inline);
    editor.load();
    editor.poll();

    editor.add_row();
    editor.delete(0);
    editor.poll();
    assert_eq!(editor.rows.len(), 2);

    editor.delete(1);
    editor.poll();
    assert!(editor.rows.is_empty());
    assert_eq!(editor.status(), "Строк: 0");
}

#[test]
fn test_palette_save_normalizes_and_reset() {
    let fake = Arc::new(FakeGateway::new());
    let mut editor = PaletteEditor::new(fake, TaskRunner::Inline);
    editor.load();
    editor.poll();
    assert_eq!(editor.draft, Palette::default());

    editor.draft.accent = " F0A ".to_string();
    editor.draft.border = "nope".to_string();
    assert_eq!(editor.preview().accent, "#ff00aa");

    editor.save();
    assert_eq!(editor.status(), status::SAVING);
    editor.poll();
    assert_eq!(editor.status(), status::SAVED);
    assert_eq!(editor.draft.accent, "#ff00aa");
    assert_eq!(editor.draft.border, "#0b0f14");

    editor.reset();
    editor.poll();
    assert_eq!(editor.status(), status::RESET_DONE);
    assert_eq!(editor.draft, Palette::default());
}
