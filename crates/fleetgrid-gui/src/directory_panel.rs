//! Vehicle directory panel

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use fleetgrid_app::DirectoryEditor;

use crate::theme::BoardTheme;

enum RowAction {
    Save(usize),
    Delete(usize),
}

/// Editable table of directory rows
pub struct DirectoryPanel {
    editor: DirectoryEditor,
    loaded: bool,
}

impl DirectoryPanel {
    pub fn new(editor: DirectoryEditor) -> Self {
        Self {
            editor,
            loaded: false,
        }
    }

    pub fn poll(&mut self) -> usize {
        self.editor.poll()
    }

    pub fn ui(&mut self, ui: &mut Ui, theme: &BoardTheme) {
        // First visit loads the list
        if !self.loaded {
            self.loaded = true;
            self.editor.load();
        }

        ui.horizontal(|ui| {
            ui.heading("Справочник техники");
            ui.add_space(16.0);
            if ui.button("+ Добавить").clicked() {
                self.editor.add_row();
            }
            if ui.button("Обновить").clicked() {
                self.editor.load();
            }
            ui.add_space(16.0);
            ui.label(RichText::new(self.editor.status()).color(theme.muted));
        });
        ui.separator();

        let mut action = None;
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(160.0).at_least(100.0))
            .column(Column::initial(220.0).at_least(120.0))
            .column(Column::initial(110.0).at_least(80.0))
            .column(Column::initial(110.0).at_least(80.0))
            .column(Column::remainder())
            .header(24.0, |mut header| {
                for title in ["Гос номер", "График работы", "Режим начало", "Режим конец", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (index, entry) in self.editor.rows.iter_mut().enumerate() {
                    body.row(28.0, |mut row| {
                        row.col(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut entry.vehicle_plate).hint_text("А123АА"));
                        });
                        row.col(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut entry.schedule_text).hint_text("5/2"));
                        });
                        row.col(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut entry.regime_start).hint_text("08:00"));
                        });
                        row.col(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut entry.regime_end).hint_text("17:00"));
                        });
                        row.col(|ui| {
                            if ui.button("Сохранить").clicked() {
                                action = Some(RowAction::Save(index));
                            }
                            if ui.button("Удалить").clicked() {
                                action = Some(RowAction::Delete(index));
                            }
                        });
                    });
                }
            });

        match action {
            Some(RowAction::Save(index)) => self.editor.save(index),
            Some(RowAction::Delete(index)) => self.editor.delete(index),
            None => {}
        }
    }
}
