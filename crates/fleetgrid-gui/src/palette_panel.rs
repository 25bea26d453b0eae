//! Palette editor panel with a live preview

use eframe::egui::{self, vec2, Color32, RichText, Sense, Ui};

use fleetgrid_app::controller::status;
use fleetgrid_app::PaletteEditor;
use fleetgrid_domain::model::{invalid_fields, PaletteField};
use fleetgrid_types::Layer;

use crate::theme::BoardTheme;

pub struct PalettePanel {
    editor: PaletteEditor,
    loaded: bool,
}

impl PalettePanel {
    pub fn new(editor: PaletteEditor) -> Self {
        Self {
            editor,
            loaded: false,
        }
    }

    /// Apply finished requests; true when the stored palette changed
    pub fn poll(&mut self) -> bool {
        self.editor.poll() > 0
            && matches!(self.editor.status(), status::SAVED | status::RESET_DONE)
    }

    pub fn ui(&mut self, ui: &mut Ui, theme: &BoardTheme) {
        if !self.loaded {
            self.loaded = true;
            self.editor.load();
        }

        ui.heading("Палитра");
        ui.add_space(8.0);

        let invalid = invalid_fields(&self.editor.draft);
        egui::Grid::new("palette_fields")
            .num_columns(3)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for field in PaletteField::ALL {
                    ui.label(field.label());
                    ui.add(
                        egui::TextEdit::singleline(field.get_mut(&mut self.editor.draft))
                            .desired_width(120.0)
                            .hint_text("#rrggbb"),
                    );
                    if invalid.contains(&field) {
                        ui.label(RichText::new("неверный цвет").small().color(Color32::from_rgb(0xdc, 0x26, 0x26)));
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Сохранить").clicked() {
                self.editor.save();
            }
            if ui.button("Сбросить").clicked() {
                self.editor.reset();
            }
            ui.label(RichText::new(self.editor.status()).color(theme.muted));
        });

        ui.add_space(16.0);
        ui.label(RichText::new("Предпросмотр").strong());
        preview(ui, &BoardTheme::from_palette(&self.editor.preview()));
    }
}

/// Three layer rows with a few filled cells, drawn in the draft colors
fn preview(ui: &mut Ui, theme: &BoardTheme) {
    const CELL: f32 = 28.0;
    const SLOTS: usize = 8;
    const LABEL: f32 = 110.0;
    let filled = [
        [false, true, true, true, false, false, true, true],
        [false, false, true, true, true, false, false, false],
        [false, true, true, false, true, false, true, false],
    ];

    let size = vec2(LABEL + CELL * SLOTS as f32, CELL * 3.0);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.sticky_bg);

    for (row, layer) in Layer::ALL.iter().copied().enumerate() {
        let top = rect.top() + row as f32 * CELL;
        painter.text(
            egui::pos2(rect.left() + 4.0, top + CELL / 2.0),
            egui::Align2::LEFT_CENTER,
            layer.label(),
            egui::FontId::proportional(12.0),
            theme.text,
        );
        for (slot, on) in filled[row].iter().enumerate() {
            let cell = egui::Rect::from_min_size(
                egui::pos2(rect.left() + LABEL + slot as f32 * CELL, top),
                vec2(CELL, CELL),
            );
            if *on {
                let fill = if layer == Layer::Plan { theme.plan_tint() } else { theme.layer_fill(layer) };
                painter.rect_filled(cell.shrink(2.0), 2.0, fill);
            }
            painter.vline(cell.right(), cell.y_range(), egui::Stroke::new(0.5, theme.border.gamma_multiply(0.2)));
        }
        painter.hline(rect.x_range(), top + CELL, egui::Stroke::new(0.5, theme.border.gamma_multiply(0.2)));
    }
    painter.hline(rect.x_range(), rect.top(), egui::Stroke::new(1.5, theme.accent));
}
