//! Filter controls row and the popovers anchored to it

use std::collections::HashMap;

use eframe::egui::{self, RichText, ScrollArea, TextEdit, Ui};

use fleetgrid_app::BoardController;
use fleetgrid_domain::model::{Rect, Viewport};
use fleetgrid_domain::service::filter_picker::PICKER_WIDTH;
use fleetgrid_domain::service::multi_select::{CLEAR_BUTTON, SELECT_ALL_BUTTON};
use fleetgrid_domain::service::{position_popover, PopoverId, PopoverOptions, PopoverPosition};

use crate::theme::BoardTheme;

/// Multi-select triggers are wide enough for a usable option list
const FILTER_TRIGGER_WIDTH: f32 = 220.0;
const TRIGGER_HEIGHT: f32 = 24.0;
/// Search row, bulk buttons and frame padding above the option list
const POPOVER_CHROME_HEIGHT: f32 = 84.0;

pub fn to_domain_rect(rect: egui::Rect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

enum SelectAction {
    Toggle(String),
    All,
    Clear,
}

/// Remembers where each trigger was drawn so popovers can anchor to it
#[derive(Default)]
pub struct FilterBar {
    triggers: HashMap<PopoverId, egui::Rect>,
}

impl FilterBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut Ui, controller: &mut BoardController, theme: &BoardTheme) {
        self.triggers.clear();

        ui.horizontal_wrapped(|ui| {
            let picker_open = controller.state().overlay.is_open(&PopoverId::Picker);
            let label = format!("Выбрать фильтры ({})", controller.state().picker.count());
            let response = ui.vertical(|ui| {
                ui.label(RichText::new("Фильтры").small().color(theme.muted));
                ui.add_sized(
                    [160.0, TRIGGER_HEIGHT],
                    egui::Button::new(label).selected(picker_open),
                )
            });
            let response = response.inner;
            self.triggers.insert(PopoverId::Picker, response.rect);
            if response.clicked() {
                controller.overlay_mut().toggle(PopoverId::Picker);
            }

            let columns: Vec<String> = controller.state().picker.selected().to_vec();
            for column in columns {
                let Some(select) = controller.state().select(&column) else {
                    continue;
                };
                let label = select.label();
                let text = match label.badge {
                    Some(n) => format!("{}  ({})", label.text, n),
                    None => label.text.to_string(),
                };
                let id = PopoverId::Filter(column.clone());
                let open = controller.state().overlay.is_open(&id);

                let response = ui
                    .vertical(|ui| {
                        ui.label(RichText::new(&column).small().color(theme.muted));
                        ui.add_sized(
                            [FILTER_TRIGGER_WIDTH, TRIGGER_HEIGHT],
                            egui::Button::new(text).selected(open),
                        )
                    })
                    .inner;
                self.triggers.insert(id.clone(), response.rect);
                if response.clicked() {
                    controller.overlay_mut().toggle(id);
                }
            }

            ui.vertical(|ui| {
                ui.label(RichText::new(" ").small());
                if ui
                    .add_sized([140.0, TRIGGER_HEIGHT], egui::Button::new("Очистить фильтры"))
                    .clicked()
                {
                    controller.clear_all_filters();
                }
            });
        });
    }

    /// Draw the open popover, if any, and handle dismissal
    pub fn show_popovers(&mut self, ctx: &egui::Context, controller: &mut BoardController) {
        let Some(active) = controller.state().overlay.active().cloned() else {
            return;
        };
        let Some(trigger) = self.triggers.get(&active).copied() else {
            // Trigger no longer rendered (hidden filter, collapsed panel).
            controller.overlay_mut().close(&active);
            return;
        };

        let screen = ctx.screen_rect();
        let options = match active {
            PopoverId::Picker => PopoverOptions::fixed_width(PICKER_WIDTH).lock_left(),
            PopoverId::Filter(_) => PopoverOptions::default(),
        };
        let position = position_popover(
            to_domain_rect(trigger),
            Viewport::new(screen.width(), screen.height()),
            options,
        );

        let area = egui::Area::new(egui::Id::new(("popover", &active)))
            .fixed_pos(egui::pos2(position.left, position.top))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let inner_width = (position.width - 16.0).max(0.0);
                    ui.set_min_width(inner_width);
                    ui.set_max_width(inner_width);
                    match &active {
                        PopoverId::Filter(column) => {
                            multi_select_panel(ui, controller, column, &position)
                        }
                        PopoverId::Picker => picker_panel(ui, controller, &position),
                    }
                });
            });

        let panel_rect = area.response.rect;
        let (pressed, pointer, escape) = ctx.input(|i| {
            (
                i.pointer.any_pressed(),
                i.pointer.interact_pos(),
                i.key_pressed(egui::Key::Escape),
            )
        });
        let outside = pointer
            .map(|p| !panel_rect.contains(p) && !trigger.contains(p))
            .unwrap_or(false);
        if escape || (pressed && outside) {
            controller.overlay_mut().close(&active);
        }
    }
}

fn multi_select_panel(
    ui: &mut Ui,
    controller: &mut BoardController,
    column: &str,
    position: &PopoverPosition,
) {
    let Some(select) = controller.select_mut(column) else {
        return;
    };
    ui.add(
        TextEdit::singleline(select.search_mut())
            .hint_text("Поиск...")
            .desired_width(f32::INFINITY),
    );
    let options: Vec<(String, bool)> = select
        .visible_options()
        .into_iter()
        .map(|o| (o.to_string(), select.is_selected(o)))
        .collect();
    let count_text = select.count_text();

    let mut action = None;
    ui.horizontal(|ui| {
        if ui.small_button(SELECT_ALL_BUTTON).clicked() {
            action = Some(SelectAction::All);
        }
        if ui.small_button(CLEAR_BUTTON).clicked() {
            action = Some(SelectAction::Clear);
        }
        ui.label(count_text);
    });
    ui.separator();

    ScrollArea::vertical()
        .max_height((position.max_height - POPOVER_CHROME_HEIGHT).max(60.0))
        .show(ui, |ui| {
            if options.is_empty() {
                ui.label("Нет значений");
            }
            for (option, mut checked) in options {
                if ui.checkbox(&mut checked, &option).changed() {
                    action = Some(SelectAction::Toggle(option));
                }
            }
        });

    match action {
        Some(SelectAction::Toggle(value)) => controller.toggle_filter_value(column, &value),
        Some(SelectAction::All) => controller.select_all_values(column),
        Some(SelectAction::Clear) => controller.clear_filter(column),
        None => {}
    }
}

fn picker_panel(ui: &mut Ui, controller: &mut BoardController, position: &PopoverPosition) {
    ui.add(
        TextEdit::singleline(controller.picker_mut().search_mut())
            .hint_text("Поиск колонки...")
            .desired_width(f32::INFINITY),
    );
    let picker = &controller.state().picker;
    let options: Vec<(String, bool)> = picker
        .visible_options()
        .into_iter()
        .map(|c| (c.to_string(), picker.is_visible(c)))
        .collect();
    let count = picker.count();

    let mut toggled = None;
    let mut show_all = false;
    let mut hide_all = false;
    ui.horizontal(|ui| {
        show_all = ui.small_button("Все").clicked();
        hide_all = ui.small_button("Скрыть все").clicked();
        ui.label(format!("{} выбрано", count));
    });
    ui.separator();

    ScrollArea::vertical()
        .max_height((position.max_height - POPOVER_CHROME_HEIGHT).max(60.0))
        .show(ui, |ui| {
            for (column, mut visible) in options {
                if ui.checkbox(&mut visible, &column).changed() {
                    toggled = Some(column);
                }
            }
        });

    if show_all {
        controller.show_all_filters();
    } else if hide_all {
        controller.hide_all_filters();
    } else if let Some(column) = toggled {
        controller.toggle_visible_filter(&column);
    }
}
