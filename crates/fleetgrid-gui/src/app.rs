//! Main application structure with tab navigation

use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, RichText};
use tracing::{info, warn};

use fleetgrid_app::config::Config;
use fleetgrid_app::controller::BoardSettings;
use fleetgrid_app::repository::{open_board_preferences, open_gateway};
use fleetgrid_app::{BoardController, DirectoryEditor, PaletteEditor, TaskRunner};
use fleetgrid_types::{day_label, Result};

use crate::directory_panel::DirectoryPanel;
use crate::filter_bar::FilterBar;
use crate::grid_panel::GridPanel;
use crate::palette_panel::PalettePanel;
use crate::theme::BoardTheme;

/// Repaint cadence while requests are in flight
const BUSY_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Board,
    Directory,
    Palette,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Board => "Табель",
            Tab::Directory => "Справочник",
            Tab::Palette => "Палитра",
        }
    }
}

pub struct BoardApp {
    current_tab: Tab,
    controller: BoardController,
    filter_bar: FilterBar,
    grid_panel: GridPanel,
    directory_panel: DirectoryPanel,
    palette_panel: PalettePanel,
}

impl BoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.3;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let config = Config::load_effective().unwrap_or_else(|e| {
            warn!(error = %e, "config unreadable, using defaults");
            Config::default()
        });
        info!(server = %config.server_url, "starting board");

        let gateway = open_gateway(&config)?;
        let mut controller = BoardController::new(
            Arc::clone(&gateway),
            open_board_preferences(&config),
            TaskRunner::Threaded,
            BoardSettings::from(&config),
        );
        controller.start();

        Ok(Self {
            current_tab: Tab::default(),
            controller,
            filter_bar: FilterBar::new(),
            grid_panel: GridPanel::new(config.snap_quiet_secs()),
            directory_panel: DirectoryPanel::new(DirectoryEditor::new(
                Arc::clone(&gateway),
                TaskRunner::Threaded,
            )),
            palette_panel: PalettePanel::new(PaletteEditor::new(gateway, TaskRunner::Threaded)),
        })
    }

    fn render_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in [Tab::Board, Tab::Directory, Tab::Palette] {
                let selected = self.current_tab == tab;
                if ui.selectable_label(selected, tab.label()).clicked() {
                    self.current_tab = tab;
                    self.controller.overlay_mut().close_all();
                }
                ui.add_space(8.0);
            }
        });
    }

    /// Upload, day choice, export and the status line
    fn render_toolbar(&mut self, ui: &mut egui::Ui, theme: &BoardTheme) {
        ui.horizontal(|ui| {
            let uploading = self.controller.state().uploading;
            if ui
                .add_enabled(!uploading, egui::Button::new("Загрузить .xlsx"))
                .clicked()
            {
                let picked = rfd::FileDialog::new()
                    .add_filter("Excel", &["xlsx"])
                    .pick_file();
                // Cancelling the dialog is reported like a wrong file
                self.controller.upload(picked.as_deref());
            }

            ui.separator();
            let state = self.controller.state();
            let dates = state.meta.dates.clone();
            let current = state.day.clone();
            let selected_text = current.as_deref().map(day_label).unwrap_or_default();
            let mut chosen = None;
            egui::ComboBox::from_id_salt("day_select")
                .selected_text(selected_text)
                .width(180.0)
                .show_ui(ui, |ui| {
                    for day in &dates {
                        let is_current = current.as_deref() == Some(day.as_str());
                        if ui.selectable_label(is_current, day_label(day)).clicked() && !is_current {
                            chosen = Some(day.clone());
                        }
                    }
                });
            if let Some(day) = chosen {
                self.controller.select_day(&day);
            }
            if ui
                .add_enabled(current.is_some(), egui::Button::new("Обновить"))
                .clicked()
            {
                self.controller.refresh();
            }

            if ui
                .add_enabled(current.is_some(), egui::Button::new("Выгрузить"))
                .clicked()
            {
                let file_name = format!("board_{}.xlsx", current.as_deref().unwrap_or("day"));
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Excel", &["xlsx"])
                    .set_file_name(file_name)
                    .save_file()
                {
                    self.controller.export(path);
                }
            }

            ui.separator();
            let toggle = if self.controller.state().filters_collapsed {
                "Показать фильтры"
            } else {
                "Скрыть фильтры"
            };
            if ui.button(toggle).clicked() {
                self.controller.toggle_filters_panel();
            }

            ui.separator();
            if self.controller.is_busy() {
                ui.spinner();
            }
            ui.label(RichText::new(&self.controller.state().status).color(theme.muted));
        });
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut busy = self.controller.poll() > 0 || self.controller.is_busy();
        busy |= self.directory_panel.poll() > 0;
        if self.palette_panel.poll() {
            // Board colors follow the stored palette
            self.controller.load_palette();
            busy = true;
        }

        let theme = BoardTheme::from_palette(&self.controller.state().palette);

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_tab_bar(ui);
            ui.add_space(4.0);
        });

        match self.current_tab {
            Tab::Board => {
                egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                    ui.add_space(4.0);
                    self.render_toolbar(ui, &theme);
                    ui.add_space(4.0);
                });
                if !self.controller.state().filters_collapsed {
                    egui::TopBottomPanel::top("filters").show(ctx, |ui| {
                        ui.add_space(4.0);
                        self.filter_bar.ui(ui, &mut self.controller, &theme);
                        ui.add_space(4.0);
                    });
                }
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.grid_panel.ui(ui, &mut self.controller, &theme);
                });
                if self.controller.state().filters_collapsed {
                    self.controller.overlay_mut().close_all();
                } else {
                    self.filter_bar.show_popovers(ctx, &mut self.controller);
                }
            }
            Tab::Directory => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.directory_panel.ui(ui, &theme);
                });
                busy = true;
            }
            Tab::Palette => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.palette_panel.ui(ui, &theme);
                });
                busy = true;
            }
        }

        if busy {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}
