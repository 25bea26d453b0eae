//! GUI entry point for the FleetGrid scheduling board

mod app;
mod directory_panel;
mod filter_bar;
mod grid_panel;
mod palette_panel;
mod theme;

use app::BoardApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 820.0])
            .with_min_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Табель техники",
        options,
        Box::new(|cc| Ok(Box::new(BoardApp::new(cc)?))),
    )
}
