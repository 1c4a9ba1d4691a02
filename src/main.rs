mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use app::DashboardApp;
use config::{DashboardConfig, CONFIG_PATH};
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    let config = match DashboardConfig::load_or_default(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load failures are fatal: nothing to show without both tables.
    let state = match AppState::load(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load data: {e}");
            eprintln!("bike-dashboard: {e}");
            return ExitCode::FAILURE;
        }
    };

    let [width, height] = state.config.window_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the sidebar png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(state)))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI terminated with an error: {e}");
            ExitCode::FAILURE
        }
    }
}
