use eframe::egui;

use crate::color::SeasonColors;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    season_colors: SeasonColors,
    hours_ranked: bool,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            season_colors: SeasonColors::default(),
            hours_ranked: true,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: branding + date range ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &self.state, &self.season_colors, &mut self.hours_ranked);
        });
    }
}
