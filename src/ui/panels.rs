use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::color::SeasonColors;
use crate::data::aggregate::historical_window;
use crate::data::filter::RangeNotice;
use crate::state::AppState;
use crate::ui::{pie, plot};

// ---------------------------------------------------------------------------
// Left side panel – branding and date range
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, loaded at runtime) ----
    let logo = format!("file://{}", state.config.image_path.display());
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.9)
                .max_height(160.0)
                .corner_radius(4.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Date Range");
    ui.separator();

    let limits = state.limits;
    let mut start = state.range.start;
    let mut end = state.range.end;
    let mut changed = false;

    egui::Grid::new("date_range")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Start");
            changed |= ui
                .add(
                    DatePickerButton::new(&mut start).id_salt("start_date"),
                )
                .changed();
            ui.end_row();

            ui.label("End");
            ui.add_enabled_ui(!state.single_day, |ui: &mut Ui| {
                changed |= ui
                    .add(
                        DatePickerButton::new(&mut end).id_salt("end_date"),
                    )
                    .changed();
            });
            ui.end_row();
        });

    if changed {
        state.set_range(start, end);
    }

    let mut single_day = state.single_day;
    if ui.checkbox(&mut single_day, "Single day").changed() {
        state.set_single_day(single_day);
    }

    if ui.button("Reset").clicked() {
        state.reset_range();
    }

    ui.add_space(8.0);
    ui.small(format!("Data available {} to {}", limits.start, limits.end));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!(
            "{} days / {} hourly rows loaded",
            state.datasets.daily.len(),
            state.datasets.hourly.len()
        ));

        ui.separator();

        ui.label(format!(
            "{} days / {} hourly rows selected",
            state.view.daily.len(),
            state.view.hourly.len()
        ));

        if let Some(notice) = &state.view.notice {
            ui.separator();
            let colour = match notice {
                RangeNotice::InvalidRange { .. } => Color32::RED,
                RangeNotice::EmptySelection => Color32::from_rgb(0xE0, 0x8A, 0x00),
            };
            ui.label(RichText::new(notice.to_string()).color(colour));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – metrics and charts
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn dashboard(
    ui: &mut Ui,
    state: &AppState,
    season_colors: &SeasonColors,
    hours_ranked: &mut bool,
) {
    let summary = &state.summary;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Bike Sharing Dashboard").size(28.0));
            ui.add_space(8.0);

            ui.label(RichText::new("Daily Sharing Data").size(20.0).strong());
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Total Sharing Bike", summary.metrics.total_usage);
                metric(&mut cols[1], "Total Registered", summary.metrics.total_registered);
                metric(&mut cols[2], "Total Casual", summary.metrics.total_casual);
            });
            let (from, until) = historical_window();
            ui.small(format!(
                "{} of {} selected days counted (metrics cover {from} up to {until}, exclusive)",
                summary.daily_window.len(),
                state.view.daily.len(),
            ));
            ui.separator();

            ui.label(RichText::new("Usage Over Time").size(20.0).strong());
            plot::usage_chart(ui, &state.view.daily);
            ui.separator();

            ui.label(RichText::new("Registered vs Casual Riders").size(20.0).strong());
            pie::rider_share_section(ui, summary.rider_share);
            ui.separator();

            ui.columns(2, |cols| {
                cols[0].horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("Usage by Hour").size(18.0).strong());
                    ui.checkbox(hours_ranked, "Busiest first");
                });
                let hours = if *hours_ranked {
                    &summary.hours_by_usage
                } else {
                    &summary.hour_counts
                };
                plot::hourly_chart(&mut cols[0], hours, *hours_ranked);
                cols[1].label(RichText::new("Usage by Season").size(18.0).strong());
                plot::season_chart(&mut cols[1], &summary.seasons, season_colors);
            });
        });
}

fn metric(ui: &mut Ui, label: &str, value: u64) {
    ui.label(label);
    ui.label(RichText::new(format_count(value)).size(30.0).strong());
}

/// `1234567` → `"1,234,567"`.
fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(3292679), "3,292,679");
    }
}
