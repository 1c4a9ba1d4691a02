use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{self, SeasonColors};
use crate::data::aggregate::{HourTotal, SeasonTotal};
use crate::data::model::DailyRecord;
use crate::data::table::Table;

const CHART_HEIGHT: f32 = 280.0;

// -- Date axis helpers --

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn date_axis_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    x_to_date(mark.value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Usage over time (line chart)
// ---------------------------------------------------------------------------

/// Daily total usage over the user-filtered window.
pub fn usage_chart(ui: &mut Ui, daily: &Table<DailyRecord>) {
    let points: Vec<[f64; 2]> = daily
        .iter()
        .map(|r| [date_to_x(r.date), r.cnt as f64])
        .collect();

    Plot::new("usage_over_time")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Usage")
        .x_axis_formatter(date_axis_label)
        .label_formatter(|_name, value: &PlotPoint| match x_to_date(value.x) {
            Some(d) => format!("{d}\n{:.0} rides", value.y),
            None => String::new(),
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Daily usage")
                    .color(color::LINE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(2.5)
                    .color(color::MARKER),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Total usage per hour of day, drawn in the order given: either by hour
/// or ranked busiest first.
pub fn hourly_chart(ui: &mut Ui, hours: &[HourTotal], ranked: bool) {
    let labels: Vec<String> = hours.iter().map(|h| format!("{:02}:00", h.key)).collect();
    let bars: Vec<Bar> = hours
        .iter()
        .enumerate()
        .map(|(i, h)| {
            Bar::new(i as f64, h.total as f64)
                .width(0.8)
                .name(format!("{:02}:00", h.key))
                .fill(color::HOUR_BAR)
        })
        .collect();

    Plot::new("hourly_totals")
        .height(CHART_HEIGHT)
        .x_axis_label(if ranked { "Hour (ranked)" } else { "Hour" })
        .y_axis_label("Usage")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

/// Total usage per season present in the selection.
pub fn season_chart(ui: &mut Ui, seasons: &[SeasonTotal], colors: &SeasonColors) {
    let labels: Vec<String> = seasons.iter().map(|s| s.key.label().to_string()).collect();
    let bars: Vec<Bar> = seasons
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.total as f64)
                .width(0.6)
                .name(s.key.label())
                .fill(colors.color_for(s.key))
        })
        .collect();

    Plot::new("season_totals")
        .height(CHART_HEIGHT)
        .x_axis_label("Season")
        .y_axis_label("Usage")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

/// Label for integral grid marks that index into `labels`.
fn category_label(labels: &[String], x: f64) -> String {
    if x.fract().abs() > f64::EPSILON || x < 0.0 {
        return String::new();
    }
    labels.get(x as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2012, 2, 29).unwrap();
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(x_to_date(date_to_x(d) + 0.3), Some(d));
    }

    #[test]
    fn category_labels_only_on_whole_positions() {
        let labels = vec!["17:00".to_string(), "08:00".to_string()];
        assert_eq!(category_label(&labels, 1.0), "08:00");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 5.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
