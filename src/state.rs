use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::aggregate::{historical_span, Summary};
use crate::data::filter::{apply_range, DateRange, FilteredView};
use crate::data::loader::{load_datasets, LoadError};
use crate::data::model::Datasets;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Built once at startup; the base tables are never modified afterwards.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded base tables.
    pub datasets: Datasets,

    /// `[min_date, max_date]` of the daily table; the picker stays inside it.
    pub limits: DateRange,

    /// Current user selection.
    pub range: DateRange,

    /// Collapse the range onto the start date.
    pub single_day: bool,

    /// Both tables restricted to `range`.
    pub view: FilteredView,

    /// Aggregates over `view`.
    pub summary: Summary,
}

impl AppState {
    /// Load the configured tables and run the pipeline over the full span.
    pub fn load(config: DashboardConfig) -> Result<Self, LoadError> {
        let datasets = load_datasets(&config.daily_path, &config.hourly_path)?;
        Ok(Self::new(config, datasets))
    }

    pub fn new(config: DashboardConfig, datasets: Datasets) -> Self {
        let limits = DateRange::span_of(&datasets.daily, historical_span());
        let mut state = Self {
            config,
            datasets,
            limits,
            range: limits,
            single_day: false,
            view: FilteredView::default(),
            summary: Summary::default(),
        };
        state.refilter();
        state
    }

    /// Re-run filter and aggregation after a range change.
    pub fn refilter(&mut self) {
        self.view = apply_range(&self.datasets, &self.range);
        self.summary = Summary::compute(&self.view, self.config.live_rider_share);
        log::debug!(
            "Range {}: {} daily / {} hourly rows",
            self.range,
            self.view.daily.len(),
            self.view.hourly.len()
        );
    }

    /// Apply picked bounds: clamp into the data span, collapse when in
    /// single-day mode, then recompute.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let picked = if self.single_day {
            DateRange::single(start)
        } else {
            DateRange::new(start, end)
        };
        self.range = picked.clamp_to(&self.limits);
        self.refilter();
    }

    pub fn set_single_day(&mut self, single_day: bool) {
        self.single_day = single_day;
        self.set_range(self.range.start, self.range.end);
    }

    /// Back to the full span of the daily table.
    pub fn reset_range(&mut self) {
        self.single_day = false;
        self.set_range(self.limits.start, self.limits.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RangeNotice;
    use crate::data::model::{DailyRecord, HourlyRecord, Season};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state() -> AppState {
        let season = Season::new(1).unwrap();
        let daily = vec![
            DailyRecord {
                date: date("2011-01-01"),
                season,
                cnt: 100,
                registered: 80,
                casual: 20,
            },
            DailyRecord {
                date: date("2011-01-02"),
                season,
                cnt: 50,
                registered: 40,
                casual: 10,
            },
        ];
        let hourly = vec![HourlyRecord {
            date: date("2011-01-02"),
            hour: 9,
            season,
            cnt: 50,
        }];
        AppState::new(DashboardConfig::default(), Datasets::new(daily, hourly))
    }

    #[test]
    fn defaults_to_full_span() {
        let state = state();
        assert_eq!(state.range, DateRange::new(date("2011-01-01"), date("2011-01-02")));
        assert_eq!(state.summary.metrics.total_usage, 150);
    }

    #[test]
    fn picked_range_is_clamped() {
        let mut state = state();
        state.set_range(date("2010-01-01"), date("2011-01-01"));
        assert_eq!(state.range, DateRange::single(date("2011-01-01")));
        assert_eq!(state.summary.metrics.total_usage, 100);
        assert_eq!(state.summary.metrics.total_registered, 80);
        assert_eq!(state.summary.metrics.total_casual, 20);
    }

    #[test]
    fn single_day_collapses_onto_start() {
        let mut state = state();
        state.set_single_day(true);
        assert_eq!(state.range, DateRange::single(date("2011-01-01")));
        state.reset_range();
        assert!(!state.single_day);
        assert_eq!(state.range, state.limits);
    }

    #[test]
    fn inverted_pick_degrades_to_empty() {
        let mut state = state();
        state.set_range(date("2011-01-02"), date("2011-01-01"));
        assert!(state.view.daily.is_empty());
        assert!(matches!(state.view.notice, Some(RangeNotice::InvalidRange { .. })));
        assert_eq!(state.summary.metrics.total_usage, 0);
    }
}
