//! Summary tables derived from a filtered view.
//!
//! Every function here is pure: it borrows its input table and returns a
//! freshly built result.

use chrono::NaiveDate;

use super::filter::{DateRange, FilteredView};
use super::model::{DailyRecord, HourlyRecord, Season};
use super::table::{sort_by_total_desc, GroupSum, Table};

/// Total `cnt` for one hour of the day.
pub type HourTotal = GroupSum<u8>;

/// Total `cnt` for one season.
pub type SeasonTotal = GroupSum<Season>;

/// Registered riders for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSum {
    pub date: NaiveDate,
    pub register_sum: u64,
}

/// Casual riders for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasualSum {
    pub date: NaiveDate,
    pub casual_sum: u64,
}

const WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2011, 1, 1) {
    Some(d) => d,
    None => panic!("invalid metric window start"),
};

const WINDOW_END: NaiveDate = match NaiveDate::from_ymd_opt(2012, 12, 31) {
    Some(d) => d,
    None => panic!("invalid metric window end"),
};

/// Fixed historical window used for the headline metrics: 2011-01-01
/// inclusive up to 2012-12-31 exclusive. Independent of the user's range.
pub fn historical_window() -> (NaiveDate, NaiveDate) {
    (WINDOW_START, WINDOW_END)
}

/// The historical window as an inclusive range, used as the picker span
/// when no daily rows are loaded.
pub fn historical_span() -> DateRange {
    let (start, end) = historical_window();
    DateRange::new(start, end)
}

/// Sum of `cnt` per hour of day, ascending by hour.
pub fn total_count_by_hour(hourly: &Table<HourlyRecord>) -> Vec<HourTotal> {
    hourly.sum_by(|r| r.hour, |r| r.cnt)
}

/// Daily rows inside the fixed historical window (upper bound exclusive).
pub fn count_by_day(daily: &Table<DailyRecord>) -> Table<DailyRecord> {
    let (from, until) = historical_window();
    daily.filter(|r| r.date >= from && r.date < until)
}

/// Sum of `registered` per date.
pub fn total_registered(daily: &Table<DailyRecord>) -> Vec<RegisteredSum> {
    daily
        .sum_by(|r| r.date, |r| r.registered)
        .into_iter()
        .map(|g| RegisteredSum {
            date: g.key,
            register_sum: g.total,
        })
        .collect()
}

/// Sum of `casual` per date.
pub fn total_casual(daily: &Table<DailyRecord>) -> Vec<CasualSum> {
    daily
        .sum_by(|r| r.date, |r| r.casual)
        .into_iter()
        .map(|g| CasualSum {
            date: g.key,
            casual_sum: g.total,
        })
        .collect()
}

/// Sum of `cnt` per hour of day, busiest hour first. Ties stay in ascending
/// hour order.
pub fn sum_order(hourly: &Table<HourlyRecord>) -> Vec<HourTotal> {
    let mut totals = total_count_by_hour(hourly);
    sort_by_total_desc(&mut totals);
    totals
}

/// Sum of `cnt` per season, ascending by season.
pub fn season_totals(hourly: &Table<HourlyRecord>) -> Vec<SeasonTotal> {
    hourly.sum_by(|r| r.season, |r| r.cnt)
}

// ---------------------------------------------------------------------------
// Rider share (pie chart)
// ---------------------------------------------------------------------------

/// Percent split between casual and registered riders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderShare {
    pub casual_pct: f64,
    pub registered_pct: f64,
}

impl RiderShare {
    /// Hardcoded illustrative split shown on the dashboard.
    pub const ILLUSTRATIVE: RiderShare = RiderShare {
        casual_pct: 18.8,
        registered_pct: 81.2,
    };

    /// Live split from totals; `None` when both are zero.
    pub fn from_totals(registered: u64, casual: u64) -> Option<Self> {
        let total = registered + casual;
        if total == 0 {
            return None;
        }
        let casual_pct = casual as f64 * 100.0 / total as f64;
        Some(RiderShare {
            casual_pct,
            registered_pct: 100.0 - casual_pct,
        })
    }
}

// ---------------------------------------------------------------------------
// Summary – everything the dashboard renders
// ---------------------------------------------------------------------------

/// Headline numbers over the doubly-filtered daily window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total_usage: u64,
    pub total_registered: u64,
    pub total_casual: u64,
}

/// The six summary tables plus headline metrics for one filtered view.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub hour_counts: Vec<HourTotal>,
    /// Daily rows inside both the user range and the historical window.
    pub daily_window: Table<DailyRecord>,
    pub hours_by_usage: Vec<HourTotal>,
    pub seasons: Vec<SeasonTotal>,
    pub metrics: Metrics,
    /// `None` only when live shares are requested and there are no riders.
    pub rider_share: Option<RiderShare>,
}

impl Summary {
    /// Run every aggregator over `view`.
    ///
    /// The registered and casual metrics are taken over the historical
    /// window intersected with the user range, like the total usage metric.
    pub fn compute(view: &FilteredView, live_rider_share: bool) -> Self {
        let daily_window = count_by_day(&view.daily);
        let metrics = Metrics {
            total_usage: daily_window.sum(|r| r.cnt),
            total_registered: total_registered(&daily_window)
                .iter()
                .map(|r| r.register_sum)
                .sum(),
            total_casual: total_casual(&daily_window)
                .iter()
                .map(|r| r.casual_sum)
                .sum(),
        };

        let rider_share = if live_rider_share {
            RiderShare::from_totals(metrics.total_registered, metrics.total_casual)
        } else {
            Some(RiderShare::ILLUSTRATIVE)
        };

        Summary {
            hour_counts: total_count_by_hour(&view.hourly),
            daily_window,
            hours_by_usage: sum_order(&view.hourly),
            seasons: season_totals(&view.hourly),
            metrics,
            rider_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::apply_range;
    use crate::data::model::Datasets;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn season(code: u8) -> Season {
        Season::new(code).unwrap()
    }

    fn daily(d: &str, season_code: u8, registered: u64, casual: u64) -> DailyRecord {
        DailyRecord {
            date: date(d),
            season: season(season_code),
            cnt: registered + casual,
            registered,
            casual,
        }
    }

    fn hourly(d: &str, hour: u8, season_code: u8, cnt: u64) -> HourlyRecord {
        HourlyRecord {
            date: date(d),
            hour,
            season: season(season_code),
            cnt,
        }
    }

    fn sample() -> Datasets {
        Datasets::new(
            vec![
                daily("2011-01-01", 1, 80, 20),
                daily("2011-01-02", 1, 40, 10),
                daily("2011-07-01", 3, 300, 120),
                daily("2012-12-30", 4, 60, 5),
                daily("2012-12-31", 4, 70, 9),
            ],
            vec![
                hourly("2011-01-01", 8, 1, 30),
                hourly("2011-01-01", 17, 1, 70),
                hourly("2011-01-02", 8, 1, 20),
                hourly("2011-01-02", 17, 1, 30),
                hourly("2011-07-01", 0, 3, 20),
                hourly("2011-07-01", 8, 3, 200),
                hourly("2011-07-01", 17, 3, 150),
                hourly("2012-12-30", 3, 4, 65),
                hourly("2012-12-31", 3, 4, 79),
            ],
        )
    }

    #[test]
    fn single_day_metrics() {
        let ds = sample();
        let view = apply_range(&ds, &DateRange::single(date("2011-01-01")));
        let summary = Summary::compute(&view, false);
        assert_eq!(
            summary.metrics,
            Metrics {
                total_usage: 100,
                total_registered: 80,
                total_casual: 20,
            }
        );
    }

    #[test]
    fn hour_totals_conserve_count_and_sort_by_hour() {
        let ds = sample();
        let totals = total_count_by_hour(&ds.hourly);
        let hours: Vec<u8> = totals.iter().map(|g| g.key).collect();
        assert_eq!(hours, vec![0, 3, 8, 17]);
        let sum: u64 = totals.iter().map(|g| g.total).sum();
        assert_eq!(sum, ds.hourly.sum(|r| r.cnt));
    }

    #[test]
    fn sum_order_is_non_increasing_with_stable_ties() {
        let ds = sample();
        let ordered = sum_order(&ds.hourly);
        assert!(ordered.windows(2).all(|w| w[0].total >= w[1].total));
        // hours 8 and 17 both total 250; ascending hour breaks the tie
        assert_eq!(ordered[0], GroupSum { key: 8, total: 250 });
        assert_eq!(ordered[1], GroupSum { key: 17, total: 250 });
        let sum: u64 = ordered.iter().map(|g| g.total).sum();
        assert_eq!(sum, ds.hourly.sum(|r| r.cnt));
        assert_eq!(sum_order(&ds.hourly), ordered);
    }

    #[test]
    fn season_totals_one_row_per_season() {
        let ds = sample();
        let seasons = season_totals(&ds.hourly);
        let keys: Vec<u8> = seasons.iter().map(|g| g.key.code()).collect();
        assert_eq!(keys, vec![1, 3, 4]);
        let sum: u64 = seasons.iter().map(|g| g.total).sum();
        assert_eq!(sum, ds.hourly.sum(|r| r.cnt));
    }

    #[test]
    fn registered_plus_casual_equals_count_per_date() {
        let ds = sample();
        let registered = total_registered(&ds.daily);
        let casual = total_casual(&ds.daily);
        assert_eq!(registered.len(), ds.daily.len());
        for ((row, reg), cas) in ds.daily.iter().zip(&registered).zip(&casual) {
            assert_eq!(reg.date, row.date);
            assert_eq!(cas.date, row.date);
            assert_eq!(reg.register_sum + cas.casual_sum, row.cnt);
        }
    }

    #[test]
    fn historical_window_bounds() {
        assert_eq!(historical_window(), (date("2011-01-01"), date("2012-12-31")));
        assert_eq!(
            historical_span(),
            DateRange::new(date("2011-01-01"), date("2012-12-31"))
        );
    }

    #[test]
    fn historical_window_excludes_last_day() {
        let ds = sample();
        let window = count_by_day(&ds.daily);
        assert_eq!(window.len(), 4);
        assert!(window.iter().all(|r| r.date < date("2012-12-31")));
    }

    #[test]
    fn window_and_user_range_intersect() {
        let ds = sample();
        let view = apply_range(
            &ds,
            &DateRange::new(date("2012-12-30"), date("2012-12-31")),
        );
        let summary = Summary::compute(&view, false);
        assert_eq!(view.daily.len(), 2);
        assert_eq!(summary.daily_window.len(), 1);
        assert_eq!(summary.metrics.total_usage, 65);
    }

    #[test]
    fn inverted_range_yields_empty_summary() {
        let ds = sample();
        let view = apply_range(
            &ds,
            &DateRange::new(date("2011-07-01"), date("2011-01-01")),
        );
        let summary = Summary::compute(&view, true);
        assert!(summary.hour_counts.is_empty());
        assert!(summary.hours_by_usage.is_empty());
        assert!(summary.seasons.is_empty());
        assert!(summary.daily_window.is_empty());
        assert_eq!(summary.metrics, Metrics::default());
        assert!(summary.rider_share.is_none());
    }

    #[test]
    fn rider_share_static_unless_live() {
        let ds = sample();
        let view = apply_range(&ds, &DateRange::single(date("2011-01-01")));
        let fixed = Summary::compute(&view, false);
        assert_eq!(fixed.rider_share, Some(RiderShare::ILLUSTRATIVE));

        let live = Summary::compute(&view, true).rider_share.unwrap();
        assert!((live.casual_pct - 20.0).abs() < 1e-9);
        assert!((live.registered_pct - 80.0).abs() < 1e-9);
    }

    #[test]
    fn aggregators_are_idempotent_and_leave_input_untouched() {
        let ds = sample();
        let before = ds.hourly.clone();
        assert_eq!(season_totals(&ds.hourly), season_totals(&ds.hourly));
        assert_eq!(total_casual(&ds.daily), total_casual(&ds.daily));
        assert_eq!(ds.hourly, before);
    }
}
