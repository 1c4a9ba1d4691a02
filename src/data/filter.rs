use std::fmt;

use chrono::NaiveDate;

use super::model::{DailyRecord, Datasets, HourlyRecord};
use super::table::Table;

// ---------------------------------------------------------------------------
// DateRange – inclusive user selection
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` calendar range.
///
/// An inverted range (`start > end`) is representable on purpose: it matches
/// nothing instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both bounds collapsed onto one day.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// The whole span of `table`, or `fallback` when the table is empty.
    pub fn span_of(table: &Table<DailyRecord>, fallback: DateRange) -> Self {
        table
            .date_span()
            .map(|(first, last)| Self::new(first, last))
            .unwrap_or(fallback)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Clamp each bound independently into `limits`. Inversion is preserved.
    pub fn clamp_to(&self, limits: &DateRange) -> Self {
        Self::new(
            self.start.clamp(limits.start, limits.end),
            self.end.clamp(limits.start, limits.end),
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Non-fatal conditions raised while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeNotice {
    /// End date before start date; the selection is empty.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// The range is valid but no daily rows fall inside it.
    EmptySelection,
}

impl fmt::Display for RangeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeNotice::InvalidRange { start, end } => {
                write!(f, "End date {end} is before start date {start}; nothing selected")
            }
            RangeNotice::EmptySelection => write!(f, "No records in the selected range"),
        }
    }
}

/// Both tables restricted to one user range.
#[derive(Debug, Clone, Default)]
pub struct FilteredView {
    pub daily: Table<DailyRecord>,
    pub hourly: Table<HourlyRecord>,
    pub notice: Option<RangeNotice>,
}

/// Restrict both datasets to the inclusive `range`.
pub fn apply_range(datasets: &Datasets, range: &DateRange) -> FilteredView {
    if range.is_inverted() {
        let notice = RangeNotice::InvalidRange {
            start: range.start,
            end: range.end,
        };
        log::warn!("{notice}");
        return FilteredView {
            notice: Some(notice),
            ..FilteredView::default()
        };
    }

    let daily = datasets.daily.between(range);
    let hourly = datasets.hourly.between(range);
    let notice = if daily.is_empty() {
        log::warn!("Range {range} selects no daily rows");
        Some(RangeNotice::EmptySelection)
    } else {
        None
    };

    FilteredView {
        daily,
        hourly,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Season;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn datasets() -> Datasets {
        let season = Season::new(1).unwrap();
        let days = ["2011-01-01", "2011-01-02", "2011-01-03", "2011-01-04"];
        let daily = days
            .iter()
            .enumerate()
            .map(|(i, d)| DailyRecord {
                date: date(d),
                season,
                cnt: 10 * (i as u64 + 1),
                registered: 8 * (i as u64 + 1),
                casual: 2 * (i as u64 + 1),
            })
            .collect();
        let hourly = days
            .iter()
            .flat_map(|d| {
                [0u8, 12].into_iter().map(move |hour| HourlyRecord {
                    date: date(d),
                    hour,
                    season,
                    cnt: 1,
                })
            })
            .collect();
        Datasets::new(daily, hourly)
    }

    #[test]
    fn inclusive_bounds() {
        let ds = datasets();
        let view = apply_range(&ds, &DateRange::new(date("2011-01-02"), date("2011-01-03")));
        let dates: Vec<NaiveDate> = view.daily.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2011-01-02"), date("2011-01-03")]);
        assert_eq!(view.hourly.len(), 4);
        assert!(view.hourly.iter().all(|r| r.date >= date("2011-01-02") && r.date <= date("2011-01-03")));
        assert!(view.notice.is_none());
    }

    #[test]
    fn single_day_range() {
        let ds = datasets();
        let view = apply_range(&ds, &DateRange::single(date("2011-01-04")));
        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.hourly.len(), 2);
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let ds = datasets();
        let view = apply_range(&ds, &DateRange::new(date("2011-01-03"), date("2011-01-01")));
        assert!(view.daily.is_empty());
        assert!(view.hourly.is_empty());
        assert!(matches!(view.notice, Some(RangeNotice::InvalidRange { .. })));
    }

    #[test]
    fn range_outside_data_flags_empty_selection() {
        let ds = datasets();
        let view = apply_range(&ds, &DateRange::single(date("2013-06-01")));
        assert!(view.daily.is_empty());
        assert_eq!(view.notice, Some(RangeNotice::EmptySelection));
    }

    #[test]
    fn clamp_keeps_bounds_inside_limits() {
        let limits = DateRange::new(date("2011-01-01"), date("2011-12-31"));
        let clamped = DateRange::new(date("2010-05-05"), date("2012-02-02")).clamp_to(&limits);
        assert_eq!(clamped, limits);

        let inverted = DateRange::new(date("2011-06-01"), date("2011-02-01")).clamp_to(&limits);
        assert!(inverted.is_inverted());
    }

    #[test]
    fn span_falls_back_for_empty_table() {
        let fallback = DateRange::new(date("2011-01-01"), date("2012-12-31"));
        assert_eq!(DateRange::span_of(&Table::default(), fallback), fallback);
        assert_eq!(
            DateRange::span_of(&datasets().daily, fallback),
            DateRange::new(date("2011-01-01"), date("2011-01-04"))
        );
    }
}
