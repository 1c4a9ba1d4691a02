use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::table::Table;

// ---------------------------------------------------------------------------
// Season – categorical 1..=4
// ---------------------------------------------------------------------------

/// Calendar season as encoded in the usage dataset (1–4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(u8);

impl Season {
    pub const ALL: [Season; 4] = [Season(1), Season(2), Season(3), Season(4)];

    /// Build a season from its numeric code, rejecting anything outside 1–4.
    pub fn new(code: u8) -> Option<Self> {
        (1..=4).contains(&code).then_some(Season(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Spring",
            2 => "Summer",
            3 => "Fall",
            _ => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = String;

    /// Accepts either the numeric code or the season name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Season::new(code).ok_or_else(|| format!("season code {code} outside 1-4"));
        }
        match s.to_ascii_lowercase().as_str() {
            "spring" => Ok(Season(1)),
            "summer" => Ok(Season(2)),
            "fall" | "autumn" => Ok(Season(3)),
            "winter" => Ok(Season(4)),
            _ => Err(format!("unknown season '{s}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Anything carrying the calendar date a table is sorted and filtered by.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One row per calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: Season,
    /// Total usage; expected to equal `registered + casual`.
    pub cnt: u64,
    pub registered: u64,
    pub casual: u64,
}

/// One row per (date, hour) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    /// Hour of day, 0–23.
    pub hour: u8,
    pub season: Season,
    pub cnt: u64,
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

// ---------------------------------------------------------------------------
// Datasets – the two base tables, loaded once
// ---------------------------------------------------------------------------

/// The daily and hourly usage tables, each sorted ascending by date.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub daily: Table<DailyRecord>,
    pub hourly: Table<HourlyRecord>,
}

impl Datasets {
    pub fn new(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        Self {
            daily: Table::from_rows(daily),
            hourly: Table::from_rows(hourly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_parses_codes_and_names() {
        assert_eq!("1".parse::<Season>().unwrap().code(), 1);
        assert_eq!(" 4 ".parse::<Season>().unwrap().code(), 4);
        assert_eq!("Summer".parse::<Season>().unwrap().code(), 2);
        assert_eq!("FALL".parse::<Season>().unwrap().code(), 3);
        assert_eq!("winter".parse::<Season>().unwrap().label(), "Winter");
    }

    #[test]
    fn season_rejects_out_of_range() {
        assert!("0".parse::<Season>().is_err());
        assert!("5".parse::<Season>().is_err());
        assert!("monsoon".parse::<Season>().is_err());
        assert!(Season::new(7).is_none());
    }
}
