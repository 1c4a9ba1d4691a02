use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::filter::DateRange;
use super::model::Dated;

// ---------------------------------------------------------------------------
// GroupSum – one output row of a group-by/sum
// ---------------------------------------------------------------------------

/// Sum of a value column for one distinct key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSum<K> {
    pub key: K,
    pub total: u64,
}

/// Stable sort by `total`, largest first. Equal totals keep their incoming
/// order, which is ascending key order when fed straight from [`Table::sum_by`].
pub fn sort_by_total_desc<K>(groups: &mut [GroupSum<K>]) {
    groups.sort_by(|a, b| b.total.cmp(&a.total));
}

// ---------------------------------------------------------------------------
// Table – immutable, date-sorted rows
// ---------------------------------------------------------------------------

/// A typed, row-oriented table kept in ascending date order.
///
/// Every operation returns a new value; the table itself is never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Dated + Clone> Table<R> {
    /// Take ownership of `rows`, stable-sorting them by date.
    pub fn from_rows(mut rows: Vec<R>) -> Self {
        rows.sort_by_key(|r| r.date());
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last date, or `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date();
        let last = self.rows.last()?.date();
        Some((first, last))
    }

    /// Rows matching `pred`, order preserved.
    pub fn filter(&self, pred: impl Fn(&R) -> bool) -> Table<R> {
        Table {
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    /// Rows whose date falls inside the inclusive `range`.
    pub fn between(&self, range: &DateRange) -> Table<R> {
        self.filter(|r| range.contains(r.date()))
    }

    /// Sum of `value` over every row.
    pub fn sum(&self, value: impl Fn(&R) -> u64) -> u64 {
        self.rows.iter().map(value).sum()
    }

    /// Group rows by `key` and sum `value` per group.
    ///
    /// One output row per distinct key, in ascending key order.
    pub fn sum_by<K: Ord>(
        &self,
        key: impl Fn(&R) -> K,
        value: impl Fn(&R) -> u64,
    ) -> Vec<GroupSum<K>> {
        let mut groups: BTreeMap<K, u64> = BTreeMap::new();
        for row in &self.rows {
            *groups.entry(key(row)).or_default() += value(row);
        }
        groups
            .into_iter()
            .map(|(key, total)| GroupSum { key, total })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{HourlyRecord, Season};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hourly(d: &str, hour: u8, cnt: u64) -> HourlyRecord {
        HourlyRecord {
            date: date(d),
            hour,
            season: Season::new(1).unwrap(),
            cnt,
        }
    }

    #[test]
    fn from_rows_sorts_by_date_and_keeps_ties_stable() {
        let table = Table::from_rows(vec![
            hourly("2011-01-02", 5, 1),
            hourly("2011-01-01", 9, 2),
            hourly("2011-01-01", 3, 3),
        ]);
        let hours: Vec<u8> = table.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![9, 3, 5]);
        assert_eq!(
            table.date_span(),
            Some((date("2011-01-01"), date("2011-01-02")))
        );
    }

    #[test]
    fn sum_by_groups_in_key_order() {
        let table = Table::from_rows(vec![
            hourly("2011-01-01", 8, 10),
            hourly("2011-01-01", 2, 4),
            hourly("2011-01-02", 8, 5),
        ]);
        let groups = table.sum_by(|r| r.hour, |r| r.cnt);
        assert_eq!(
            groups,
            vec![
                GroupSum { key: 2, total: 4 },
                GroupSum { key: 8, total: 15 },
            ]
        );
        assert_eq!(table.sum(|r| r.cnt), 19);
    }

    #[test]
    fn descending_sort_keeps_key_order_on_ties() {
        let mut groups = vec![
            GroupSum { key: 1, total: 5 },
            GroupSum { key: 2, total: 9 },
            GroupSum { key: 3, total: 5 },
        ];
        sort_by_total_desc(&mut groups);
        let keys: Vec<i32> = groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, vec![2, 1, 3]);
    }

    #[test]
    fn empty_table_operations() {
        let table: Table<HourlyRecord> = Table::default();
        assert!(table.date_span().is_none());
        assert!(table.sum_by(|r| r.hour, |r| r.cnt).is_empty());
        assert_eq!(table.sum(|r| r.cnt), 0);
    }
}
