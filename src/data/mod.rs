/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  day_clean.csv / hour_clean.csv  (.json / .parquet also accepted)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → Datasets (date-sorted tables)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive DateRange → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group-by / sum / sort → Summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod table;
