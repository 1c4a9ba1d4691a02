use std::fmt;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

use super::model::{DailyRecord, Datasets, HourlyRecord, Season};
use super::table::Table;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data file not found: {0}")]
    Missing(PathBuf),
    #[error("unsupported file extension: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("parsing JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("reading parquet {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
    #[error("reading record batch from {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
    #[error("{path}, row {row}: {message}")]
    Malformed {
        path: PathBuf,
        row: usize,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables. Either failing aborts the whole load.
pub fn load_datasets(daily_path: &Path, hourly_path: &Path) -> Result<Datasets, LoadError> {
    let daily = load_daily(daily_path)?;
    let hourly = load_hourly(hourly_path)?;

    match daily.date_span() {
        Some((first, last)) => log::info!(
            "Loaded {} daily rows ({first} to {last}) and {} hourly rows",
            daily.len(),
            hourly.len()
        ),
        None => log::warn!("Daily table {} is empty", daily_path.display()),
    }

    Ok(Datasets { daily, hourly })
}

/// Load the daily table from `.csv`, `.json` or `.parquet`.
pub fn load_daily(path: &Path) -> Result<Table<DailyRecord>, LoadError> {
    let raw: Vec<RawDaily> = read_rows(path)?;
    let rows = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_record().map_err(|message| malformed(path, i, message)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::from_rows(rows))
}

/// Load the hourly table from `.csv`, `.json` or `.parquet`.
pub fn load_hourly(path: &Path) -> Result<Table<HourlyRecord>, LoadError> {
    let raw: Vec<RawHourly> = read_rows(path)?;
    let rows = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_record().map_err(|message| malformed(path, i, message)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::from_rows(rows))
}

fn malformed(path: &Path, index: usize, message: String) -> LoadError {
    LoadError::Malformed {
        path: path.to_path_buf(),
        row: index + 1,
        message,
    }
}

/// Dispatch by extension.
fn read_rows<T: RawRow>(path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

// ---------------------------------------------------------------------------
// Raw rows – as stored on disk, before validation
// ---------------------------------------------------------------------------

/// Offending row within a record batch, plus the reason.
type BatchError = (usize, String);

trait RawRow: DeserializeOwned + Sized {
    /// Extract every row of one Arrow record batch.
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, BatchError>;
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    dteday: String,
    season: RawSeason,
    cnt: i64,
    registered: i64,
    casual: i64,
}

#[derive(Debug, Deserialize)]
struct RawHourly {
    dteday: String,
    #[serde(alias = "hr")]
    hours: i64,
    season: RawSeason,
    cnt: i64,
}

impl RawDaily {
    fn into_record(self) -> Result<DailyRecord, String> {
        Ok(DailyRecord {
            date: parse_date(&self.dteday)?,
            season: self.season.0.parse()?,
            cnt: count("cnt", self.cnt)?,
            registered: count("registered", self.registered)?,
            casual: count("casual", self.casual)?,
        })
    }
}

impl RawHourly {
    fn into_record(self) -> Result<HourlyRecord, String> {
        let hour = u8::try_from(self.hours)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| format!("hour {} outside 0-23", self.hours))?;
        Ok(HourlyRecord {
            date: parse_date(&self.dteday)?,
            hour,
            season: self.season.0.parse::<Season>()?,
            cnt: count("cnt", self.cnt)?,
        })
    }
}

fn count(column: &str, value: i64) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("'{column}' is negative ({value})"))
}

/// `YYYY-MM-DD`, optionally followed by a time part which is dropped.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    let day = match s.char_indices().nth(10) {
        Some((idx, ' ' | 'T')) => &s[..idx],
        _ => s,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| format!("bad date '{s}': {e}"))
}

/// Season cell kept as text; accepts numeric or string input.
#[derive(Debug)]
struct RawSeason(String);

impl<'de> Deserialize<'de> for RawSeason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeasonVisitor;

        impl Visitor<'_> for SeasonVisitor {
            type Value = RawSeason;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a season code 1-4 or a season name")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawSeason, E> {
                Ok(RawSeason(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawSeason, E> {
                Ok(RawSeason(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawSeason, E> {
                Ok(RawSeason(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawSeason, E> {
                Ok(RawSeason(v.to_string()))
            }
        }

        deserializer.deserialize_any(SeasonVisitor)
    }
}

// ---------------------------------------------------------------------------
// CSV / JSON loaders
// ---------------------------------------------------------------------------

/// Header row with column names; unknown columns are ignored.
fn read_csv<T: RawRow>(path: &Path) -> Result<Vec<T>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Records-oriented array, as written by `df.to_json(orient='records')`.
fn read_json<T: RawRow>(path: &Path) -> Result<Vec<T>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by Pandas (`df.to_parquet()`) and Polars.
/// `dteday` may be a string or a `Date32` column.
fn read_parquet<T: RawRow>(path: &Path) -> Result<Vec<T>, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let start = rows.len();
        let mut parsed = T::from_batch(&batch)
            .map_err(|(row, message)| malformed(path, start + row, message))?;
        rows.append(&mut parsed);
    }
    Ok(rows)
}

impl RawRow for RawDaily {
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, BatchError> {
        let at_start = |message| (0, message);
        let dates = text_column(batch, &["dteday"]).map_err(at_start)?;
        let seasons = season_column(batch).map_err(at_start)?;
        let cnt = int_column(batch, &["cnt"]).map_err(at_start)?;
        let registered = int_column(batch, &["registered"]).map_err(at_start)?;
        let casual = int_column(batch, &["casual"]).map_err(at_start)?;

        (0..batch.num_rows())
            .map(|i| {
                Ok(RawDaily {
                    dteday: cell(&dates, i, "dteday")?,
                    season: RawSeason(cell(&seasons, i, "season")?),
                    cnt: cell(&cnt, i, "cnt")?,
                    registered: cell(&registered, i, "registered")?,
                    casual: cell(&casual, i, "casual")?,
                })
            })
            .collect()
    }
}

impl RawRow for RawHourly {
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, BatchError> {
        let at_start = |message| (0, message);
        let dates = text_column(batch, &["dteday"]).map_err(at_start)?;
        let hours = int_column(batch, &["hours", "hr"]).map_err(at_start)?;
        let seasons = season_column(batch).map_err(at_start)?;
        let cnt = int_column(batch, &["cnt"]).map_err(at_start)?;

        (0..batch.num_rows())
            .map(|i| {
                Ok(RawHourly {
                    dteday: cell(&dates, i, "dteday")?,
                    hours: cell(&hours, i, "hours")?,
                    season: RawSeason(cell(&seasons, i, "season")?),
                    cnt: cell(&cnt, i, "cnt")?,
                })
            })
            .collect()
    }
}

// -- Arrow helpers --

/// First column matching any of `names`.
fn find_column<'a>(batch: &'a RecordBatch, names: &[&str]) -> Result<&'a ArrayRef, String> {
    names
        .iter()
        .find_map(|n| batch.column_by_name(n))
        .ok_or_else(|| format!("missing column '{}'", names[0]))
}

fn text_column(batch: &RecordBatch, names: &[&str]) -> Result<Vec<Option<String>>, String> {
    let col = find_column(batch, names)?;
    let utf8 = cast(col, &DataType::Utf8).map_err(|e| format!("column '{}': {e}", names[0]))?;
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Numeric season codes are rendered the way the text readers see them,
/// so a `Float64` code of `1.0` becomes `"1"`.
fn season_column(batch: &RecordBatch) -> Result<Vec<Option<String>>, String> {
    let col = find_column(batch, &["season"])?;
    if !col.data_type().is_numeric() {
        return text_column(batch, &["season"]);
    }
    let floats = cast(col, &DataType::Float64).map_err(|e| format!("column 'season': {e}"))?;
    let floats = floats.as_primitive::<Float64Type>();
    Ok((0..floats.len())
        .map(|i| (!floats.is_null(i)).then(|| floats.value(i).to_string()))
        .collect())
}

fn int_column(batch: &RecordBatch, names: &[&str]) -> Result<Vec<Option<i64>>, String> {
    let col = find_column(batch, names)?;
    let ints = cast(col, &DataType::Int64).map_err(|e| format!("column '{}': {e}", names[0]))?;
    let ints = ints.as_primitive::<Int64Type>();
    Ok((0..ints.len())
        .map(|i| (!ints.is_null(i)).then(|| ints.value(i)))
        .collect())
}

fn cell<V: Clone>(values: &[Option<V>], row: usize, column: &str) -> Result<V, BatchError> {
    values
        .get(row)
        .cloned()
        .flatten()
        .ok_or_else(|| (row, format!("null '{column}'")))
}
