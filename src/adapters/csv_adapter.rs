//! CSV file price adapter.
//!
//! Reads a daily price file with a header row. Only the `Date` and `Close`
//! columns are used (matched case-insensitively); any other columns, such as
//! the rest of an OHLCV export, are ignored.

use crate::domain::error::AlphaCycleError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, AlphaCycleError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| AlphaCycleError::Data {
                reason: format!("missing {name} column"),
            })
    }
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_date(raw: &str) -> Result<NaiveDate, AlphaCycleError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|e| match raw.get(..10) {
            Some(prefix) if raw.len() > 10 => NaiveDate::parse_from_str(prefix, "%Y-%m-%d"),
            _ => Err(e),
        })
        .map_err(|e| AlphaCycleError::Data {
            reason: format!("invalid date {raw:?}: {e}"),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AlphaCycleError> {
        let content = fs::read_to_string(&self.path).map_err(|e| AlphaCycleError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AlphaCycleError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_col = Self::column(&headers, "date")?;
        let close_col = Self::column(&headers, "close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| AlphaCycleError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = parse_date(record.get(date_col).unwrap_or_default())?;
            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            let raw_close = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = raw_close.parse().map_err(|e| AlphaCycleError::Data {
                reason: format!("invalid close value {raw_close:?} on {date}: {e}"),
            })?;

            points.push(PricePoint { date, close });
        }

        tracing::debug!(path = %self.path.display(), rows = points.len(), "loaded prices");
        Ok(points)
    }
}
