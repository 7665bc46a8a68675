#![allow(dead_code)]

use alphacycle::domain::config::EngineConfig;
use alphacycle::domain::config_validation::{DataSettings, ReportSettings};
use alphacycle::domain::error::AlphaCycleError;
pub use alphacycle::domain::price::{PricePoint, PriceSeries};
use alphacycle::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::cell::Cell;

/// In-memory price source. Applies the date filter the way the CSV adapter
/// does and never reorders rows.
pub struct MockDataPort {
    pub points: Vec<PricePoint>,
    pub error: Option<String>,
    pub fetches: Cell<usize>,
}

impl MockDataPort {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self {
            points,
            error: None,
            fetches: Cell::new(0),
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            points: Vec::new(),
            error: Some(reason.to_string()),
            fetches: Cell::new(0),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AlphaCycleError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = &self.error {
            return Err(AlphaCycleError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .points
            .iter()
            .filter(|p| start_date.is_none_or(|s| p.date >= s))
            .filter(|p| end_date.is_none_or(|e| p.date <= e))
            .copied()
            .collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily points starting 2024-01-01.
pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn make_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(make_points(closes)).unwrap()
}

/// 100,000,000 seed, 20% entry, stock triggers, no currency conversion.
pub fn reference_config() -> EngineConfig {
    EngineConfig::with_default_triggers(100_000_000.0, 0.2, 1.0).unwrap()
}

pub fn small_config() -> EngineConfig {
    EngineConfig::with_default_triggers(1000.0, 0.2, 1.0).unwrap()
}

pub fn report_settings() -> ReportSettings {
    ReportSettings {
        ledger_path: None,
        recent_trades: 5,
    }
}

pub fn no_date_filter() -> DataSettings {
    DataSettings::default()
}
