//! Configuration loading and validation.
//!
//! Every section is read through a [`ConfigPort`] and validated before a run
//! starts. Values that are present but malformed are errors; only absent
//! optional keys fall back to defaults.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::config::{
    EngineConfig, DEFAULT_BUY_TRIGGER, DEFAULT_PANIC_TRIGGER, DEFAULT_SELL_TRIGGER,
    ENGINE_SECTION,
};
use crate::domain::error::AlphaCycleError;
use crate::domain::sweep::{find_preset, ParamGrid, Preset, PRESETS};
use crate::ports::config_port::ConfigPort;

pub const DATA_SECTION: &str = "data";
pub const REPORT_SECTION: &str = "report";
pub const SWEEP_SECTION: &str = "sweep";

pub const DEFAULT_RECENT_TRADES: usize = 10;

/// `[data]` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSettings {
    pub prices: Option<PathBuf>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub ledger_path: Option<PathBuf>,
    pub recent_trades: usize,
}

/// `[sweep]` section. With neither presets nor trigger lists configured, all
/// presets are swept.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub presets: Vec<Preset>,
    pub grid: Option<ParamGrid>,
    pub parallel: bool,
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), AlphaCycleError> {
    load_engine_config(config)?;
    load_data_settings(config)?;
    load_report_settings(config)?;
    load_sweep_settings(config)?;
    Ok(())
}

pub fn load_engine_config(config: &dyn ConfigPort) -> Result<EngineConfig, AlphaCycleError> {
    let seed_capital = required_double(config, ENGINE_SECTION, "seed_capital")?;
    let entry_ratio = required_double(config, ENGINE_SECTION, "entry_ratio")?;
    let exchange_rate = required_double(config, ENGINE_SECTION, "exchange_rate")?;
    let buy_trigger = optional_double(config, ENGINE_SECTION, "buy_trigger")?
        .unwrap_or(DEFAULT_BUY_TRIGGER);
    let sell_trigger = optional_double(config, ENGINE_SECTION, "sell_trigger")?
        .unwrap_or(DEFAULT_SELL_TRIGGER);
    let panic_trigger = optional_double(config, ENGINE_SECTION, "panic_trigger")?
        .unwrap_or(DEFAULT_PANIC_TRIGGER);

    EngineConfig::new(
        seed_capital,
        entry_ratio,
        buy_trigger,
        sell_trigger,
        panic_trigger,
        exchange_rate,
    )
}

pub fn load_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, AlphaCycleError> {
    let start_date = optional_date(config, DATA_SECTION, "start_date")?;
    let end_date = optional_date(config, DATA_SECTION, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(AlphaCycleError::invalid(
                DATA_SECTION,
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }

    Ok(DataSettings {
        prices: config.get_string(DATA_SECTION, "prices").map(PathBuf::from),
        start_date,
        end_date,
    })
}

pub fn load_report_settings(config: &dyn ConfigPort) -> Result<ReportSettings, AlphaCycleError> {
    let recent_trades = match config
        .get_int(REPORT_SECTION, "recent_trades")
        .map_err(|reason| AlphaCycleError::invalid(REPORT_SECTION, "recent_trades", reason))?
    {
        Some(n) => usize::try_from(n).map_err(|_| {
            AlphaCycleError::invalid(
                REPORT_SECTION,
                "recent_trades",
                "recent_trades must be non-negative",
            )
        })?,
        None => DEFAULT_RECENT_TRADES,
    };

    Ok(ReportSettings {
        ledger_path: config
            .get_string(REPORT_SECTION, "ledger_path")
            .map(PathBuf::from),
        recent_trades,
    })
}

/// Trigger lists that are absent fall back to the single value of `[engine]`
/// (or its default), so a grid can vary one trigger at a time.
pub fn load_sweep_settings(config: &dyn ConfigPort) -> Result<SweepSettings, AlphaCycleError> {
    let presets = match config.get_string(SWEEP_SECTION, "presets") {
        Some(raw) => parse_presets(&raw)?,
        None => Vec::new(),
    };

    let buy = optional_list(config, SWEEP_SECTION, "buy_triggers")?;
    let sell = optional_list(config, SWEEP_SECTION, "sell_triggers")?;
    let panic = optional_list(config, SWEEP_SECTION, "panic_triggers")?;

    let grid = if buy.is_none() && sell.is_none() && panic.is_none() {
        None
    } else {
        let single = |key: &str, default: f64| -> Result<Vec<f64>, AlphaCycleError> {
            Ok(vec![optional_double(config, ENGINE_SECTION, key)?.unwrap_or(default)])
        };
        Some(ParamGrid {
            buy_triggers: buy.map_or_else(|| single("buy_trigger", DEFAULT_BUY_TRIGGER), Ok)?,
            sell_triggers: sell.map_or_else(|| single("sell_trigger", DEFAULT_SELL_TRIGGER), Ok)?,
            panic_triggers: panic
                .map_or_else(|| single("panic_trigger", DEFAULT_PANIC_TRIGGER), Ok)?,
        })
    };

    let presets = if presets.is_empty() && grid.is_none() {
        PRESETS.to_vec()
    } else {
        presets
    };

    Ok(SweepSettings {
        presets,
        grid,
        parallel: config.get_bool(SWEEP_SECTION, "parallel", true),
    })
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(section: &str, key: &str, value: &str) -> Result<NaiveDate, AlphaCycleError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AlphaCycleError::invalid(section, key, "invalid date format (expected YYYY-MM-DD)")
    })
}

fn parse_presets(raw: &str) -> Result<Vec<Preset>, AlphaCycleError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            find_preset(name).ok_or_else(|| {
                AlphaCycleError::invalid(
                    SWEEP_SECTION,
                    "presets",
                    format!("unknown preset {name:?}"),
                )
            })
        })
        .collect()
}

fn required_double(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, AlphaCycleError> {
    optional_double(config, section, key)?.ok_or_else(|| AlphaCycleError::missing(section, key))
}

fn optional_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, AlphaCycleError> {
    config
        .get_double(section, key)
        .map_err(|reason| AlphaCycleError::invalid(section, key, reason))
}

fn optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, AlphaCycleError> {
    config
        .get_string(section, key)
        .map(|raw| parse_date(section, key, &raw))
        .transpose()
}

fn optional_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<f64>>, AlphaCycleError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>().map_err(|_| {
                AlphaCycleError::invalid(section, key, format!("expected a number, got {v:?}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(AlphaCycleError::invalid(section, key, "list is empty"));
    }
    Ok(Some(values))
}
