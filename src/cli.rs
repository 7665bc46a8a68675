//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::config::EngineConfig;
use crate::domain::config_validation::{
    load_data_settings, load_engine_config, load_report_settings, load_sweep_settings,
    validate_config, DataSettings, ReportSettings, SweepSettings, DATA_SECTION,
};
use crate::domain::engine;
use crate::domain::error::AlphaCycleError;
use crate::domain::price::PriceSeries;
use crate::domain::summary::RunSummary;
use crate::domain::sweep::{self, grid_configs, preset_configs};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "alphacycle", about = "Alpha Cycle dip-averaging backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overriding [data] prices
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Ledger CSV, overriding [report] ledger_path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare trigger presets or a trigger grid
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Run configurations one after another
        #[arg(long)]
        sequential: bool,
        /// Comparison table CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            prices,
            output,
        } => run_backtest(&config, prices.as_ref(), output.as_ref()),
        Command::Sweep {
            config,
            prices,
            sequential,
            output,
        } => run_sweep(&config, prices.as_ref(), sequential, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AlphaCycleError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Price file from the command line, else from `[data] prices`.
pub fn resolve_prices_path(
    prices_override: Option<&PathBuf>,
    data: &DataSettings,
) -> Result<PathBuf, AlphaCycleError> {
    prices_override
        .cloned()
        .or_else(|| data.prices.clone())
        .ok_or_else(|| AlphaCycleError::missing(DATA_SECTION, "prices"))
}

/// Fetch prices and validate ordering before anything runs.
pub fn load_series(
    data_port: &dyn DataPort,
    data: &DataSettings,
) -> Result<PriceSeries, AlphaCycleError> {
    let points = data_port.fetch_prices(data.start_date, data.end_date)?;
    let series = PriceSeries::new(points)?;
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => tracing::info!(
            observations = series.len(),
            start = %first.date,
            end = %last.date,
            "loaded price series"
        ),
        _ => tracing::warn!("price series is empty; nothing will be traded"),
    }
    Ok(series)
}

fn run_backtest(
    config_path: &PathBuf,
    prices_override: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build engine config and section settings
    let settings = load_engine_config(&adapter).and_then(|engine_config| {
        Ok((
            engine_config,
            load_data_settings(&adapter)?,
            load_report_settings(&adapter)?,
        ))
    });
    let (engine_config, data, report) = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Resolve the price source
    let prices_path = match resolve_prices_path(prices_override, &data) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(prices_path);

    run_backtest_pipeline(&data_port, &engine_config, &data, &report, output_path)
}

/// Stages 4-7: load the series, run, report. Shared with tests through a
/// mock data port.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    engine_config: &EngineConfig,
    data: &DataSettings,
    report: &ReportSettings,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 4: Load and validate prices
    let series = match load_series(data_port, data) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Run the engine
    let result = engine::run(engine_config, &series);
    let summary = RunSummary::compute(engine_config, &result);
    tracing::info!(
        trades = result.ledger.len(),
        cycles = summary.cycles_completed,
        total_return = summary.total_return,
        "backtest finished"
    );

    // Stage 6: Console report
    let text = TextReportAdapter::new(report.recent_trades);
    if let Err(e) = text.write(engine_config, &result, &summary) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 7: Ledger export
    let ledger_path = output_path.cloned().or_else(|| report.ledger_path.clone());
    if let Some(path) = ledger_path {
        if let Err(e) = CsvLedgerAdapter::new(path).write(engine_config, &result, &summary) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    ExitCode::SUCCESS
}

fn run_sweep(
    config_path: &PathBuf,
    prices_override: Option<&PathBuf>,
    sequential: bool,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let settings = load_engine_config(&adapter).and_then(|engine_config| {
        Ok((
            engine_config,
            load_data_settings(&adapter)?,
            load_sweep_settings(&adapter)?,
        ))
    });
    let (base, data, mut sweep_settings) = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if sequential {
        sweep_settings.parallel = false;
    }

    let prices_path = match resolve_prices_path(prices_override, &data) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(prices_path);

    run_sweep_pipeline(&data_port, &base, &data, &sweep_settings, output_path)
}

pub fn run_sweep_pipeline(
    data_port: &dyn DataPort,
    base: &EngineConfig,
    data: &DataSettings,
    settings: &SweepSettings,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let series = match load_series(data_port, data) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut configs = match preset_configs(base, &settings.presets) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(grid) = &settings.grid {
        configs.extend(grid_configs(base, grid));
    }
    if configs.is_empty() {
        eprintln!("error: no valid trigger combinations to sweep");
        return ExitCode::from(2);
    }

    let outcomes = sweep::sweep(&series, &configs, settings.parallel);
    if let Some(top) = sweep::best(&outcomes) {
        tracing::info!(
            label = %top.label,
            total_return = top.summary.total_return,
            "best configuration"
        );
    }

    let text = TextReportAdapter::new(0);
    if let Err(e) = text.write_sweep(&outcomes) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Some(path) = output_path {
        if let Err(e) = CsvLedgerAdapter::new(path.clone()).write_sweep(&outcomes) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    tracing::info!(path = %config_path.display(), "validating config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backtest_arguments() {
        let cli = Cli::try_parse_from([
            "alphacycle",
            "backtest",
            "--config",
            "a.ini",
            "--prices",
            "p.csv",
            "-o",
            "ledger.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                config,
                prices,
                output,
            } => {
                assert_eq!(config, PathBuf::from("a.ini"));
                assert_eq!(prices, Some(PathBuf::from("p.csv")));
                assert_eq!(output, Some(PathBuf::from("ledger.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_sweep_flags() {
        let cli = Cli::try_parse_from(["alphacycle", "sweep", "-c", "a.ini", "--sequential"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Sweep {
                sequential: true,
                ..
            }
        ));
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["alphacycle", "validate"]).is_err());
    }

    #[test]
    fn prices_override_wins() {
        let data = DataSettings {
            prices: Some(PathBuf::from("from_ini.csv")),
            ..DataSettings::default()
        };
        let cli_path = PathBuf::from("from_cli.csv");
        assert_eq!(resolve_prices_path(Some(&cli_path), &data).unwrap(), cli_path);
        assert_eq!(
            resolve_prices_path(None, &data).unwrap(),
            PathBuf::from("from_ini.csv")
        );
        assert!(matches!(
            resolve_prices_path(None, &DataSettings::default()),
            Err(AlphaCycleError::ConfigMissing { .. })
        ));
    }
}
