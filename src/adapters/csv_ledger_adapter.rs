//! CSV export of the trade ledger, one row per execution.

use std::path::PathBuf;

use crate::domain::config::EngineConfig;
use crate::domain::engine::RunResult;
use crate::domain::error::AlphaCycleError;
use crate::domain::summary::RunSummary;
use crate::domain::sweep::SweepOutcome;
use crate::ports::report_port::ReportPort;

pub struct CsvLedgerAdapter {
    path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn report_err(&self, e: impl std::fmt::Display) -> AlphaCycleError {
        AlphaCycleError::Report {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        }
    }
}

impl ReportPort for CsvLedgerAdapter {
    fn write(
        &self,
        _config: &EngineConfig,
        result: &RunResult,
        _summary: &RunSummary,
    ) -> Result<(), AlphaCycleError> {
        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| self.report_err(e))?;
        for record in &result.ledger {
            wtr.serialize(record).map_err(|e| self.report_err(e))?;
        }
        wtr.flush().map_err(|e| self.report_err(e))?;
        tracing::info!(path = %self.path.display(), rows = result.ledger.len(), "ledger written");
        Ok(())
    }

    fn write_sweep(&self, outcomes: &[SweepOutcome]) -> Result<(), AlphaCycleError> {
        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| self.report_err(e))?;
        wtr.write_record([
            "label",
            "buy_trigger",
            "sell_trigger",
            "panic_trigger",
            "cycles",
            "trades",
            "final_value",
            "total_return",
        ])
        .map_err(|e| self.report_err(e))?;
        for o in outcomes {
            wtr.write_record([
                o.label.clone(),
                o.config.buy_trigger().to_string(),
                o.config.sell_trigger().to_string(),
                o.config.panic_trigger().to_string(),
                o.summary.cycles_completed.to_string(),
                o.summary.trade_count().to_string(),
                format!("{:.2}", o.summary.final_value),
                format!("{:.4}", o.summary.total_return),
            ])
            .map_err(|e| self.report_err(e))?;
        }
        wtr.flush().map_err(|e| self.report_err(e))?;
        Ok(())
    }
}
