//! Report generation port trait.

use crate::domain::config::EngineConfig;
use crate::domain::engine::RunResult;
use crate::domain::error::AlphaCycleError;
use crate::domain::summary::RunSummary;
use crate::domain::sweep::SweepOutcome;

/// Port for writing run reports.
pub trait ReportPort {
    fn write(
        &self,
        config: &EngineConfig,
        result: &RunResult,
        summary: &RunSummary,
    ) -> Result<(), AlphaCycleError>;

    /// Default implementation: the sweep is not reported.
    fn write_sweep(&self, _outcomes: &[SweepOutcome]) -> Result<(), AlphaCycleError> {
        Ok(())
    }
}
