//! Cycle lifecycle: phase, one-shot panic flag and per-cycle sizing.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    AwaitingEntry,
    Accumulating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleState {
    pub phase: CyclePhase,
    pub panic_used: bool,
    /// 1-based cycle number.
    pub number: usize,
    pub seed: f64,
    pub initial_entry_amount: f64,
    pub started_on: Option<NaiveDate>,
}

impl CycleState {
    pub fn first(seed: f64, entry_ratio: f64) -> Self {
        CycleState {
            phase: CyclePhase::AwaitingEntry,
            panic_used: false,
            number: 1,
            seed,
            initial_entry_amount: seed * entry_ratio,
            started_on: None,
        }
    }

    pub fn is_awaiting_entry(&self) -> bool {
        self.phase == CyclePhase::AwaitingEntry
    }

    pub(crate) fn begin(&mut self, date: NaiveDate) {
        self.phase = CyclePhase::Accumulating;
        self.started_on = Some(date);
    }

    /// Reset for the next cycle, seeded with everything the last one ended with.
    pub(crate) fn rollover(&mut self, new_seed: f64, entry_ratio: f64) {
        *self = CycleState {
            number: self.number + 1,
            ..CycleState::first(new_seed, entry_ratio)
        };
    }
}

/// A cycle that ended in a take-profit sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    pub number: usize,
    pub started_on: Option<NaiveDate>,
    pub ended_on: NaiveDate,
    pub seed: f64,
    pub ending_value: f64,
    pub return_from_avg: f64,
}

impl CycleOutcome {
    pub fn profit(&self) -> f64 {
        self.ending_value - self.seed
    }

    pub fn profit_pct(&self) -> f64 {
        self.profit() / self.seed * 100.0
    }
}
