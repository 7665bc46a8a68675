//! Engine configuration, immutable for the duration of a run.
//!
//! Construction validates every field and fails fast; there is no way to
//! build an `EngineConfig` that violates the threshold ordering.

use super::error::AlphaCycleError;

pub const ENGINE_SECTION: &str = "engine";

pub const DEFAULT_ENTRY_RATIO: f64 = 0.20;
pub const DEFAULT_BUY_TRIGGER: f64 = -20.0;
pub const DEFAULT_SELL_TRIGGER: f64 = 20.0;
pub const DEFAULT_PANIC_TRIGGER: f64 = -50.0;

/// Fraction of the initial-entry amount committed by the one-shot panic buy.
pub const PANIC_BUY_FRACTION: f64 = 0.5;

/// Divisor of the averaging-buy formula: `entry_amount * |loss%| / 1000`.
pub const AVERAGING_DIVISOR: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    seed_capital: f64,
    entry_ratio: f64,
    buy_trigger: f64,
    sell_trigger: f64,
    panic_trigger: f64,
    exchange_rate: f64,
}

impl EngineConfig {
    pub fn new(
        seed_capital: f64,
        entry_ratio: f64,
        buy_trigger: f64,
        sell_trigger: f64,
        panic_trigger: f64,
        exchange_rate: f64,
    ) -> Result<Self, AlphaCycleError> {
        validate_seed_capital(seed_capital)?;
        validate_entry_ratio(entry_ratio)?;
        validate_exchange_rate(exchange_rate)?;
        validate_triggers(buy_trigger, sell_trigger, panic_trigger)?;
        Ok(EngineConfig {
            seed_capital,
            entry_ratio,
            buy_trigger,
            sell_trigger,
            panic_trigger,
            exchange_rate,
        })
    }

    /// Config with the stock thresholds (-20 / +20 / -50).
    pub fn with_default_triggers(
        seed_capital: f64,
        entry_ratio: f64,
        exchange_rate: f64,
    ) -> Result<Self, AlphaCycleError> {
        Self::new(
            seed_capital,
            entry_ratio,
            DEFAULT_BUY_TRIGGER,
            DEFAULT_SELL_TRIGGER,
            DEFAULT_PANIC_TRIGGER,
            exchange_rate,
        )
    }

    /// Copy of this config with different thresholds, validated again.
    pub fn with_triggers(
        &self,
        buy_trigger: f64,
        sell_trigger: f64,
        panic_trigger: f64,
    ) -> Result<Self, AlphaCycleError> {
        Self::new(
            self.seed_capital,
            self.entry_ratio,
            buy_trigger,
            sell_trigger,
            panic_trigger,
            self.exchange_rate,
        )
    }

    pub fn seed_capital(&self) -> f64 {
        self.seed_capital
    }

    pub fn entry_ratio(&self) -> f64 {
        self.entry_ratio
    }

    pub fn buy_trigger(&self) -> f64 {
        self.buy_trigger
    }

    pub fn sell_trigger(&self) -> f64 {
        self.sell_trigger
    }

    pub fn panic_trigger(&self) -> f64 {
        self.panic_trigger
    }

    pub fn exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    /// Amount committed by a cycle's first entry.
    pub fn initial_entry_amount(&self, seed: f64) -> f64 {
        seed * self.entry_ratio
    }

    /// Averaging-buy amount for a given loss, or 0 above the buy trigger.
    pub fn averaging_amount(&self, initial_entry_amount: f64, loss_from_entry: f64) -> f64 {
        if loss_from_entry > self.buy_trigger {
            return 0.0;
        }
        initial_entry_amount * loss_from_entry.abs() / AVERAGING_DIVISOR
    }

    pub fn panic_amount(&self, initial_entry_amount: f64) -> f64 {
        initial_entry_amount * PANIC_BUY_FRACTION
    }
}

fn validate_seed_capital(value: f64) -> Result<(), AlphaCycleError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "seed_capital",
            "seed_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_entry_ratio(value: f64) -> Result<(), AlphaCycleError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "entry_ratio",
            "entry_ratio must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_exchange_rate(value: f64) -> Result<(), AlphaCycleError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "exchange_rate",
            "exchange_rate must be positive",
        ));
    }
    Ok(())
}

fn validate_triggers(buy: f64, sell: f64, panic: f64) -> Result<(), AlphaCycleError> {
    if !buy.is_finite() || buy >= 0.0 {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "buy_trigger",
            "buy_trigger must be a negative percentage",
        ));
    }
    if !sell.is_finite() || sell <= 0.0 {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "sell_trigger",
            "sell_trigger must be a positive percentage",
        ));
    }
    if !panic.is_finite() || panic >= buy {
        return Err(AlphaCycleError::invalid(
            ENGINE_SECTION,
            "panic_trigger",
            format!("panic_trigger must be below buy_trigger ({buy})"),
        ));
    }
    Ok(())
}
