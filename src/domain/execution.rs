//! Buy/sell execution against a position.
//!
//! Buys convert a capital-currency amount into asset units through the fixed
//! exchange rate, fold the new shares into the running average, debit cash
//! and append a record to the ledger. There are no fees or slippage.

use chrono::NaiveDate;

use super::config::EngineConfig;
use super::ledger::{TradeAction, TradeLedger, TradeRecord};
use super::position::Position;

/// Why a triggered action did not execute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    NonPositiveAmount { amount: f64 },
    InsufficientCash { required: f64, available: f64 },
    PanicAlreadyUsed,
}

/// Result of an execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Executed(TradeRecord),
    Skipped(SkipReason),
}

impl ExecutionOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, ExecutionOutcome::Executed(_))
    }

    pub fn record(&self) -> Option<&TradeRecord> {
        match self {
            ExecutionOutcome::Executed(record) => Some(record),
            ExecutionOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            ExecutionOutcome::Executed(_) => None,
            ExecutionOutcome::Skipped(reason) => Some(*reason),
        }
    }
}

/// A buy the engine wants to place.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOrder {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub amount: f64,
    pub loss_from_entry: f64,
    pub note: String,
}

/// Execute a buy, or skip it when the amount is not positive or exceeds cash.
pub fn execute_buy(
    position: &mut Position,
    ledger: &mut TradeLedger,
    config: &EngineConfig,
    order: BuyOrder,
) -> ExecutionOutcome {
    if order.amount <= 0.0 {
        return ExecutionOutcome::Skipped(SkipReason::NonPositiveAmount {
            amount: order.amount,
        });
    }
    if order.amount > position.cash {
        return ExecutionOutcome::Skipped(SkipReason::InsufficientCash {
            required: order.amount,
            available: position.cash,
        });
    }

    let shares = order.amount / config.exchange_rate() / order.price;
    position.add_shares(shares, order.price);
    position.cash -= order.amount;

    let record = TradeRecord {
        date: order.date,
        action: order.action,
        price: order.price,
        shares,
        amount: order.amount,
        total_shares: position.shares,
        avg_price: position.avg_price,
        loss_from_entry: order.loss_from_entry,
        return_from_avg: position.return_from_avg(order.price),
        note: order.note,
    };
    ledger.append(record.clone());
    ExecutionOutcome::Executed(record)
}

/// Liquidate every share at `price`. Proceeds are credited to cash and the
/// returned record carries zero resulting shares and average.
pub fn execute_sell(
    position: &mut Position,
    ledger: &mut TradeLedger,
    config: &EngineConfig,
    date: NaiveDate,
    price: f64,
    note: String,
) -> TradeRecord {
    let loss_from_entry = position.loss_from_entry(price);
    let return_from_avg = position.return_from_avg(price);
    let proceeds = position.market_value(price, config.exchange_rate());
    let shares = position.liquidate();
    position.cash += proceeds;

    let record = TradeRecord {
        date,
        action: TradeAction::TakeProfitSell,
        price,
        shares,
        amount: proceeds,
        total_shares: 0.0,
        avg_price: 0.0,
        loss_from_entry,
        return_from_avg,
        note,
    };
    ledger.append(record.clone());
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(exchange_rate: f64) -> EngineConfig {
        EngineConfig::with_default_triggers(1_000_000.0, 0.2, exchange_rate).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn order(action: TradeAction, price: f64, amount: f64) -> BuyOrder {
        BuyOrder {
            date: date(),
            action,
            price,
            amount,
            loss_from_entry: 0.0,
            note: "test".into(),
        }
    }

    #[test]
    fn buy_converts_through_exchange_rate() {
        let mut pos = Position::with_cash(1_350_000.0);
        let mut ledger = TradeLedger::new();
        let outcome = execute_buy(
            &mut pos,
            &mut ledger,
            &config(1350.0),
            order(TradeAction::InitialEntry, 50.0, 270_000.0),
        );
        let record = outcome.record().unwrap();
        // 270_000 / 1350 / 50 = 4 shares
        assert_relative_eq!(record.shares, 4.0);
        assert_relative_eq!(pos.shares, 4.0);
        assert_relative_eq!(pos.avg_price, 50.0);
        assert_relative_eq!(pos.cash, 1_080_000.0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn buy_updates_weighted_average() {
        let mut pos = Position::with_cash(10_000.0);
        let mut ledger = TradeLedger::new();
        let cfg = config(1.0);
        execute_buy(&mut pos, &mut ledger, &cfg, order(TradeAction::InitialEntry, 100.0, 1000.0));
        let outcome = execute_buy(&mut pos, &mut ledger, &cfg, order(TradeAction::AverageBuy, 50.0, 1000.0));
        // 10 @ 100 + 20 @ 50 = 30 shares, 2000 cost
        assert_relative_eq!(pos.shares, 30.0);
        assert_relative_eq!(pos.avg_price, 2000.0 / 30.0);
        let record = outcome.record().unwrap();
        assert_relative_eq!(record.total_shares, 30.0);
        assert_relative_eq!(record.avg_price, 2000.0 / 30.0);
        assert_relative_eq!(record.return_from_avg, (50.0 - 2000.0 / 30.0) / (2000.0 / 30.0) * 100.0);
    }

    #[test]
    fn buy_exceeding_cash_is_skipped() {
        let mut pos = Position::with_cash(100.0);
        let mut ledger = TradeLedger::new();
        let outcome = execute_buy(&mut pos, &mut ledger, &config(1.0), order(TradeAction::PanicBuy, 10.0, 100.01));
        assert_eq!(
            outcome.skip_reason(),
            Some(SkipReason::InsufficientCash {
                required: 100.01,
                available: 100.0
            })
        );
        assert!(ledger.is_empty());
        assert_eq!(pos.cash, 100.0);
        assert!(pos.is_flat());
    }

    #[test]
    fn buy_of_exactly_all_cash_executes() {
        let mut pos = Position::with_cash(100.0);
        let mut ledger = TradeLedger::new();
        let outcome = execute_buy(&mut pos, &mut ledger, &config(1.0), order(TradeAction::AverageBuy, 10.0, 100.0));
        assert!(outcome.is_executed());
        assert_eq!(pos.cash, 0.0);
    }

    #[test]
    fn zero_amount_is_skipped() {
        let mut pos = Position::with_cash(100.0);
        let mut ledger = TradeLedger::new();
        let outcome = execute_buy(&mut pos, &mut ledger, &config(1.0), order(TradeAction::AverageBuy, 10.0, 0.0));
        assert_eq!(
            outcome.skip_reason(),
            Some(SkipReason::NonPositiveAmount { amount: 0.0 })
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn sell_liquidates_and_credits_proceeds() {
        let mut pos = Position {
            shares: 10.0,
            avg_price: 80.0,
            initial_entry_price: 100.0,
            cash: 500.0,
        };
        let mut ledger = TradeLedger::new();
        let record = execute_sell(&mut pos, &mut ledger, &config(2.0), date(), 96.0, "tp".into());
        assert_eq!(record.action, TradeAction::TakeProfitSell);
        assert_relative_eq!(record.shares, 10.0);
        assert_relative_eq!(record.amount, 1920.0);
        assert_eq!(record.total_shares, 0.0);
        assert_eq!(record.avg_price, 0.0);
        assert_relative_eq!(record.return_from_avg, 20.0);
        assert_relative_eq!(record.loss_from_entry, -4.0);
        assert!(pos.is_flat());
        assert_relative_eq!(pos.cash, 2420.0);
        assert_eq!(ledger.len(), 1);
    }
}
