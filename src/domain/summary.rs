//! Run summary: a read-only projection of a finished run.

use chrono::NaiveDate;

use super::config::EngineConfig;
use super::cycle::CycleOutcome;
use super::engine::RunResult;
use super::ledger::TradeAction;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub seed_capital: f64,
    pub final_value: f64,
    pub holdings_value: f64,
    pub cash: f64,
    /// Percent.
    pub total_return: f64,
    pub cycles_completed: usize,
    pub initial_entries: usize,
    pub averaging_buys: usize,
    pub panic_buys: usize,
    pub sells: usize,
    pub total_invested: f64,
    pub buy_and_hold: Option<BuyAndHold>,
    pub cycles: Vec<CycleOutcome>,
    pub open_cycle: Option<OpenCycle>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub observations: usize,
}

/// Baseline: the whole seed invested at the first close and held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyAndHold {
    pub first_price: f64,
    pub last_price: f64,
    /// Percent.
    pub total_return: f64,
    pub final_value: f64,
}

/// Snapshot of the cycle still in progress at the last observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenCycle {
    pub number: usize,
    pub shares: f64,
    pub initial_entry_price: f64,
    pub avg_price: f64,
    pub last_price: f64,
    pub loss_from_entry: f64,
    pub return_from_avg: f64,
    pub panic_used: bool,
    /// Averaging-buy amount the rule calls for at the last price; 0 above
    /// the buy trigger.
    pub suggested_buy: f64,
}

impl RunSummary {
    pub fn compute(config: &EngineConfig, result: &RunResult) -> Self {
        let seed_capital = config.seed_capital();
        let last_price = result.last_observation.map(|p| p.close);
        let position = &result.position;

        let holdings_value = last_price
            .map(|price| position.market_value(price, config.exchange_rate()))
            .unwrap_or(0.0);
        let final_value = holdings_value + position.cash;
        let total_return = (final_value - seed_capital) / seed_capital * 100.0;

        let buy_and_hold = match (result.first_observation, result.last_observation) {
            (Some(first), Some(last)) => {
                let total_return = (last.close - first.close) / first.close * 100.0;
                Some(BuyAndHold {
                    first_price: first.close,
                    last_price: last.close,
                    total_return,
                    final_value: seed_capital * (1.0 + total_return / 100.0),
                })
            }
            _ => None,
        };

        let open_cycle = match last_price {
            Some(price) if position.shares > 0.0 => {
                let loss_from_entry = position.loss_from_entry(price);
                Some(OpenCycle {
                    number: result.cycle.number,
                    shares: position.shares,
                    initial_entry_price: position.initial_entry_price,
                    avg_price: position.avg_price,
                    last_price: price,
                    loss_from_entry,
                    return_from_avg: position.return_from_avg(price),
                    panic_used: result.cycle.panic_used,
                    suggested_buy: config
                        .averaging_amount(result.cycle.initial_entry_amount, loss_from_entry),
                })
            }
            _ => None,
        };

        let ledger = &result.ledger;
        RunSummary {
            seed_capital,
            final_value,
            holdings_value,
            cash: position.cash,
            total_return,
            cycles_completed: result.cycles_completed(),
            initial_entries: ledger.count(TradeAction::InitialEntry),
            averaging_buys: ledger.count(TradeAction::AverageBuy),
            panic_buys: ledger.count(TradeAction::PanicBuy),
            sells: ledger.count(TradeAction::TakeProfitSell),
            total_invested: ledger.total_invested(),
            buy_and_hold,
            cycles: result.completed_cycles.clone(),
            open_cycle,
            start_date: result.first_observation.map(|p| p.date),
            end_date: result.last_observation.map(|p| p.date),
            observations: result.observations,
        }
    }

    /// Strategy return minus buy-and-hold return, in percentage points.
    pub fn excess_return(&self) -> Option<f64> {
        self.buy_and_hold
            .map(|bnh| self.total_return - bnh.total_return)
    }

    pub fn trade_count(&self) -> usize {
        self.initial_entries + self.averaging_buys + self.panic_buys + self.sells
    }
}
