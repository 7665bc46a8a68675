//! Cycle engine: a left-to-right fold over the price series.
//!
//! [`step`] applies the decision rules to one observation in a fixed order:
//!
//! 1. first entry of the cycle (nothing else happens that day)
//! 2. take-profit on return-from-average (ends the cycle, nothing else that day)
//! 3. one-shot panic buy on loss-from-entry
//! 4. averaging buy on loss-from-entry, also on the day the panic buy fires
//!
//! The config is immutable; all mutable state lives in an explicitly passed
//! [`RunState`] owned by a single run.

use chrono::NaiveDate;

use super::config::EngineConfig;
use super::cycle::{CycleOutcome, CycleState};
use super::execution::{execute_buy, execute_sell, BuyOrder, ExecutionOutcome, SkipReason};
use super::ledger::{TradeAction, TradeLedger};
use super::position::Position;
use super::price::{PricePoint, PriceSeries};

/// A rule whose trigger held on an observation, and what came of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: TradeAction,
    pub outcome: ExecutionOutcome,
}

/// Mutable state of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    position: Position,
    cycle: CycleState,
    ledger: TradeLedger,
    completed_cycles: Vec<CycleOutcome>,
    observations: usize,
    first_observation: Option<PricePoint>,
    last_observation: Option<PricePoint>,
}

impl RunState {
    pub fn new(config: &EngineConfig) -> Self {
        RunState {
            position: Position::with_cash(config.seed_capital()),
            cycle: CycleState::first(config.seed_capital(), config.entry_ratio()),
            ledger: TradeLedger::new(),
            completed_cycles: Vec::new(),
            observations: 0,
            first_observation: None,
            last_observation: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn cycle(&self) -> &CycleState {
        &self.cycle
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn completed_cycles(&self) -> &[CycleOutcome] {
        &self.completed_cycles
    }

    pub fn cycles_completed(&self) -> usize {
        self.completed_cycles.len()
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn finish(self) -> RunResult {
        RunResult {
            position: self.position,
            cycle: self.cycle,
            ledger: self.ledger,
            completed_cycles: self.completed_cycles,
            observations: self.observations,
            first_observation: self.first_observation,
            last_observation: self.last_observation,
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub position: Position,
    pub cycle: CycleState,
    pub ledger: TradeLedger,
    pub completed_cycles: Vec<CycleOutcome>,
    pub observations: usize,
    pub first_observation: Option<PricePoint>,
    pub last_observation: Option<PricePoint>,
}

impl RunResult {
    pub fn cycles_completed(&self) -> usize {
        self.completed_cycles.len()
    }
}

/// Run the engine over a whole series.
pub fn run(config: &EngineConfig, series: &PriceSeries) -> RunResult {
    let mut state = RunState::new(config);
    for point in series {
        step(config, &mut state, point);
    }
    tracing::debug!(
        observations = state.observations,
        trades = state.ledger.len(),
        cycles = state.cycles_completed(),
        "run finished"
    );
    state.finish()
}

/// Apply the decision rules to one observation.
pub fn step(config: &EngineConfig, state: &mut RunState, point: &PricePoint) -> Vec<Decision> {
    state.observations += 1;
    if state.first_observation.is_none() {
        state.first_observation = Some(*point);
    }
    state.last_observation = Some(*point);

    let price = point.close;
    let mut decisions = Vec::new();

    if state.cycle.is_awaiting_entry() {
        decisions.push(enter_cycle(config, state, point));
        return decisions;
    }

    let loss_from_entry = state.position.loss_from_entry(price);
    let return_from_avg = state.position.return_from_avg(price);

    if return_from_avg >= config.sell_trigger() {
        decisions.push(take_profit(config, state, point.date, price, return_from_avg));
        return decisions;
    }

    if loss_from_entry <= config.panic_trigger() {
        decisions.push(panic_buy(config, state, point, loss_from_entry));
    }

    if loss_from_entry <= config.buy_trigger() {
        decisions.push(averaging_buy(config, state, point, loss_from_entry));
    }

    decisions
}

fn enter_cycle(config: &EngineConfig, state: &mut RunState, point: &PricePoint) -> Decision {
    state.position.initial_entry_price = point.close;
    state.cycle.begin(point.date);

    let order = BuyOrder {
        date: point.date,
        action: TradeAction::InitialEntry,
        price: point.close,
        amount: state.cycle.initial_entry_amount,
        loss_from_entry: 0.0,
        note: format!(
            "cycle #{} start ({:.0}% of seed, reference {:.2})",
            state.cycle.number,
            config.entry_ratio() * 100.0,
            point.close
        ),
    };
    let outcome = buy(config, state, order);
    Decision {
        action: TradeAction::InitialEntry,
        outcome,
    }
}

fn take_profit(
    config: &EngineConfig,
    state: &mut RunState,
    date: NaiveDate,
    price: f64,
    return_from_avg: f64,
) -> Decision {
    let note = format!("take profit at {return_from_avg:+.1}% over average");
    let record = execute_sell(
        &mut state.position,
        &mut state.ledger,
        config,
        date,
        price,
        note,
    );

    let new_seed = state.position.cash;
    let outcome = CycleOutcome {
        number: state.cycle.number,
        started_on: state.cycle.started_on,
        ended_on: date,
        seed: state.cycle.seed,
        ending_value: new_seed,
        return_from_avg,
    };
    tracing::info!(
        cycle = outcome.number,
        %date,
        profit = outcome.profit(),
        new_seed,
        "cycle completed"
    );
    state.completed_cycles.push(outcome);

    state.position = Position::with_cash(new_seed);
    state.cycle.rollover(new_seed, config.entry_ratio());

    Decision {
        action: TradeAction::TakeProfitSell,
        outcome: ExecutionOutcome::Executed(record),
    }
}

fn panic_buy(
    config: &EngineConfig,
    state: &mut RunState,
    point: &PricePoint,
    loss_from_entry: f64,
) -> Decision {
    if state.cycle.panic_used {
        return Decision {
            action: TradeAction::PanicBuy,
            outcome: ExecutionOutcome::Skipped(SkipReason::PanicAlreadyUsed),
        };
    }

    let amount = config.panic_amount(state.cycle.initial_entry_amount);
    let order = BuyOrder {
        date: point.date,
        action: TradeAction::PanicBuy,
        price: point.close,
        amount,
        loss_from_entry,
        note: format!("panic buy: 50% of initial entry ({amount:.0}) at {loss_from_entry:.1}%"),
    };
    let outcome = buy(config, state, order);
    // the flag is spent only by an executed buy
    if outcome.is_executed() {
        state.cycle.panic_used = true;
    }
    Decision {
        action: TradeAction::PanicBuy,
        outcome,
    }
}

fn averaging_buy(
    config: &EngineConfig,
    state: &mut RunState,
    point: &PricePoint,
    loss_from_entry: f64,
) -> Decision {
    let amount = config.averaging_amount(state.cycle.initial_entry_amount, loss_from_entry);
    let order = BuyOrder {
        date: point.date,
        action: TradeAction::AverageBuy,
        price: point.close,
        amount,
        loss_from_entry,
        note: format!("loss {loss_from_entry:.1}% -> buy {amount:.0}"),
    };
    let outcome = buy(config, state, order);
    Decision {
        action: TradeAction::AverageBuy,
        outcome,
    }
}

fn buy(config: &EngineConfig, state: &mut RunState, order: BuyOrder) -> ExecutionOutcome {
    let (date, action) = (order.date, order.action);
    let outcome = execute_buy(&mut state.position, &mut state.ledger, config, order);
    match &outcome {
        ExecutionOutcome::Executed(record) => tracing::debug!(
            %date,
            %action,
            price = record.price,
            amount = record.amount,
            avg_price = record.avg_price,
            "executed"
        ),
        ExecutionOutcome::Skipped(reason) => {
            tracing::debug!(%date, %action, ?reason, "skipped")
        }
    }
    outcome
}
