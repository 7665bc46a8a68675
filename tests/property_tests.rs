//! Invariants of the cycle engine over generated price paths.

mod common;

use alphacycle::domain::config::EngineConfig;
use alphacycle::domain::engine::{run, step, RunState};
use alphacycle::domain::ledger::TradeAction;
use common::*;
use proptest::prelude::*;

fn price_path(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..500.0, 0..max_len)
}

/// Each day's close is at most the previous one.
fn declining_path(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..0.08, 0..max_len).prop_map(|drops| {
        let mut price = 100.0;
        let mut path = vec![price];
        for d in drops {
            price *= 1.0 - d;
            path.push(price);
        }
        path
    })
}

fn config_strategy() -> impl Strategy<Value = EngineConfig> {
    (0.05f64..1.0, -40.0f64..-5.0, 5.0f64..40.0, 5.0f64..40.0).prop_map(
        |(ratio, buy, sell, panic_gap)| {
            EngineConfig::new(10_000.0, ratio, buy, sell, buy - panic_gap, 1.0).unwrap()
        },
    )
}

proptest! {
    #[test]
    fn cash_never_negative(config in config_strategy(), path in price_path(60)) {
        let series = make_series(&path);
        let mut state = RunState::new(&config);
        for point in &series {
            step(&config, &mut state, point);
            prop_assert!(state.position().cash >= 0.0);
            prop_assert!(state.position().shares >= 0.0);
        }
    }

    #[test]
    fn average_is_quantity_weighted_mean(config in config_strategy(), path in price_path(60)) {
        let result = run(&config, &make_series(&path));
        let mut shares = 0.0;
        let mut cost = 0.0;
        for record in &result.ledger {
            if record.action == TradeAction::TakeProfitSell {
                shares = 0.0;
                cost = 0.0;
                continue;
            }
            shares += record.shares;
            cost += record.shares * record.price;
            prop_assert!((record.total_shares - shares).abs() <= 1e-9 * shares.max(1.0));
            let expected = cost / shares;
            prop_assert!((record.avg_price - expected).abs() <= 1e-9 * expected);
        }
    }

    #[test]
    fn at_most_one_panic_buy_per_cycle(config in config_strategy(), path in price_path(80)) {
        let result = run(&config, &make_series(&path));
        let mut panics_in_cycle = 0;
        for record in &result.ledger {
            match record.action {
                TradeAction::PanicBuy => {
                    panics_in_cycle += 1;
                    prop_assert!(panics_in_cycle <= 1);
                }
                TradeAction::TakeProfitSell => panics_in_cycle = 0,
                _ => {}
            }
        }
    }

    #[test]
    fn sell_liquidates_and_resets(config in config_strategy(), path in price_path(60)) {
        let series = make_series(&path);
        let mut state = RunState::new(&config);
        for point in &series {
            let decisions = step(&config, &mut state, point);
            if decisions.iter().any(|d| d.action == TradeAction::TakeProfitSell) {
                prop_assert_eq!(decisions.len(), 1);
                prop_assert_eq!(state.position().shares, 0.0);
                prop_assert_eq!(state.position().initial_entry_price, 0.0);
                prop_assert!(state.cycle().is_awaiting_entry());
                prop_assert!(!state.cycle().panic_used);
            }
        }
    }

    #[test]
    fn flat_series_only_enters(config in config_strategy(), price in 1.0f64..500.0, len in 1usize..50) {
        let result = run(&config, &make_series(&vec![price; len]));
        prop_assert_eq!(result.ledger.len(), 1);
        prop_assert_eq!(result.ledger.records()[0].action, TradeAction::InitialEntry);
    }

    /// A deeper buy trigger never produces more averaging buys. Paths are
    /// short and the seed large enough that cash never binds.
    #[test]
    fn averaging_count_monotone_in_trigger_depth(
        path in declining_path(30),
        shallow in -30.0f64..-5.0,
        extra in 0.0f64..20.0,
    ) {
        let series = make_series(&path);
        let deep = shallow - extra;
        let base = EngineConfig::with_default_triggers(1_000_000.0, 0.2, 1.0).unwrap();
        let shallow_cfg = base.with_triggers(shallow, 20.0, -99.0).unwrap();
        let deep_cfg = base.with_triggers(deep, 20.0, -99.0).unwrap();

        let shallow_buys = run(&shallow_cfg, &series).ledger.count(TradeAction::AverageBuy);
        let deep_buys = run(&deep_cfg, &series).ledger.count(TradeAction::AverageBuy);
        prop_assert!(deep_buys <= shallow_buys);
    }
}
