//! Parameter sweep over trigger thresholds.
//!
//! Every configuration runs as its own engine instance over a shared,
//! read-only price series, so the grid is evaluated in parallel with no
//! locking.

use rayon::prelude::*;

use super::config::EngineConfig;
use super::engine;
use super::error::AlphaCycleError;
use super::price::PriceSeries;
use super::summary::RunSummary;

/// Trigger values to combine. Each list is in whole percents.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid {
    pub buy_triggers: Vec<f64>,
    pub sell_triggers: Vec<f64>,
    pub panic_triggers: Vec<f64>,
}

/// A named (buy, sell, panic) trigger triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub buy_trigger: f64,
    pub sell_trigger: f64,
    pub panic_trigger: f64,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "default",
        buy_trigger: -20.0,
        sell_trigger: 20.0,
        panic_trigger: -50.0,
    },
    Preset {
        name: "aggressive",
        buy_trigger: -15.0,
        sell_trigger: 15.0,
        panic_trigger: -40.0,
    },
    Preset {
        name: "conservative",
        buy_trigger: -25.0,
        sell_trigger: 25.0,
        panic_trigger: -60.0,
    },
];

pub fn find_preset(name: &str) -> Option<Preset> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}

impl ParamGrid {
    pub fn size(&self) -> usize {
        self.buy_triggers.len() * self.sell_triggers.len() * self.panic_triggers.len()
    }

    /// All combinations over `base`. Combinations whose panic trigger is not
    /// below the buy trigger are skipped.
    pub fn generate_configs(&self, base: &EngineConfig) -> Vec<EngineConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &buy in &self.buy_triggers {
            for &sell in &self.sell_triggers {
                for &panic in &self.panic_triggers {
                    match base.with_triggers(buy, sell, panic) {
                        Ok(config) => configs.push(config),
                        Err(e) => tracing::debug!(buy, sell, panic, "skipping combination: {e}"),
                    }
                }
            }
        }
        configs
    }
}

/// One point of the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub label: String,
    pub config: EngineConfig,
    pub summary: RunSummary,
}

/// Build one labelled config per preset.
pub fn preset_configs(
    base: &EngineConfig,
    presets: &[Preset],
) -> Result<Vec<(String, EngineConfig)>, AlphaCycleError> {
    presets
        .iter()
        .map(|p| {
            base.with_triggers(p.buy_trigger, p.sell_trigger, p.panic_trigger)
                .map(|config| (p.name.to_string(), config))
        })
        .collect()
}

/// Label grid configs by their triggers.
pub fn grid_configs(base: &EngineConfig, grid: &ParamGrid) -> Vec<(String, EngineConfig)> {
    grid.generate_configs(base)
        .into_iter()
        .map(|config| {
            let label = format!(
                "buy {}/sell {}/panic {}",
                config.buy_trigger(),
                config.sell_trigger(),
                config.panic_trigger()
            );
            (label, config)
        })
        .collect()
}

/// Run every configuration over `series`. Output order follows input order.
pub fn sweep(
    series: &PriceSeries,
    configs: &[(String, EngineConfig)],
    parallel: bool,
) -> Vec<SweepOutcome> {
    let evaluate = |(label, config): &(String, EngineConfig)| {
        let result = engine::run(config, series);
        SweepOutcome {
            label: label.clone(),
            config: *config,
            summary: RunSummary::compute(config, &result),
        }
    };

    tracing::info!(configs = configs.len(), parallel, "starting sweep");
    if parallel {
        configs.par_iter().map(evaluate).collect()
    } else {
        configs.iter().map(evaluate).collect()
    }
}

/// The outcome with the highest total return.
pub fn best(outcomes: &[SweepOutcome]) -> Option<&SweepOutcome> {
    outcomes
        .iter()
        .max_by(|a, b| a.summary.total_return.total_cmp(&b.summary.total_return))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;

    fn base() -> EngineConfig {
        EngineConfig::with_default_triggers(1000.0, 0.2, 1.0).unwrap()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn grid_skips_invalid_combinations() {
        let grid = ParamGrid {
            buy_triggers: vec![-20.0, -40.0],
            sell_triggers: vec![20.0],
            panic_triggers: vec![-30.0, -50.0],
        };
        assert_eq!(grid.size(), 4);
        let configs = grid.generate_configs(&base());
        // (-40, -30) is not more extreme, so 3 remain
        assert_eq!(configs.len(), 3);
        assert!(configs.iter().all(|c| c.panic_trigger() < c.buy_trigger()));
    }

    #[test]
    fn presets_from_names() {
        assert_eq!(find_preset("Aggressive").unwrap().buy_trigger, -15.0);
        assert_eq!(find_preset(" conservative ").unwrap().panic_trigger, -60.0);
        assert!(find_preset("yolo").is_none());
        let configs = preset_configs(&base(), &PRESETS).unwrap();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].0, "default");
    }

    #[test]
    fn parallel_matches_sequential() {
        let s = series(&[100.0, 85.0, 70.0, 55.0, 45.0, 60.0, 75.0, 90.0, 60.0, 110.0]);
        let configs = preset_configs(&base(), &PRESETS).unwrap();
        let par = sweep(&s, &configs, true);
        let seq = sweep(&s, &configs, false);
        assert_eq!(par, seq);
        assert_eq!(par.len(), 3);
        assert_eq!(par[1].label, "aggressive");
    }

    #[test]
    fn best_picks_highest_return() {
        let s = series(&[100.0, 84.0, 101.0]);
        let configs = preset_configs(&base(), &PRESETS).unwrap();
        let outcomes = sweep(&s, &configs, false);
        let top = best(&outcomes).unwrap();
        let max = outcomes
            .iter()
            .map(|o| o.summary.total_return)
            .fold(f64::MIN, f64::max);
        assert_eq!(top.summary.total_return, max);
        assert!(best(&[]).is_none());
    }
}
