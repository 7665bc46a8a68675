//! Plain-text run report.
//!
//! Renders the run summary, completed cycles, the open cycle and the most
//! recent trades. The engine itself never prints; everything a reader sees
//! on the console comes from here.

use std::io::Write;

use crate::domain::config::EngineConfig;
use crate::domain::engine::RunResult;
use crate::domain::error::AlphaCycleError;
use crate::domain::ledger::TradeRecord;
use crate::domain::summary::RunSummary;
use crate::domain::sweep::SweepOutcome;
use crate::ports::report_port::ReportPort;

const RULE_WIDTH: usize = 70;

pub struct TextReportAdapter {
    recent_trades: usize,
}

impl TextReportAdapter {
    pub fn new(recent_trades: usize) -> Self {
        Self { recent_trades }
    }

    pub fn render(&self, config: &EngineConfig, result: &RunResult, summary: &RunSummary) -> String {
        let mut output = String::new();
        output.push_str(&render_header(config, summary));
        output.push_str(&render_results(summary));
        output.push_str(&render_buy_and_hold(summary));
        output.push_str(&render_open_cycle(summary));
        output.push_str(&render_cycles(summary));
        if self.recent_trades > 0 {
            output.push_str(&render_recent_trades(result.ledger.recent(self.recent_trades)));
        }
        output
    }

    pub fn render_sweep(&self, outcomes: &[SweepOutcome]) -> String {
        if outcomes.is_empty() {
            return String::from("No parameter combinations to evaluate.\n");
        }

        let mut output = section("Parameter comparison");
        output.push_str(&format!(
            "{:<28} {:>7} {:>7} {:>20} {:>10}\n",
            "configuration", "cycles", "trades", "final value", "return"
        ));
        for o in outcomes {
            output.push_str(&format!(
                "{:<28} {:>7} {:>7} {:>20} {:>9.1}%\n",
                o.label,
                o.summary.cycles_completed,
                o.summary.trade_count(),
                fmt_amount(o.summary.final_value),
                o.summary.total_return,
            ));
        }
        output
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        config: &EngineConfig,
        result: &RunResult,
        summary: &RunSummary,
    ) -> Result<(), AlphaCycleError> {
        let text = self.render(config, result, summary);
        std::io::stdout().lock().write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_sweep(&self, outcomes: &[SweepOutcome]) -> Result<(), AlphaCycleError> {
        let text = self.render_sweep(outcomes);
        std::io::stdout().lock().write_all(text.as_bytes())?;
        Ok(())
    }
}

fn section(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}\n")
}

/// Whole currency units with thousands separators.
pub fn fmt_amount(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn render_header(config: &EngineConfig, summary: &RunSummary) -> String {
    let mut output = section("Alpha Cycle backtest");
    match (summary.start_date, summary.end_date) {
        (Some(start), Some(end)) => output.push_str(&format!(
            "Period:             {start} ~ {end} ({} trading days)\n",
            summary.observations
        )),
        _ => output.push_str("Period:             no observations\n"),
    }
    if let Some(bnh) = summary.buy_and_hold {
        output.push_str(&format!(
            "Price:              {:.2} -> {:.2}\n",
            bnh.first_price, bnh.last_price
        ));
    }
    output.push_str(&format!(
        "Seed capital:       {}\n",
        fmt_amount(config.seed_capital())
    ));
    output.push_str(&format!(
        "Initial entry:      {} ({:.0}% of seed)\n",
        fmt_amount(config.initial_entry_amount(config.seed_capital())),
        config.entry_ratio() * 100.0
    ));
    output.push_str(&format!(
        "Triggers:           buy {}% / sell +{}% / panic {}% (exchange rate {})\n",
        config.buy_trigger(),
        config.sell_trigger(),
        config.panic_trigger(),
        config.exchange_rate()
    ));
    output
}

fn render_results(summary: &RunSummary) -> String {
    let mut output = section("Results");
    output.push_str(&format!("Final value:        {:>25}\n", fmt_amount(summary.final_value)));
    output.push_str(&format!("  holdings:         {:>25}\n", fmt_amount(summary.holdings_value)));
    output.push_str(&format!("  cash:             {:>25}\n", fmt_amount(summary.cash)));
    output.push_str(&format!("Total return:       {:>24.1}%\n", summary.total_return));
    output.push_str(&format!("Completed cycles:   {:>25}\n", summary.cycles_completed));
    output.push_str(&format!("Initial entries:    {:>25}\n", summary.initial_entries));
    output.push_str(&format!("Averaging buys:     {:>25}\n", summary.averaging_buys));
    output.push_str(&format!("Panic buys:         {:>25}\n", summary.panic_buys));
    output.push_str(&format!("Take-profit sells:  {:>25}\n", summary.sells));
    output.push_str(&format!("Total invested:     {:>25}\n", fmt_amount(summary.total_invested)));
    output
}

fn render_buy_and_hold(summary: &RunSummary) -> String {
    let Some(bnh) = summary.buy_and_hold else {
        return String::new();
    };
    let mut output = section("Buy & hold (whole seed invested)");
    output.push_str(&format!("Return:             {:>24.1}%\n", bnh.total_return));
    output.push_str(&format!("Final value:        {:>25}\n", fmt_amount(bnh.final_value)));
    if let Some(diff) = summary.excess_return() {
        if diff > 0.0 {
            output.push_str(&format!("Alpha Cycle ahead by {diff:.1} pp\n"));
        } else {
            output.push_str(&format!("Buy & hold ahead by {:.1} pp\n", diff.abs()));
        }
    }
    output
}

fn render_open_cycle(summary: &RunSummary) -> String {
    let Some(open) = summary.open_cycle else {
        return String::new();
    };
    let mut output = section(&format!("Cycle #{} in progress", open.number));
    output.push_str(&format!("Shares held:        {:>25.2}\n", open.shares));
    output.push_str(&format!("Initial entry:      {:>25.2}\n", open.initial_entry_price));
    output.push_str(&format!("Average price:      {:>25.2}\n", open.avg_price));
    output.push_str(&format!("Last price:         {:>25.2}\n", open.last_price));
    output.push_str(&format!("Loss from entry:    {:>24.1}%\n", open.loss_from_entry));
    output.push_str(&format!("Return from avg:    {:>24.1}%\n", open.return_from_avg));
    output.push_str(&format!(
        "Panic buy used:     {:>25}\n",
        if open.panic_used { "yes" } else { "no" }
    ));
    if open.suggested_buy > 0.0 {
        output.push_str(&format!("Suggested buy:      {:>25}\n", fmt_amount(open.suggested_buy)));
    }
    output
}

fn render_cycles(summary: &RunSummary) -> String {
    if summary.cycles.is_empty() {
        return String::new();
    }
    let mut output = section("Cycle history");
    for c in &summary.cycles {
        let started = c
            .started_on
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "#{:<3} {} ~ {} | {:+.1}% over avg | profit {} | new seed {}\n",
            c.number,
            started,
            c.ended_on,
            c.return_from_avg,
            fmt_amount(c.profit()),
            fmt_amount(c.ending_value),
        ));
    }
    output
}

fn render_recent_trades(trades: &[TradeRecord]) -> String {
    if trades.is_empty() {
        return String::from("\nNo trades executed.\n");
    }
    let mut output = section("Recent trades");
    for t in trades {
        output.push_str(&format!(
            "[{}] {:<12} | {:>10.2} | {:>15}\n    {}\n",
            t.date,
            t.action.label(),
            t.price,
            fmt_amount(t.amount),
            t.note,
        ));
    }
    output
}
