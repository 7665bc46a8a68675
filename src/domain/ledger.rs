//! Trade records and the append-only ledger.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TradeAction {
    #[serde(rename = "INITIAL_BUY")]
    InitialEntry,
    #[serde(rename = "BUY")]
    AverageBuy,
    #[serde(rename = "PANIC_BUY")]
    PanicBuy,
    #[serde(rename = "SELL")]
    TakeProfitSell,
}

impl TradeAction {
    pub fn label(&self) -> &'static str {
        match self {
            TradeAction::InitialEntry => "INITIAL_BUY",
            TradeAction::AverageBuy => "BUY",
            TradeAction::PanicBuy => "PANIC_BUY",
            TradeAction::TakeProfitSell => "SELL",
        }
    }

    pub fn is_buy(&self) -> bool {
        !matches!(self, TradeAction::TakeProfitSell)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One execution. `amount` is in the capital currency; `price` and
/// `avg_price` in the asset's currency. Percentages are whole percents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
    pub amount: f64,
    pub total_shares: f64,
    pub avg_price: f64,
    pub loss_from_entry: f64,
    pub return_from_avg: f64,
    pub note: String,
}

/// Chronological record of every execution in a run.
///
/// Records can only be appended by the engine; nothing hands out mutable
/// access to a stored record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeLedger {
    records: Vec<TradeRecord>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, record: TradeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TradeRecord> {
        self.records.last()
    }

    pub fn count(&self, action: TradeAction) -> usize {
        self.records.iter().filter(|r| r.action == action).count()
    }

    pub fn sells(&self) -> impl Iterator<Item = &TradeRecord> {
        self.records
            .iter()
            .filter(|r| r.action == TradeAction::TakeProfitSell)
    }

    /// Sum of buy notionals across all cycles.
    pub fn total_invested(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.action.is_buy())
            .map(|r| r.amount)
            .sum()
    }

    /// The trailing `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[TradeRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
