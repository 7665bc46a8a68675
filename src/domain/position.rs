//! Position tracking for the single priced asset.

/// Holdings and cash for the current cycle.
///
/// `avg_price` is the quantity-weighted mean price of every buy since the
/// last liquidation and is 0 whenever `shares` is 0. `cash` is in the capital
/// currency; prices are in the asset's currency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub shares: f64,
    pub avg_price: f64,
    pub initial_entry_price: f64,
    pub cash: f64,
}

impl Position {
    pub fn with_cash(cash: f64) -> Self {
        Position {
            cash,
            ..Position::default()
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0.0
    }

    /// Holdings valued in the capital currency.
    pub fn market_value(&self, price: f64, exchange_rate: f64) -> f64 {
        self.shares * price * exchange_rate
    }

    /// % move of `price` from the cycle's initial entry price.
    pub fn loss_from_entry(&self, price: f64) -> f64 {
        if self.initial_entry_price == 0.0 {
            return 0.0;
        }
        (price - self.initial_entry_price) / self.initial_entry_price * 100.0
    }

    /// % move of `price` from the running average cost.
    pub fn return_from_avg(&self, price: f64) -> f64 {
        if self.shares == 0.0 || self.avg_price == 0.0 {
            return 0.0;
        }
        (price - self.avg_price) / self.avg_price * 100.0
    }

    /// Add `shares` bought at `price` and fold them into the average.
    pub(crate) fn add_shares(&mut self, shares: f64, price: f64) {
        if self.shares > 0.0 {
            let total_cost = self.shares * self.avg_price + shares * price;
            self.shares += shares;
            self.avg_price = total_cost / self.shares;
        } else {
            self.shares = shares;
            self.avg_price = price;
        }
    }

    /// Sell everything; returns the number of shares sold.
    pub(crate) fn liquidate(&mut self) -> f64 {
        let sold = self.shares;
        self.shares = 0.0;
        self.avg_price = 0.0;
        sold
    }
}
