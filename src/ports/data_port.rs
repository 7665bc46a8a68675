//! Price data access port trait.

use crate::domain::error::AlphaCycleError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes within the optional inclusive date bounds, in source
    /// order. Implementations must not reorder rows; ordering is validated
    /// when the points are wrapped in a `PriceSeries`.
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AlphaCycleError>;
}
