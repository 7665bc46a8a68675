//! Daily price observations and the validated series the engine folds over.

use chrono::NaiveDate;

use super::error::AlphaCycleError;

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

/// A price series that is known to be strictly ascending by date with
/// positive, finite closes. Gaps between dates are allowed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and wrap raw observations. Input is never reordered: an
    /// out-of-order or repeated date is rejected.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AlphaCycleError> {
        for (index, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(AlphaCycleError::InvalidPrice {
                    date: point.date,
                    price: point.close,
                });
            }
            if index == 0 {
                continue;
            }
            let previous = points[index - 1].date;
            if point.date == previous {
                return Err(AlphaCycleError::DuplicateDate {
                    index,
                    date: point.date,
                });
            }
            if point.date < previous {
                return Err(AlphaCycleError::UnsortedSeries {
                    index,
                    previous,
                    date: point.date,
                });
            }
        }
        Ok(PriceSeries { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
