//! Aggregate statistics over deals: sums, extremes and averages.
//!
//! Reducers work on anything with a price, volume and funds figure
//! (public [`HistoryEntry`] deals and the user's own [`Trade`] fills).
//!
//! Empty input: minima and maxima are `0.0`. Averages are undefined and
//! return `f64::NAN`, as does [`avg_price`] when the total volume is zero;
//! check with `is_nan()`.

use crate::types::{HistoryEntry, Trade};

/// A priced deal.
pub trait Fill {
    fn price(&self) -> f64;
    fn volume(&self) -> f64;
    fn funds(&self) -> f64;
}

impl Fill for HistoryEntry {
    fn price(&self) -> f64 {
        self.price
    }
    fn volume(&self) -> f64 {
        self.volume
    }
    fn funds(&self) -> f64 {
        self.funds
    }
}

impl Fill for Trade {
    fn price(&self) -> f64 {
        self.price
    }
    fn volume(&self) -> f64 {
        self.volume
    }
    fn funds(&self) -> f64 {
        self.funds
    }
}

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

fn min_of<T: Fill>(fills: &[T], key: impl Fn(&T) -> f64) -> f64 {
    fills.iter().map(key).reduce(f64::min).unwrap_or(0.0)
}

fn max_of<T: Fill>(fills: &[T], key: impl Fn(&T) -> f64) -> f64 {
    fills.iter().map(key).reduce(f64::max).unwrap_or(0.0)
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

pub fn sum_volume<T: Fill>(fills: &[T]) -> f64 {
    fills.iter().map(Fill::volume).sum()
}

pub fn sum_funds<T: Fill>(fills: &[T]) -> f64 {
    fills.iter().map(Fill::funds).sum()
}

pub fn min_price<T: Fill>(fills: &[T]) -> f64 {
    min_of(fills, T::price)
}

pub fn max_price<T: Fill>(fills: &[T]) -> f64 {
    max_of(fills, T::price)
}

pub fn min_volume<T: Fill>(fills: &[T]) -> f64 {
    min_of(fills, T::volume)
}

pub fn max_volume<T: Fill>(fills: &[T]) -> f64 {
    max_of(fills, T::volume)
}

pub fn min_funds<T: Fill>(fills: &[T]) -> f64 {
    min_of(fills, T::funds)
}

pub fn max_funds<T: Fill>(fills: &[T]) -> f64 {
    max_of(fills, T::funds)
}

/// Volume-weighted average price: total funds over total volume.
pub fn avg_price<T: Fill>(fills: &[T]) -> f64 {
    let volume = sum_volume(fills);
    if volume == 0.0 {
        return f64::NAN;
    }
    sum_funds(fills) / volume
}

/// Mean volume per deal.
pub fn avg_volume<T: Fill>(fills: &[T]) -> f64 {
    mean(sum_volume(fills), fills.len())
}

/// Mean funds per deal.
pub fn avg_funds<T: Fill>(fills: &[T]) -> f64 {
    mean(sum_funds(fills), fills.len())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Min / average / max of one quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Every reducer applied to one list of deals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub sum_volume: f64,
    pub sum_funds: f64,
    pub price: Spread,
    pub volume: Spread,
    pub funds: Spread,
}

impl Summary {
    pub fn of<T: Fill>(fills: &[T]) -> Self {
        Summary {
            count: fills.len(),
            sum_volume: sum_volume(fills),
            sum_funds: sum_funds(fills),
            price: Spread {
                min: min_price(fills),
                avg: avg_price(fills),
                max: max_price(fills),
            },
            volume: Spread {
                min: min_volume(fills),
                avg: avg_volume(fills),
                max: max_volume(fills),
            },
            funds: Spread {
                min: min_funds(fills),
                avg: avg_funds(fills),
                max: max_funds(fills),
            },
        }
    }
}

/// Cumulative position after each deal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunningTotal {
    pub cum_volume: f64,
    pub cum_funds: f64,
    /// `cum_funds / cum_volume`, NaN while no volume has accumulated.
    pub avg_price: f64,
}

/// Running totals, one per deal, in input order.
pub fn running_totals<T: Fill>(fills: &[T]) -> Vec<RunningTotal> {
    let mut cum_volume = 0.0;
    let mut cum_funds = 0.0;
    fills
        .iter()
        .map(|fill| {
            cum_volume += fill.volume();
            cum_funds += fill.funds();
            RunningTotal {
                cum_volume,
                cum_funds,
                avg_price: if cum_volume == 0.0 {
                    f64::NAN
                } else {
                    cum_funds / cum_volume
                },
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn deal(price: f64, volume: f64) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            price,
            volume,
            funds: price * volume,
            market: "btcuah".into(),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input() {
        let none: [HistoryEntry; 0] = [];
        assert_eq!(min_price(&none), 0.0);
        assert_eq!(max_price(&none), 0.0);
        assert_eq!(min_funds(&none), 0.0);
        assert_eq!(sum_volume(&none), 0.0);
        assert!(avg_price(&none).is_nan());
        assert!(avg_volume(&none).is_nan());
        assert!(avg_funds(&none).is_nan());
    }

    #[test]
    fn single_deal_collapses() {
        let one = [deal(10.0, 1.0)];
        let s = Summary::of(&one);
        assert_eq!(s.count, 1);
        for spread in [s.price, s.volume, s.funds] {
            assert_eq!(spread.min, spread.max);
            assert_eq!(spread.min, spread.avg);
        }
        assert_eq!(s.volume.avg, s.sum_volume);
        assert_eq!(s.funds.avg, s.sum_funds);
    }

    #[test]
    fn extremes_and_averages() {
        let h = [deal(10.0, 2.0), deal(12.0, 1.0), deal(8.0, 1.0)];
        assert_eq!(min_price(&h), 8.0);
        assert_eq!(max_price(&h), 12.0);
        assert_eq!(min_volume(&h), 1.0);
        assert_eq!(max_volume(&h), 2.0);
        assert_eq!(sum_volume(&h), 4.0);
        assert_eq!(sum_funds(&h), 40.0);
        assert_eq!(avg_price(&h), 10.0);
        assert_eq!(avg_volume(&h), 4.0 / 3.0);
    }

    #[test]
    fn avg_price_zero_volume_is_nan() {
        let h = [deal(10.0, 0.0)];
        assert!(avg_price(&h).is_nan());
        assert_eq!(avg_volume(&h), 0.0);
    }

    #[test]
    fn running_totals_accumulate() {
        let h = [deal(10.0, 1.0), deal(20.0, 1.0)];
        let rows = running_totals(&h);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].avg_price, 10.0);
        assert_eq!(rows[1].cum_volume, 2.0);
        assert_eq!(rows[1].cum_funds, 30.0);
        assert_eq!(rows[1].avg_price, 15.0);
    }
}
