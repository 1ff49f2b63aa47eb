//! Order book depth: running totals truncated at a volume or funds ceiling.
//!
//! Levels are walked strictly in the order given. Asks are expected lowest
//! price first and bids highest price first, which is how the server sends
//! them; nothing here sorts.

use crate::types::{Order, OrderBook};

/// Cap on how far into the book to walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ceiling {
    /// Walk everything.
    Unlimited,
    /// Stop once this much base currency has been accumulated.
    Volume(f64),
    /// Stop once this much quote currency has been accumulated.
    Funds(f64),
}

impl Ceiling {
    /// Build a ceiling from a raw limit and a funds flag. A limit `<= 0` means unlimited.
    pub fn new(limit: f64, in_funds: bool) -> Self {
        if limit <= 0.0 || limit.is_nan() {
            Ceiling::Unlimited
        } else if in_funds {
            Ceiling::Funds(limit)
        } else {
            Ceiling::Volume(limit)
        }
    }
}

/// One price level fed to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Level {
    pub price: f64,
    pub volume: f64,
}

impl From<&Order> for Level {
    /// An order book entry contributes what is still open.
    fn from(order: &Order) -> Self {
        Level {
            price: order.price,
            volume: order.remaining_volume,
        }
    }
}

/// One emitted row of the depth walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthRow {
    pub price: f64,
    /// Volume taken from this level (clipped on the last row).
    pub volume: f64,
    /// `volume * price`.
    pub funds: f64,
    /// `cum_funds / cum_volume` through this row.
    pub avg_price: f64,
    pub cum_volume: f64,
    pub cum_funds: f64,
}

/// Walk `levels`, accumulating volume and funds until `ceiling` is reached.
///
/// The level that reaches or crosses the ceiling is clipped to exactly the
/// remainder and is the last row emitted. An empty input yields no rows.
pub fn aggregate<I>(levels: I, ceiling: Ceiling) -> Vec<DepthRow>
where
    I: IntoIterator<Item = Level>,
{
    let mut rows = Vec::new();
    let mut cum_volume = 0.0_f64;
    let mut cum_funds = 0.0_f64;

    for level in levels {
        let mut volume = level.volume;
        let mut last = false;

        match ceiling {
            Ceiling::Volume(limit) if limit > 0.0 && limit <= cum_volume + volume => {
                volume = limit - cum_volume;
                last = true;
            }
            Ceiling::Funds(limit) if limit > 0.0 && limit <= cum_funds + volume * level.price => {
                volume = if level.price > 0.0 {
                    (limit - cum_funds) / level.price
                } else {
                    0.0
                };
                last = true;
            }
            _ => {}
        }

        let funds = volume * level.price;
        cum_volume += volume;
        cum_funds += funds;
        rows.push(DepthRow {
            price: level.price,
            volume,
            funds,
            avg_price: if cum_volume > 0.0 {
                cum_funds / cum_volume
            } else {
                0.0
            },
            cum_volume,
            cum_funds,
        });

        if last {
            break;
        }
    }

    rows
}

impl OrderBook {
    /// Depth walk over the asks, cheapest first.
    pub fn ask_depth(&self, ceiling: Ceiling) -> Vec<DepthRow> {
        aggregate(self.asks.iter().map(Level::from), ceiling)
    }

    /// Depth walk over the bids, most generous first.
    pub fn bid_depth(&self, ceiling: Ceiling) -> Vec<DepthRow> {
        aggregate(self.bids.iter().map(Level::from), ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(pairs: &[(f64, f64)]) -> Vec<Level> {
        pairs
            .iter()
            .map(|&(price, volume)| Level { price, volume })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unlimited_emits_everything() {
        let rows = aggregate(levels(&[(10.0, 5.0), (11.0, 5.0)]), Ceiling::Unlimited);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cum_volume, 10.0);
        assert_eq!(rows[1].cum_funds, 105.0);
        assert!(approx(rows[1].avg_price, 10.5));
    }

    #[test]
    fn volume_ceiling_clips_last_level() {
        let rows = aggregate(levels(&[(10.0, 5.0), (11.0, 5.0)]), Ceiling::Volume(7.0));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].volume, 5.0);
        assert_eq!(rows[0].cum_volume, 5.0);
        assert_eq!(rows[1].volume, 2.0);
        assert_eq!(rows[1].cum_volume, 7.0);
        assert_eq!(rows[1].funds, 22.0);
        assert_eq!(rows[1].cum_funds, 72.0);
    }

    #[test]
    fn funds_ceiling_clips_in_volume_units() {
        let rows = aggregate(levels(&[(10.0, 5.0), (11.0, 5.0)]), Ceiling::Funds(60.0));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].funds, 50.0);
        assert!(approx(rows[1].volume, 10.0 / 11.0));
        assert!(approx(rows[1].cum_funds, 60.0));
    }

    #[test]
    fn ceiling_inside_first_level() {
        let rows = aggregate(levels(&[(10.0, 5.0), (11.0, 5.0)]), Ceiling::Volume(1.5));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume, 1.5);
        assert_eq!(rows[0].avg_price, 10.0);
    }

    #[test]
    fn ceiling_exactly_on_level_boundary_stops_there() {
        let rows = aggregate(
            levels(&[(10.0, 5.0), (11.0, 5.0), (12.0, 5.0)]),
            Ceiling::Volume(10.0),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].volume, 5.0);
    }

    #[test]
    fn ceiling_beyond_book_emits_everything() {
        let rows = aggregate(levels(&[(10.0, 5.0)]), Ceiling::Funds(1e9));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume, 5.0);
    }

    #[test]
    fn empty_book_emits_nothing() {
        assert!(aggregate(Vec::new(), Ceiling::Volume(7.0)).is_empty());
        assert!(OrderBook::default().ask_depth(Ceiling::Unlimited).is_empty());
    }

    #[test]
    fn zero_volume_level_keeps_average_finite() {
        let rows = aggregate(levels(&[(10.0, 0.0), (11.0, 1.0)]), Ceiling::Unlimited);
        assert_eq!(rows[0].avg_price, 0.0);
        assert_eq!(rows[1].avg_price, 11.0);
    }

    #[test]
    fn new_maps_non_positive_limits_to_unlimited() {
        assert_eq!(Ceiling::new(0.0, true), Ceiling::Unlimited);
        assert_eq!(Ceiling::new(-3.0, false), Ceiling::Unlimited);
        assert_eq!(Ceiling::new(f64::NAN, false), Ceiling::Unlimited);
        assert_eq!(Ceiling::new(2.0, false), Ceiling::Volume(2.0));
        assert_eq!(Ceiling::new(2.0, true), Ceiling::Funds(2.0));
    }

    #[test]
    fn bids_walk_in_server_order() {
        let rows = aggregate(levels(&[(11.0, 1.0), (10.0, 1.0)]), Ceiling::Unlimited);
        assert_eq!(rows[0].price, 11.0);
        assert_eq!(rows[1].price, 10.0);
    }
}
