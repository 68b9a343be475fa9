//! Swing structure detection: local swing highs/lows confirmed as change of
//! character (CHoCH) pivots.

use crate::market_data::Direction;
use serde::{Deserialize, Serialize};

/// A confirmed swing point in the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPivot {
    pub price: f64,
    pub index: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingPivots {
    pub buy: Vec<SwingPivot>,
    pub sell: Vec<SwingPivot>,
}

impl SwingPivots {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// Detect swing pivots over parallel high/low arrays.
///
/// A buy pivot at `i` requires `low[i]` strictly below its two neighbors on
/// each side plus a higher low at `i + 1` confirming the turn; a flat bottom
/// does not qualify. Sell pivots mirror the condition on highs. Series shorter
/// than five candles yield no pivots.
pub fn detect_pivots(highs: &[f64], lows: &[f64]) -> SwingPivots {
    let mut pivots = SwingPivots::default();

    let n = highs.len().min(lows.len());
    if n < 5 {
        return pivots;
    }

    for i in 2..n - 2 {
        let low = lows[i];
        if low < lows[i - 1]
            && low < lows[i - 2]
            && low < lows[i + 1]
            && low < lows[i + 2]
            && lows[i + 1] > low
        {
            pivots.buy.push(SwingPivot {
                price: low,
                index: i,
                direction: Direction::Buy,
            });
        }

        let high = highs[i];
        if high > highs[i - 1]
            && high > highs[i - 2]
            && high > highs[i + 1]
            && high > highs[i + 2]
            && highs[i + 1] < high
        {
            pivots.sell.push(SwingPivot {
                price: high,
                index: i,
                direction: Direction::Sell,
            });
        }
    }

    pivots
}
