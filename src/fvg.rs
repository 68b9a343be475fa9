//! Fair value gap detection: three-candle price voids left by rapid moves.

use crate::market_data::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    pub top: f64,
    pub bottom: f64,
    pub index: usize,
    pub direction: Direction,
}

/// Detect three-candle gaps wider than `min_gap`.
///
/// A bullish gap exists at `i` when `low[i+1]` clears `high[i-1]` by more than
/// `min_gap`, leaving an untouched void between the outer candles; bearish
/// mirrors below. Both directions are checked per index. Series shorter than
/// five candles yield no gaps.
pub fn detect_fvgs(highs: &[f64], lows: &[f64], min_gap: f64) -> Vec<FairValueGap> {
    let mut gaps = Vec::new();

    let n = highs.len().min(lows.len());
    if n < 5 {
        return gaps;
    }

    for i in 1..n - 1 {
        if lows[i + 1] > highs[i - 1] + min_gap {
            gaps.push(FairValueGap {
                top: lows[i + 1],
                bottom: highs[i - 1],
                index: i,
                direction: Direction::Buy,
            });
        }
        if highs[i + 1] < lows[i - 1] - min_gap {
            gaps.push(FairValueGap {
                top: lows[i - 1],
                bottom: highs[i + 1],
                index: i,
                direction: Direction::Sell,
            });
        }
    }

    gaps
}
