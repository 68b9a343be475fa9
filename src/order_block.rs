//! Order block detection: the last candle before a strong directional
//! breakout, treated as a likely institutional entry zone.

use crate::market_data::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub high: f64,
    pub low: f64,
    pub index: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBlocks {
    pub bullish: Vec<OrderBlock>,
    pub bearish: Vec<OrderBlock>,
}

/// Flag candles whose successor closes at least `breakout_factor` beyond
/// their extreme.
///
/// Bullish: `close[i+1] > high[i] * (1 + breakout_factor)`. Bearish mirrors
/// below the low. The two conditions are evaluated independently; contrived
/// data may flag both directions at one index and that is accepted. Series
/// shorter than five candles yield no blocks.
pub fn detect_order_blocks(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    breakout_factor: f64,
) -> OrderBlocks {
    let mut blocks = OrderBlocks::default();

    let n = highs.len().min(lows.len()).min(closes.len());
    if n < 5 {
        return blocks;
    }

    for i in 1..n - 1 {
        if closes[i + 1] > highs[i] * (1.0 + breakout_factor) {
            blocks.bullish.push(OrderBlock {
                high: highs[i],
                low: lows[i],
                index: i,
                direction: Direction::Buy,
            });
        }
        if closes[i + 1] < lows[i] * (1.0 - breakout_factor) {
            blocks.bearish.push(OrderBlock {
                high: highs[i],
                low: lows[i],
                index: i,
                direction: Direction::Sell,
            });
        }
    }

    blocks
}
