//! Confluence signal generation: fuses order blocks, fair value gaps, swing
//! pivots and range classification into scored trade candidates.
//!
//! Scoring is intentionally additive and threshold-gated rather than weighted
//! so the admission policy stays auditable: every contributing factor is
//! counted in the rationale string. Proximity gates scale with ATR instead of
//! a fixed pip distance, so the same tolerance tracks quiet and volatile
//! markets alike.

use crate::config::AnalysisConfig;
use crate::fvg::FairValueGap;
use crate::market_data::Direction;
use crate::order_block::OrderBlocks;
use crate::range::{Range, RangeKind};
use crate::structure::SwingPivots;
use log::debug;
use serde::{Deserialize, Serialize};

// ATR multiples for the proximity gates and stop placement.
const OB_PROXIMITY_ATR: f64 = 0.5;
const FACTOR_PROXIMITY_ATR: f64 = 0.7;
const OB_STOP_ATR: f64 = 1.5;
const PIVOT_STOP_ATR: f64 = 0.5;
const REWARD_RISK_RATIO: f64 = 2.0;

/// A scored trade candidate. Ephemeral: produced once per analysis cycle and
/// consumed immediately by sizing/execution, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub confluence_score: u32,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    pub buy: Vec<Signal>,
    pub sell: Vec<Signal>,
}

impl Signals {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConfluenceSignalGenerator {
    min_confluence_score: u32,
}

impl ConfluenceSignalGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            min_confluence_score: config.min_confluence_score,
        }
    }

    /// Generate scored signals from the detector outputs for one cycle.
    ///
    /// Candidates are walked in order-block input order. Each bullish order
    /// block whose low sits within half an ATR of the current price starts at
    /// score 1 and gains a point per corroborating factor: a bullish gap near
    /// the block, a buy pivot near the block (which also re-anchors the stop
    /// below the pivot), and a volume range classified as accumulation. Only
    /// candidates at or above the configured minimum score are emitted; the
    /// sell side mirrors everything. Trade exclusivity across emitted signals
    /// belongs to the caller.
    pub fn generate(
        &self,
        order_blocks: &OrderBlocks,
        fvgs: &[FairValueGap],
        pivots: &SwingPivots,
        volume_range: Option<&Range>,
        current_price: f64,
        atr: f64,
    ) -> Signals {
        let mut signals = Signals::default();

        for ob in &order_blocks.bullish {
            if (current_price - ob.low).abs() >= atr * OB_PROXIMITY_ATR {
                continue;
            }

            let mut score = 1u32;
            let entry_price = ob.low;
            let mut stop_loss = ob.low - atr * OB_STOP_ATR;
            // Reward-to-risk is referenced off the initial block-based stop;
            // a later pivot override moves the stop but not the target.
            let take_profit = current_price + (current_price - stop_loss) * REWARD_RISK_RATIO;

            if fvgs
                .iter()
                .filter(|fvg| fvg.direction == Direction::Buy)
                .any(|fvg| (ob.low - fvg.bottom).abs() < atr * FACTOR_PROXIMITY_ATR)
            {
                score += 1;
            }

            if let Some(pivot) = pivots
                .buy
                .iter()
                .find(|p| (ob.low - p.price).abs() < atr * FACTOR_PROXIMITY_ATR)
            {
                score += 1;
                // CHoCH alignment takes precedence over the block-based stop.
                stop_loss = pivot.price - atr * PIVOT_STOP_ATR;
            }

            if matches!(volume_range, Some(r) if r.kind == Some(RangeKind::Accumulation)) {
                score += 1;
            }

            if score >= self.min_confluence_score {
                signals.buy.push(Signal {
                    direction: Direction::Buy,
                    entry_price,
                    stop_loss,
                    take_profit,
                    confluence_score: score,
                    rationale: format!("bullish OB + {} supporting factors", score - 1),
                });
            } else {
                debug!(
                    "bullish OB at index {} below confluence minimum ({} < {})",
                    ob.index, score, self.min_confluence_score
                );
            }
        }

        for ob in &order_blocks.bearish {
            if (current_price - ob.high).abs() >= atr * OB_PROXIMITY_ATR {
                continue;
            }

            let mut score = 1u32;
            let entry_price = ob.high;
            let mut stop_loss = ob.high + atr * OB_STOP_ATR;
            let take_profit = current_price - (stop_loss - current_price) * REWARD_RISK_RATIO;

            if fvgs
                .iter()
                .filter(|fvg| fvg.direction == Direction::Sell)
                .any(|fvg| (ob.high - fvg.top).abs() < atr * FACTOR_PROXIMITY_ATR)
            {
                score += 1;
            }

            if let Some(pivot) = pivots
                .sell
                .iter()
                .find(|p| (ob.high - p.price).abs() < atr * FACTOR_PROXIMITY_ATR)
            {
                score += 1;
                stop_loss = pivot.price + atr * PIVOT_STOP_ATR;
            }

            if matches!(volume_range, Some(r) if r.kind == Some(RangeKind::Distribution)) {
                score += 1;
            }

            if score >= self.min_confluence_score {
                signals.sell.push(Signal {
                    direction: Direction::Sell,
                    entry_price,
                    stop_loss,
                    take_profit,
                    confluence_score: score,
                    rationale: format!("bearish OB + {} supporting factors", score - 1),
                });
            } else {
                debug!(
                    "bearish OB at index {} below confluence minimum ({} < {})",
                    ob.index, score, self.min_confluence_score
                );
            }
        }

        signals
    }
}
