//! Drawdown-aware position sizing.
//!
//! The sizer is the only stateful component in the engine: it accumulates
//! realized daily losses and throttles risk as the daily cap approaches.
//! Callers must serialize `record_trade_result` and `reset_day` with respect
//! to `size_position` within a trading process; a single sequential control
//! loop satisfies that without any locking.

use crate::config::RiskConfig;
use log::{debug, warn};

// ATR levels (in price units) at which sizing steps down.
const HIGH_VOLATILITY_ATR: f64 = 0.0010;
const ELEVATED_VOLATILITY_ATR: f64 = 0.0005;

/// Result of a sizing request. Zero-risk outcomes are ordinary values, not
/// errors; only degenerate geometry is a rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingOutcome {
    /// Position size in lots, rounded to two decimals. Callers must still
    /// reject non-positive values (a stop so wide the size rounds to zero).
    Lots(f64),
    /// Daily drawdown cap reached; no further trades until `reset_day`.
    Halted,
    /// Zero, negative or non-finite stop distance. Never silently divided.
    DegenerateStop,
}

impl SizingOutcome {
    pub fn lots(&self) -> f64 {
        match self {
            SizingOutcome::Lots(lots) => *lots,
            _ => 0.0,
        }
    }
}

/// Day-scoped sizing state. Losses are tracked as fractions of account
/// balance so they share units with `max_daily_drawdown`.
#[derive(Debug, Clone)]
pub struct RiskSizer {
    config: RiskConfig,
    cumulative_daily_loss: f64,
    volatility_multiplier: f64,
}

impl RiskSizer {
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            cumulative_daily_loss: 0.0,
            volatility_multiplier: 1.0,
        }
    }

    /// Compute the lot size for a candidate trade.
    ///
    /// Per-trade risk shrinks linearly as the daily loss approaches the cap,
    /// and steps down further in higher-volatility regimes. Lots follow from
    /// the monetary risk budget divided by the per-lot loss at the stop.
    pub fn size_position(
        &mut self,
        balance: f64,
        entry: f64,
        stop: f64,
        atr: f64,
    ) -> SizingOutcome {
        let stop_distance = (entry - stop).abs();
        if !stop_distance.is_finite() || stop_distance <= 0.0 {
            warn!(
                "rejecting degenerate stop geometry: entry {} stop {}",
                entry, stop
            );
            return SizingOutcome::DegenerateStop;
        }

        if self.is_halted() {
            return SizingOutcome::Halted;
        }

        let drawdown_factor = 1.0 - self.cumulative_daily_loss / self.config.max_daily_drawdown;
        let adjusted_risk = self.config.max_risk_per_trade * drawdown_factor.max(0.0);

        self.volatility_multiplier = if atr > HIGH_VOLATILITY_ATR {
            0.8
        } else if atr > ELEVATED_VOLATILITY_ATR {
            0.9
        } else {
            1.0
        };

        let risk_amount = balance * adjusted_risk * self.volatility_multiplier;
        let loss_per_lot = stop_distance * self.config.pip_value / self.config.pip_size;
        let lots = (risk_amount / loss_per_lot * 100.0).round() / 100.0;

        debug!(
            "sized position: risk {:.2} at {:.1}x volatility, {:.4} stop distance -> {:.2} lots",
            risk_amount, self.volatility_multiplier, stop_distance, lots
        );

        SizingOutcome::Lots(lots)
    }

    /// Accumulate a completed trade's result. Only losses (negative `pnl`,
    /// as a fraction of balance) move the daily drawdown.
    pub fn record_trade_result(&mut self, pnl: f64) {
        if pnl < 0.0 {
            self.cumulative_daily_loss += pnl.abs();
            if self.is_halted() {
                warn!(
                    "daily drawdown cap reached ({:.4} >= {:.4}); sizing halted until day reset",
                    self.cumulative_daily_loss, self.config.max_daily_drawdown
                );
            }
        }
    }

    /// Explicit day-boundary reset. Never triggered automatically.
    pub fn reset_day(&mut self) {
        self.cumulative_daily_loss = 0.0;
        self.volatility_multiplier = 1.0;
    }

    pub fn is_halted(&self) -> bool {
        self.cumulative_daily_loss >= self.config.max_daily_drawdown
    }

    pub fn cumulative_daily_loss(&self) -> f64 {
        self.cumulative_daily_loss
    }

    pub fn volatility_multiplier(&self) -> f64 {
        self.volatility_multiplier
    }
}
