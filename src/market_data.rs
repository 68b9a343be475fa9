use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed candle from the external data feed. Chronologically ordered
/// and immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trade direction shared by pivots, order blocks, gaps and signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

/// Rolling candle store, bounded to `max_len` with the oldest dropped first.
#[derive(Debug, Clone)]
pub struct CandleHistory {
    candles: Vec<Candle>,
    max_len: usize,
}

impl CandleHistory {
    pub fn new(max_len: usize) -> Self {
        Self {
            candles: Vec::new(),
            max_len,
        }
    }

    pub fn from_candles(candles: Vec<Candle>, max_len: usize) -> Self {
        let mut history = Self::new(max_len);
        for candle in candles {
            history.push(candle);
        }
        history
    }

    pub fn push(&mut self, candle: Candle) {
        self.candles.push(candle);
        if self.candles.len() > self.max_len {
            let excess = self.candles.len() - self.max_len;
            self.candles.drain(0..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

/// Wilder's Average True Range over the last `period` true ranges.
///
/// Returns `None` when fewer than `period + 1` candles are available; true
/// range needs the previous close.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| {
            let prev_close = pair[0].close;
            let candle = &pair[1];
            (candle.high - candle.low)
                .max((candle.high - prev_close).abs())
                .max((candle.low - prev_close).abs())
        })
        .collect();

    // Seed with the simple mean of the first window, then smooth.
    let mut atr = true_ranges[..period].iter().sum::<f64>() / period as f64;
    for tr in &true_ranges[period..] {
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
    }

    Some(atr)
}
