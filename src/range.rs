//! Range classification: accumulation/distribution windows from volume, and
//! CHoCH-bounded range validation from swing pivots.

use crate::config::AnalysisConfig;
use crate::structure::SwingPivots;
use serde::{Deserialize, Serialize};

pub const VOLUME_PROFILE_BUCKETS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeKind {
    Accumulation,
    Distribution,
}

/// Volume distribution across equal-width price buckets inside a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// Lower edge of each bucket, ascending.
    pub price_levels: Vec<f64>,
    pub volume_distribution: Vec<f64>,
}

/// A validated consolidation range. `upper_bound > lower_bound` always holds;
/// windows that fail validation produce no `Range` at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Set by the volume classifier; the CHoCH strategy bounds a range
    /// without classifying it.
    pub kind: Option<RangeKind>,
    pub volume_profile: Option<VolumeProfile>,
}

impl Range {
    pub fn size(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Two independent range-classification strategies sharing the `Range` shape.
#[derive(Debug, Clone)]
pub struct RangeAnalyzer {
    range_threshold: f64,
    min_range_size: f64,
    max_range_size: f64,
}

impl RangeAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            range_threshold: config.range_threshold,
            min_range_size: config.min_range_size,
            max_range_size: config.max_range_size,
        }
    }

    /// Classify a price window as an accumulation or distribution range.
    ///
    /// The window qualifies when its total span stays within
    /// `range_threshold` (inclusive). Accumulation means the mean of the last
    /// three volume samples exceeds the mean of the whole window. A qualifying
    /// range carries a volume profile over ten equal-width price buckets.
    pub fn classify_by_volume(
        &self,
        highs: &[f64],
        lows: &[f64],
        volumes: &[f64],
    ) -> Option<Range> {
        if highs.is_empty() || lows.is_empty() || volumes.is_empty() {
            return None;
        }

        let upper = highs.iter().cloned().fold(f64::MIN, f64::max);
        let lower = lows.iter().cloned().fold(f64::MAX, f64::min);
        if upper - lower > self.range_threshold || upper <= lower {
            return None;
        }

        let avg_volume = volumes.iter().sum::<f64>() / volumes.len() as f64;
        let tail = &volumes[volumes.len().saturating_sub(3)..];
        let recent_volume = tail.iter().sum::<f64>() / tail.len() as f64;
        let kind = if recent_volume > avg_volume {
            RangeKind::Accumulation
        } else {
            RangeKind::Distribution
        };

        let profile = volume_profile(highs, lows, volumes, lower, upper);

        Some(Range {
            lower_bound: lower,
            upper_bound: upper,
            kind: Some(kind),
            volume_profile: Some(profile),
        })
    }

    /// Bound a range by the most recent opposing CHoCH pivots.
    ///
    /// Requires at least one pivot in each direction; the spread between the
    /// last sell pivot and the last buy pivot must fall inside
    /// `[min_range_size, max_range_size]`.
    pub fn classify_by_choch(&self, pivots: &SwingPivots) -> Option<Range> {
        let upper = pivots.sell.last()?.price;
        let lower = pivots.buy.last()?.price;

        let size = upper - lower;
        if size < self.min_range_size || size > self.max_range_size {
            return None;
        }

        Some(Range {
            lower_bound: lower,
            upper_bound: upper,
            kind: None,
            volume_profile: None,
        })
    }
}

/// Partition `[lower, upper]` into equal-width buckets and sum the volume of
/// candles whose `[low, high)` interval falls inside each bucket. Candles are
/// assigned by membership, never split pro-rata across buckets.
fn volume_profile(
    highs: &[f64],
    lows: &[f64],
    volumes: &[f64],
    lower: f64,
    upper: f64,
) -> VolumeProfile {
    let width = (upper - lower) / VOLUME_PROFILE_BUCKETS as f64;
    let mut price_levels = Vec::with_capacity(VOLUME_PROFILE_BUCKETS);
    let mut volume_distribution = vec![0.0; VOLUME_PROFILE_BUCKETS];

    for bucket in 0..VOLUME_PROFILE_BUCKETS {
        let bucket_low = lower + bucket as f64 * width;
        let bucket_high = bucket_low + width;
        price_levels.push(bucket_low);

        let n = highs.len().min(lows.len()).min(volumes.len());
        for i in 0..n {
            if lows[i] >= bucket_low && highs[i] < bucket_high {
                volume_distribution[bucket] += volumes[i];
            }
        }
    }

    VolumeProfile {
        price_levels,
        volume_distribution,
    }
}
