//! Full-cycle test: candles -> detectors -> range analysis -> confluence ->
//! sizing, over a hand-built series containing one bullish setup.

use chrono::{TimeZone, Utc};
use smc_engine::config::EngineConfig;
use smc_engine::confluence::ConfluenceSignalGenerator;
use smc_engine::market_data::{Candle, CandleHistory};
use smc_engine::range::RangeAnalyzer;
use smc_engine::risk::RiskSizer;
use smc_engine::{detect_fvgs, detect_order_blocks, detect_pivots};

// ATR is a precomputed input from the external indicator layer.
const ATR: f64 = 0.0010;

/// Twelve candles: a swing low at index 2, an order block at index 5 whose
/// successor breaks out and leaves a fair value gap, then a retracement back
/// into the block by the final close.
fn setup_series() -> CandleHistory {
    let bars = [
        // (high, low, close)
        (1.1006, 1.1000, 1.1003),
        (1.1004, 1.0998, 1.1001),
        (1.0998, 1.0992, 1.0995),
        (1.1002, 1.0996, 1.0999),
        (1.1005, 1.0999, 1.1002),
        (1.1000, 1.0994, 1.0997),
        (1.1040, 1.0996, 1.1035),
        (1.1038, 1.1012, 1.1020),
        (1.1022, 1.1008, 1.1012),
        (1.1014, 1.1000, 1.1004),
        (1.1008, 1.0995, 1.0999),
        (1.1000, 1.0993, 1.0996),
    ];

    let candles = bars
        .iter()
        .enumerate()
        .map(|(i, &(high, low, close))| Candle {
            timestamp: Utc
                .timestamp_opt(1_700_000_000 + i as i64 * 3600, 0)
                .unwrap(),
            open: (high + low) / 2.0,
            high,
            low,
            close,
            volume: 100.0 + i as f64,
        })
        .collect();

    CandleHistory::from_candles(candles, 1000)
}

#[test]
fn full_cycle_produces_one_sized_buy_signal() {
    let config = EngineConfig::default();
    let history = setup_series();

    let highs = history.highs();
    let lows = history.lows();
    let closes = history.closes();
    let volumes = history.volumes();
    let current_price = history.last_close().unwrap();

    let pivots = detect_pivots(&highs, &lows);
    assert_eq!(pivots.buy.len(), 2, "swing lows at indices 2 and 5");
    assert_eq!(pivots.buy[0].price, 1.0992);
    assert_eq!(pivots.sell.len(), 1, "breakout high at index 6");
    assert_eq!(pivots.sell[0].price, 1.1040);

    let order_blocks =
        detect_order_blocks(&highs, &lows, &closes, config.analysis.breakout_factor);
    assert_eq!(order_blocks.bullish.len(), 1);
    assert_eq!(order_blocks.bullish[0].index, 5);
    assert!(order_blocks.bearish.is_empty());

    let fvgs = detect_fvgs(&highs, &lows, config.analysis.fvg_min_gap);
    assert_eq!(fvgs.len(), 1, "the breakout leaves one bullish gap");
    assert_eq!(fvgs[0].bottom, 1.1000);

    let range_analyzer = RangeAnalyzer::new(&config.analysis);
    let volume_range = range_analyzer.classify_by_volume(&highs, &lows, &volumes);
    assert!(
        volume_range.is_none(),
        "a 48 pip window is no compression range"
    );
    let choch_range = range_analyzer
        .classify_by_choch(&pivots)
        .expect("46 pips between opposing pivots is a valid range");
    assert_eq!(choch_range.upper_bound, 1.1040);
    assert_eq!(choch_range.lower_bound, 1.0994);

    let generator = ConfluenceSignalGenerator::new(&config.analysis);
    let signals = generator.generate(
        &order_blocks,
        &fvgs,
        &pivots,
        volume_range.as_ref(),
        current_price,
        ATR,
    );
    assert_eq!(signals.buy.len(), 1, "OB + gap + pivot reaches the minimum");
    assert!(signals.sell.is_empty());

    let signal = &signals.buy[0];
    assert_eq!(signal.confluence_score, 3);
    assert_eq!(signal.entry_price, 1.0994);
    // Stop re-anchored below the first matching buy pivot.
    assert!((signal.stop_loss - (1.0992 - 0.5 * ATR)).abs() < 1e-12);

    let mut sizer = RiskSizer::new(config.risk.clone());
    let lots = sizer
        .size_position(
            config.instrument.account_balance,
            signal.entry_price,
            signal.stop_loss,
            ATR,
        )
        .lots();
    // 2% of 10000 at 0.9x volatility over a 7 pip stop.
    assert_eq!(lots, 2.57);
    assert_eq!(sizer.volatility_multiplier(), 0.9);
}
