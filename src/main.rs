use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::fs;

use smc_engine::confluence::ConfluenceSignalGenerator;
use smc_engine::config::EngineConfig;
use smc_engine::market_data::{atr, Candle, CandleHistory};
use smc_engine::range::RangeAnalyzer;
use smc_engine::risk::{RiskSizer, SizingOutcome};
use smc_engine::{detect_fvgs, detect_order_blocks, detect_pivots};

/// Run one analysis cycle over a candle file and log what the engine sees.
/// The live feed, order submission and polling loop are external concerns;
/// this binary stands in for them with a file-based feed.
fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG not set
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();
    info!("Starting market-structure analysis engine");

    let args: Vec<String> = env::args().collect();
    let candle_file = args.get(1).map(String::as_str).unwrap_or("candles.json");
    let config_file = args.get(2).map(String::as_str).unwrap_or("config.json");

    let config = EngineConfig::load_from_file(config_file)?;
    info!(
        "Analyzing {} with confluence minimum {}",
        config.instrument.symbol, config.analysis.min_confluence_score
    );

    let raw = fs::read_to_string(candle_file)
        .with_context(|| format!("cannot read candle file: {}", candle_file))?;
    let candles: Vec<Candle> =
        serde_json::from_str(&raw).with_context(|| format!("invalid candle file: {}", candle_file))?;
    let history = CandleHistory::from_candles(candles, config.instrument.history_len);
    info!("Loaded {} candles from {}", history.len(), candle_file);

    let Some(current_price) = history.last_close() else {
        warn!("Candle file is empty, nothing to analyze");
        return Ok(());
    };
    let Some(current_atr) = atr(history.candles(), config.analysis.atr_period) else {
        warn!(
            "Not enough candles for a {}-period ATR, nothing to analyze",
            config.analysis.atr_period
        );
        return Ok(());
    };
    info!("Current price {:.5}, ATR {:.5}", current_price, current_atr);

    let highs = history.highs();
    let lows = history.lows();
    let closes = history.closes();
    let volumes = history.volumes();

    let pivots = detect_pivots(&highs, &lows);
    let order_blocks = detect_order_blocks(&highs, &lows, &closes, config.analysis.breakout_factor);
    let fvgs = detect_fvgs(&highs, &lows, config.analysis.fvg_min_gap);
    info!(
        "Structure: {} buy / {} sell pivots, {} bullish / {} bearish order blocks, {} gaps",
        pivots.buy.len(),
        pivots.sell.len(),
        order_blocks.bullish.len(),
        order_blocks.bearish.len(),
        fvgs.len()
    );

    let range_analyzer = RangeAnalyzer::new(&config.analysis);
    let volume_range = range_analyzer.classify_by_volume(&highs, &lows, &volumes);
    match &volume_range {
        Some(range) => info!(
            "Volume range {:?} between {:.5} and {:.5}",
            range.kind, range.lower_bound, range.upper_bound
        ),
        None => info!("No volume-compressed range in the window"),
    }
    if let Some(range) = range_analyzer.classify_by_choch(&pivots) {
        info!(
            "CHoCH range between {:.5} and {:.5} ({:.1} pips)",
            range.lower_bound,
            range.upper_bound,
            range.size() / config.risk.pip_size
        );
    }

    let generator = ConfluenceSignalGenerator::new(&config.analysis);
    let signals = generator.generate(
        &order_blocks,
        &fvgs,
        &pivots,
        volume_range.as_ref(),
        current_price,
        current_atr,
    );

    if signals.is_empty() {
        info!("No signals this cycle");
        return Ok(());
    }

    let mut sizer = RiskSizer::new(config.risk.clone());
    let balance = config.instrument.account_balance;
    for signal in signals.buy.iter().chain(signals.sell.iter()) {
        let outcome = sizer.size_position(
            balance,
            signal.entry_price,
            signal.stop_loss,
            current_atr,
        );
        match outcome {
            SizingOutcome::Lots(lots) if lots > 0.0 => info!(
                "{:?} signal (score {}): entry {:.5}, stop {:.5}, target {:.5} -> {:.2} lots [{}]",
                signal.direction,
                signal.confluence_score,
                signal.entry_price,
                signal.stop_loss,
                signal.take_profit,
                lots,
                signal.rationale
            ),
            SizingOutcome::Lots(_) => warn!(
                "{:?} signal sized to zero lots, skipping",
                signal.direction
            ),
            SizingOutcome::Halted => warn!("Daily drawdown cap reached, skipping signal"),
            SizingOutcome::DegenerateStop => {
                warn!("Signal carried a degenerate stop, skipping")
            }
        }
    }

    Ok(())
}
