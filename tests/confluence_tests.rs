use smc_engine::config::AnalysisConfig;
use smc_engine::confluence::ConfluenceSignalGenerator;
use smc_engine::fvg::FairValueGap;
use smc_engine::market_data::Direction;
use smc_engine::order_block::{OrderBlock, OrderBlocks};
use smc_engine::range::{Range, RangeKind};
use smc_engine::structure::{SwingPivot, SwingPivots};

const CURRENT_PRICE: f64 = 1.1003;
const ATR: f64 = 0.0010;

fn generator() -> ConfluenceSignalGenerator {
    ConfluenceSignalGenerator::new(&AnalysisConfig::default())
}

fn bullish_ob() -> OrderBlocks {
    OrderBlocks {
        bullish: vec![OrderBlock {
            high: 1.1010,
            low: 1.1000,
            index: 1,
            direction: Direction::Buy,
        }],
        bearish: vec![],
    }
}

fn near_fvg() -> FairValueGap {
    FairValueGap {
        top: 1.1060,
        bottom: 1.1002,
        index: 2,
        direction: Direction::Buy,
    }
}

fn near_pivot() -> SwingPivot {
    SwingPivot {
        price: 1.0999,
        index: 3,
        direction: Direction::Buy,
    }
}

#[test]
fn lone_order_block_scores_one_and_is_not_emitted() {
    let signals = generator().generate(
        &bullish_ob(),
        &[],
        &SwingPivots::default(),
        None,
        CURRENT_PRICE,
        ATR,
    );
    assert!(signals.is_empty(), "score 1 must not clear a minimum of 3");
}

#[test]
fn fvg_and_pivot_confluence_emits_one_buy_with_pivot_stop() {
    let mut pivots = SwingPivots::default();
    pivots.buy.push(near_pivot());

    let signals = generator().generate(
        &bullish_ob(),
        &[near_fvg()],
        &pivots,
        None,
        CURRENT_PRICE,
        ATR,
    );
    assert_eq!(signals.buy.len(), 1);
    assert!(signals.sell.is_empty());

    let signal = signals.buy[0].clone();
    assert_eq!(signal.confluence_score, 3);
    assert_eq!(signal.entry_price, 1.1000);

    // The pivot overrides the block-based stop: 1.0999 - 0.5 * ATR.
    let pivot_stop = 1.0999 - 0.5 * ATR;
    let ob_stop = 1.1000 - 1.5 * ATR;
    assert!((signal.stop_loss - pivot_stop).abs() < 1e-12);
    assert!((signal.stop_loss - ob_stop).abs() > 1e-6);

    // Take profit stays referenced off the original block-based stop.
    let expected_tp = CURRENT_PRICE + (CURRENT_PRICE - ob_stop) * 2.0;
    assert!((signal.take_profit - expected_tp).abs() < 1e-12);

    assert!(signal.rationale.contains("2 supporting factors"));
}

#[test]
fn accumulation_range_counts_as_a_factor() {
    let mut pivots = SwingPivots::default();
    pivots.buy.push(near_pivot());
    let range = Range {
        lower_bound: 1.0995,
        upper_bound: 1.1010,
        kind: Some(RangeKind::Accumulation),
        volume_profile: None,
    };

    // OB + pivot + accumulation = 3, no FVG needed.
    let signals = generator().generate(
        &bullish_ob(),
        &[],
        &pivots,
        Some(&range),
        CURRENT_PRICE,
        ATR,
    );
    assert_eq!(signals.buy.len(), 1);
    assert_eq!(signals.buy[0].confluence_score, 3);

    // A distribution range does not corroborate a buy.
    let distribution = Range {
        kind: Some(RangeKind::Distribution),
        ..range
    };
    let signals = generator().generate(
        &bullish_ob(),
        &[],
        &pivots,
        Some(&distribution),
        CURRENT_PRICE,
        ATR,
    );
    assert!(signals.is_empty());
}

#[test]
fn order_block_outside_proximity_gate_is_skipped() {
    // |current - low| = 0.0008 >= 0.5 * ATR.
    let signals = generator().generate(
        &bullish_ob(),
        &[near_fvg()],
        &SwingPivots::default(),
        None,
        1.1008,
        ATR,
    );
    assert!(signals.is_empty());
}

#[test]
fn sell_side_mirrors_with_bearish_structure() {
    let order_blocks = OrderBlocks {
        bullish: vec![],
        bearish: vec![OrderBlock {
            high: 1.1006,
            low: 1.0996,
            index: 1,
            direction: Direction::Sell,
        }],
    };
    let fvg = FairValueGap {
        top: 1.1004,
        bottom: 1.0950,
        index: 2,
        direction: Direction::Sell,
    };
    let mut pivots = SwingPivots::default();
    pivots.sell.push(SwingPivot {
        price: 1.1007,
        index: 3,
        direction: Direction::Sell,
    });

    let signals = generator().generate(
        &order_blocks,
        &[fvg],
        &pivots,
        None,
        CURRENT_PRICE,
        ATR,
    );
    assert!(signals.buy.is_empty());
    assert_eq!(signals.sell.len(), 1);

    let signal = signals.sell[0].clone();
    assert_eq!(signal.confluence_score, 3);
    assert_eq!(signal.entry_price, 1.1006);

    let pivot_stop = 1.1007 + 0.5 * ATR;
    assert!((signal.stop_loss - pivot_stop).abs() < 1e-12);

    let ob_stop = 1.1006 + 1.5 * ATR;
    let expected_tp = CURRENT_PRICE - (ob_stop - CURRENT_PRICE) * 2.0;
    assert!((signal.take_profit - expected_tp).abs() < 1e-12);
    assert!(signal.take_profit < CURRENT_PRICE);
}

#[test]
fn all_qualifying_blocks_are_emitted_in_input_order() {
    let order_blocks = OrderBlocks {
        bullish: vec![
            OrderBlock {
                high: 1.1010,
                low: 1.1000,
                index: 1,
                direction: Direction::Buy,
            },
            OrderBlock {
                high: 1.1012,
                low: 1.1001,
                index: 4,
                direction: Direction::Buy,
            },
        ],
        bearish: vec![],
    };
    let mut pivots = SwingPivots::default();
    pivots.buy.push(near_pivot());

    let signals = generator().generate(
        &order_blocks,
        &[near_fvg()],
        &pivots,
        None,
        CURRENT_PRICE,
        ATR,
    );
    assert_eq!(signals.buy.len(), 2, "per-direction exclusivity is the caller's job");
    assert_eq!(signals.buy[0].entry_price, 1.1000);
    assert_eq!(signals.buy[1].entry_price, 1.1001);
}
