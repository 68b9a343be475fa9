//! Smart-money market-structure analysis engine: pure detectors for order
//! blocks, fair value gaps and swing pivots, range classification, confluence
//! scoring into trade signals, and drawdown-aware position sizing.

pub mod config;
pub mod confluence;
pub mod fvg;
pub mod market_data;
pub mod order_block;
pub mod range;
pub mod risk;
pub mod structure;

pub use config::{AnalysisConfig, EngineConfig, InstrumentConfig, RiskConfig};
pub use confluence::{ConfluenceSignalGenerator, Signal, Signals};
pub use fvg::{detect_fvgs, FairValueGap};
pub use market_data::{atr, Candle, CandleHistory, Direction};
pub use order_block::{detect_order_blocks, OrderBlock, OrderBlocks};
pub use range::{Range, RangeAnalyzer, RangeKind, VolumeProfile};
pub use risk::{RiskSizer, SizingOutcome};
pub use structure::{detect_pivots, SwingPivot, SwingPivots};
