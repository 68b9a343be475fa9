use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub instrument: InstrumentConfig,
    pub analysis: AnalysisConfig,
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_account_balance")]
    pub account_balance: f64,
}

/// Thresholds for the structure detectors and the confluence gate.
///
/// Defaults are tuned for EUR/USD on H1 candles, where one pip is 0.0001.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_breakout_factor")]
    pub breakout_factor: f64,
    #[serde(default = "default_fvg_min_gap")]
    pub fvg_min_gap: f64,
    #[serde(default = "default_range_threshold")]
    pub range_threshold: f64,
    #[serde(default = "default_min_range_size")]
    pub min_range_size: f64,
    #[serde(default = "default_max_range_size")]
    pub max_range_size: f64,
    #[serde(default = "default_min_confluence_score")]
    pub min_confluence_score: u32,
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_max_risk_per_trade")]
    pub max_risk_per_trade: f64,
    #[serde(default = "default_max_daily_drawdown")]
    pub max_daily_drawdown: f64,
    /// Value of one pip in account currency for one standard lot.
    #[serde(default = "default_pip_value")]
    pub pip_value: f64,
    /// Price increment corresponding to one pip for the instrument.
    #[serde(default = "default_pip_size")]
    pub pip_size: f64,
}

fn default_history_len() -> usize {
    1000
}
fn default_account_balance() -> f64 {
    10000.0
}
fn default_breakout_factor() -> f64 {
    0.002 // 0.2% close beyond the candle extreme counts as a breakout
}
fn default_fvg_min_gap() -> f64 {
    0.0010 // 10 pips
}
fn default_range_threshold() -> f64 {
    0.0015 // 15 pips
}
fn default_min_range_size() -> f64 {
    0.0005 // 5 pips
}
fn default_max_range_size() -> f64 {
    0.0050 // 50 pips
}
fn default_min_confluence_score() -> u32 {
    3
}
fn default_atr_period() -> usize {
    14
}
fn default_max_risk_per_trade() -> f64 {
    0.02 // 2% per trade
}
fn default_max_daily_drawdown() -> f64 {
    0.05 // 5% per day
}
fn default_pip_value() -> f64 {
    10.0
}
fn default_pip_size() -> f64 {
    0.0001
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            symbol: "EURUSD".to_string(),
            history_len: default_history_len(),
            account_balance: default_account_balance(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            breakout_factor: default_breakout_factor(),
            fvg_min_gap: default_fvg_min_gap(),
            range_threshold: default_range_threshold(),
            min_range_size: default_min_range_size(),
            max_range_size: default_max_range_size(),
            min_confluence_score: default_min_confluence_score(),
            atr_period: default_atr_period(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_per_trade: default_max_risk_per_trade(),
            max_daily_drawdown: default_max_daily_drawdown(),
            pip_value: default_pip_value(),
            pip_size: default_pip_size(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentConfig::default(),
            analysis: AnalysisConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_file("config.json")
    }

    /// Load configuration from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load_from_file(path: &str) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(config_str) => {
                let config: EngineConfig = serde_json::from_str(&config_str)
                    .with_context(|| format!("invalid config file: {}", path))?;
                info!("Loaded configuration from {}", path);
                Ok(config)
            }
            Err(_) => {
                info!("No config file at {}, using defaults", path);
                Ok(Self::default())
            }
        }
    }
}
