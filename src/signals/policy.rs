//! Rule policies applied by the signal evaluator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::indicators::{DEFAULT_BOLLINGER_PERIOD, DEFAULT_RSI_PERIOD, DEFAULT_STD_DEV_MULTIPLIER};

/// Indicator parameters used to build a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub std_dev_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            std_dev_multiplier: DEFAULT_STD_DEV_MULTIPLIER,
        }
    }
}

impl IndicatorParams {
    /// Fewest points for which both indicators are defined at the last index.
    pub fn warm_up_len(&self) -> usize {
        (self.rsi_period + 1).max(self.bollinger_period)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period == 0 {
            return Err(ConfigError::Invalid {
                key: "RSI_PERIOD",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bollinger_period < 2 {
            return Err(ConfigError::Invalid {
                key: "BOLLINGER_PERIOD",
                reason: "must be at least 2".to_string(),
            });
        }
        if !self.std_dev_multiplier.is_finite() || self.std_dev_multiplier < 0.0 {
            return Err(ConfigError::Invalid {
                key: "BOLLINGER_STD_DEV",
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

/// Named policy presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    /// RSI <= 50, band width <= 0.3%, price outside a band.
    SqueezeBreakout,
    /// RSI <= 40, band width <= 1.2%, no breakout needed.
    OversoldSqueeze,
}

impl std::str::FromStr for RulePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squeeze_breakout" | "breakout" => Ok(RulePreset::SqueezeBreakout),
            "oversold_squeeze" | "oversold" => Ok(RulePreset::OversoldSqueeze),
            other => Err(ConfigError::Invalid {
                key: "RULE_PRESET",
                reason: format!("unknown preset '{}'", other),
            }),
        }
    }
}

/// Thresholds that decide whether a snapshot fires an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RulePolicy {
    /// Fires only when `rsi <= rsi_max`.
    pub rsi_max: f64,
    /// Fires only when `band_width_pct <= band_width_max_pct`.
    pub band_width_max_pct: f64,
    /// Also require the price to close beyond one of the bands.
    pub require_breakout: bool,
}

impl RulePolicy {
    pub fn squeeze_breakout() -> Self {
        Self {
            rsi_max: 50.0,
            band_width_max_pct: 0.3,
            require_breakout: true,
        }
    }

    pub fn oversold_squeeze() -> Self {
        Self {
            rsi_max: 40.0,
            band_width_max_pct: 1.2,
            require_breakout: false,
        }
    }

    pub fn from_preset(preset: RulePreset) -> Self {
        match preset {
            RulePreset::SqueezeBreakout => Self::squeeze_breakout(),
            RulePreset::OversoldSqueeze => Self::oversold_squeeze(),
        }
    }

    pub fn with_rsi_max(mut self, rsi_max: f64) -> Self {
        self.rsi_max = rsi_max;
        self
    }

    pub fn with_band_width_max_pct(mut self, band_width_max_pct: f64) -> Self {
        self.band_width_max_pct = band_width_max_pct;
        self
    }

    pub fn with_require_breakout(mut self, require_breakout: bool) -> Self {
        self.require_breakout = require_breakout;
        self
    }

    /// Reject thresholds no snapshot could ever satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rsi_max.is_finite() || !(0.0..=100.0).contains(&self.rsi_max) {
            return Err(ConfigError::Invalid {
                key: "RSI_THRESHOLD",
                reason: "must be a number between 0 and 100".to_string(),
            });
        }
        if !self.band_width_max_pct.is_finite() || self.band_width_max_pct < 0.0 {
            return Err(ConfigError::Invalid {
                key: "BAND_WIDTH_CEILING_PCT",
                reason: "must be a non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::squeeze_breakout()
    }
}
