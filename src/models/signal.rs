use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest indicator readings for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub upper_band: f64,
    pub middle_band: f64,
    pub lower_band: f64,
    pub band_width_pct: f64,
    pub price: f64,
}

impl IndicatorSnapshot {
    pub fn upper_breakout(&self) -> bool {
        self.price > self.upper_band
    }

    pub fn lower_breakout(&self) -> bool {
        self.price < self.lower_band
    }

    /// Which band the price has closed beyond, if any.
    pub fn breakout(&self) -> Option<BreakoutDirection> {
        if self.upper_breakout() {
            Some(BreakoutDirection::Upper)
        } else if self.lower_breakout() {
            Some(BreakoutDirection::Lower)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BreakoutDirection {
    Upper,
    Lower,
}

/// A fired rule for one instrument during one scan cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub instrument: String,
    pub snapshot: IndicatorSnapshot,
    /// Always set when the policy requires a breakout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakout: Option<BreakoutDirection>,
    /// Timestamp of the price point the rule fired on.
    pub triggered_at: DateTime<Utc>,
}
