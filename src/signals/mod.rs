//! Signal evaluation interfaces.

pub mod engine;
pub mod policy;

pub use engine::{SignalEvaluator, MIN_SERIES_LEN};
pub use policy::{IndicatorParams, RulePolicy, RulePreset};
