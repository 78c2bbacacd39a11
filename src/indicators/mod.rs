//! Pure indicator computations over ordered close prices.

pub mod momentum;
pub mod volatility;

pub use momentum::rsi::{compute_rsi, DEFAULT_RSI_PERIOD};
pub use volatility::bollinger::{
    compute_bollinger_bands, BollingerSeries, DEFAULT_BOLLINGER_PERIOD, DEFAULT_STD_DEV_MULTIPLIER,
};
