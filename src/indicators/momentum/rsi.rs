//! RSI (Relative Strength Index) indicator

use crate::common::math::{finite, RollingWindow};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate the RSI series for a sequence of closes.
///
/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss, where both
/// averages are simple means over the trailing `period` price changes.
///
/// The output is aligned with `closes`: index `i` holds the RSI ending at
/// `closes[i]`. The first `period` entries are `None` because `period` deltas
/// need `period + 1` closes. A window with zero average loss is defined as 100.
pub fn compute_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut output = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return output;
    }
    output.push(None);

    let mut gains = RollingWindow::new(period);
    let mut losses = RollingWindow::new(period);

    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));

        let value = match (gains.mean(), losses.mean()) {
            (Some(avg_gain), Some(avg_loss)) => finite(rsi_from_averages(avg_gain, avg_loss)),
            _ => None,
        };
        output.push(value);
    }

    output
}

/// Calculate RSI with default period (14)
pub fn compute_rsi_default(closes: &[f64]) -> Vec<Option<f64>> {
    compute_rsi(closes, DEFAULT_RSI_PERIOD)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
