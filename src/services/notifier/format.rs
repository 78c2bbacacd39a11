//! HTML rendering of alert batches.

use chrono::{DateTime, Utc};

use crate::models::signal::{AlertRecord, BreakoutDirection};
use crate::signals::policy::RulePolicy;

const FOOTER: &str = "⚠️ <i>Indicators are not advice. Trade carefully.</i>";

#[derive(Debug, Clone)]
pub struct AlertFormatter {
    policy: RulePolicy,
}

impl AlertFormatter {
    pub fn new(policy: RulePolicy) -> Self {
        Self { policy }
    }

    /// Render a batch of alerts as a Telegram HTML message.
    pub fn render(&self, alerts: &[AlertRecord], now: DateTime<Utc>) -> String {
        let mut message = self.header(now);
        for alert in alerts {
            message.push_str(&self.render_alert(alert));
        }
        message.push_str(FOOTER);
        message
    }

    /// Render the batch as one or more messages of at most `max_chars` characters each.
    ///
    /// Messages are split between alert blocks, and every part repeats the header
    /// and footer. A single block longer than the limit is still sent on its own.
    pub fn render_parts(
        &self,
        alerts: &[AlertRecord],
        now: DateTime<Utc>,
        max_chars: usize,
    ) -> Vec<String> {
        let header = self.header(now);
        let frame_len = header.chars().count() + FOOTER.chars().count();

        let mut parts = Vec::new();
        let mut body = String::new();
        let mut body_len = 0;
        for alert in alerts {
            let block = self.render_alert(alert);
            let block_len = block.chars().count();
            if body_len > 0 && frame_len + body_len + block_len > max_chars {
                parts.push(format!("{}{}{}", header, body, FOOTER));
                body.clear();
                body_len = 0;
            }
            body.push_str(&block);
            body_len += block_len;
        }
        parts.push(format!("{}{}{}", header, body, FOOTER));
        parts
    }

    fn header(&self, now: DateTime<Utc>) -> String {
        let mut header = String::from("🚨 <b>Upbit technical alert</b> 🚨\n\n");
        header.push_str(&format!("📅 {} UTC\n\n", now.format("%Y-%m-%d %H:%M:%S")));

        header.push_str("💡 <b>Conditions (all required):</b>\n");
        header.push_str(&format!("🔸 RSI ≤ {}\n", self.policy.rsi_max));
        header.push_str(&format!("🔸 Band width ≤ {}%\n", self.policy.band_width_max_pct));
        if self.policy.require_breakout {
            header.push_str("🔸 Close beyond the upper or lower band\n");
        }
        header.push('\n');
        header
    }

    fn render_alert(&self, alert: &AlertRecord) -> String {
        let s = &alert.snapshot;
        let mut block = format!("📈 <b>{}</b>\n", escape_html(display_name(&alert.instrument)));
        block.push_str(&format!("💰 Price: {}\n", format_price(s.price)));
        block.push_str(&format!("📊 RSI: {:.2}\n", s.rsi));
        block.push_str(&format!("📏 Band width: {:.3}%\n", s.band_width_pct));
        block.push_str(&format!("🔸 Upper band: {}\n", format_price(s.upper_band)));
        block.push_str(&format!("🔹 Lower band: {}\n", format_price(s.lower_band)));

        match alert.breakout {
            Some(BreakoutDirection::Upper) => {
                block.push_str("🚀 Upper band breakout (bullish)\n");
            }
            Some(BreakoutDirection::Lower) => {
                block.push_str("📉 Lower band breakout (bearish)\n");
            }
            None => {}
        }
        block.push('\n');
        block
    }
}

/// Strip the quote-currency prefix, e.g. `KRW-BTC` -> `BTC`.
pub fn display_name(instrument: &str) -> &str {
    instrument
        .split_once('-')
        .map(|(_, base)| base)
        .unwrap_or(instrument)
}

/// Prices with thousands separators; small prices keep their decimals.
pub fn format_price(value: f64) -> String {
    let decimals = match value.abs() {
        v if v >= 100.0 => 0,
        v if v >= 1.0 => 2,
        _ => 4,
    };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
