//! Runtime configuration loaded from the environment.
//!
//! Values are read once at startup into [`AppConfig`] and handed to the
//! components that need them. Nothing below `config` reads the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::signals::policy::{IndicatorParams, RulePolicy, RulePreset};

pub const DEFAULT_INSTRUMENTS: [&str; 10] = [
    "KRW-BTC", "KRW-ETH", "KRW-XRP", "KRW-ADA", "KRW-DOT", "KRW-LINK", "KRW-BCH", "KRW-SOL",
    "KRW-AVAX", "KRW-ATOM",
];

pub const DEFAULT_SCAN_CRON: &str = "0 0 * * * *";

pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpbitSettings {
    pub base_url: String,
    pub candle_unit_minutes: u32,
    pub candle_count: u32,
    pub max_retries: usize,
    pub retry_min_delay: Duration,
}

impl Default for UpbitSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.upbit.com/v1".to_string(),
            candle_unit_minutes: 60,
            candle_count: 200,
            max_retries: 2,
            retry_min_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramSettings {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSettings {
    pub cron: String,
    pub run_on_start: bool,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            cron: DEFAULT_SCAN_CRON.to_string(),
            run_on_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: String,
    pub instruments: Vec<String>,
    pub indicators: IndicatorParams,
    pub policy: RulePolicy,
    pub min_series_len: usize,
    pub fetch_delay: Duration,
    pub upbit: UpbitSettings,
    /// `None` only in dry-run mode.
    pub telegram: Option<TelegramSettings>,
    pub dry_run: bool,
    pub scheduler: SchedulerSettings,
    pub http_port: Option<u16>,
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = get("APP_ENV").unwrap_or_else(|| "sandbox".to_string());

        let instruments: Vec<String> = match get("INSTRUMENTS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
        };
        if instruments.is_empty() {
            return Err(ConfigError::Invalid {
                key: "INSTRUMENTS",
                reason: "at least one instrument is required".to_string(),
            });
        }

        let defaults = IndicatorParams::default();
        let indicators = IndicatorParams {
            rsi_period: parse_or(&get, "RSI_PERIOD", defaults.rsi_period)?,
            bollinger_period: parse_or(&get, "BOLLINGER_PERIOD", defaults.bollinger_period)?,
            std_dev_multiplier: parse_or(&get, "BOLLINGER_STD_DEV", defaults.std_dev_multiplier)?,
        };
        indicators.validate()?;

        let preset = match get("RULE_PRESET") {
            Some(raw) => RulePreset::from_str(&raw)?,
            None => RulePreset::SqueezeBreakout,
        };
        let base = RulePolicy::from_preset(preset);
        let band_width_max_pct = parse_or(&get, "BAND_WIDTH_CEILING_PCT", base.band_width_max_pct)?;
        let require_breakout = parse_bool_or(&get, "REQUIRE_BREAKOUT", base.require_breakout)?;
        let policy = base
            .with_rsi_max(parse_or(&get, "RSI_THRESHOLD", base.rsi_max)?)
            .with_band_width_max_pct(band_width_max_pct)
            .with_require_breakout(require_breakout);
        policy.validate()?;

        let min_series_len = parse_or(&get, "MIN_SERIES_LEN", crate::signals::MIN_SERIES_LEN)?;

        let upbit_defaults = UpbitSettings::default();
        let upbit = UpbitSettings {
            base_url: get("UPBIT_BASE_URL").unwrap_or(upbit_defaults.base_url),
            candle_unit_minutes: parse_or(
                &get,
                "CANDLE_UNIT_MINUTES",
                upbit_defaults.candle_unit_minutes,
            )?,
            candle_count: parse_or(&get, "CANDLE_COUNT", upbit_defaults.candle_count)?,
            ..upbit_defaults
        };

        // Fewer candles than the evaluator needs would skip every instrument forever.
        let required = min_series_len.max(indicators.warm_up_len());
        if (upbit.candle_count as usize) < required {
            return Err(ConfigError::Invalid {
                key: "CANDLE_COUNT",
                reason: format!(
                    "{} candles cannot cover the {} points the evaluator requires",
                    upbit.candle_count, required
                ),
            });
        }

        let dry_run = parse_bool_or(&get, "DRY_RUN", false)?;
        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => {
                let settings = TelegramSettings::new(token, chat_id);
                Some(match get("TELEGRAM_API_BASE") {
                    Some(base) => settings.with_api_base(base),
                    None => settings,
                })
            }
            (None, _) if !dry_run => return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN")),
            (_, None) if !dry_run => return Err(ConfigError::Missing("TELEGRAM_CHAT_ID")),
            _ => None,
        };

        let scheduler = SchedulerSettings {
            cron: get("SCAN_CRON").unwrap_or_else(|| DEFAULT_SCAN_CRON.to_string()),
            run_on_start: parse_bool_or(&get, "RUN_ON_START", true)?,
        };

        let http_port = match get("HTTP_PORT") {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                key: "HTTP_PORT",
                reason: format!("'{}' is not a port number", raw),
            })?),
            None => None,
        };

        Ok(Self {
            environment,
            instruments,
            indicators,
            policy,
            min_series_len,
            fetch_delay: Duration::from_millis(parse_or(&get, "FETCH_DELAY_MS", 100u64)?),
            upbit,
            telegram,
            dry_run,
            scheduler,
            http_port,
            log_file: get("LOG_FILE"),
        })
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            key,
            reason: format!("cannot parse '{}'", raw),
        }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::Invalid {
            key,
            reason: format!("'{}' is not a boolean", v),
        }),
        None => Ok(default),
    }
}
