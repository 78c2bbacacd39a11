//! External collaborators: market data in, notifications out.

pub mod market_data;
pub mod notifier;
pub mod upbit;

pub use market_data::PriceProvider;
pub use notifier::{LogNotifier, Notifier, TelegramNotifier};
pub use upbit::UpbitPriceProvider;
