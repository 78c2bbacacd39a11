//! Shared numeric helpers.

pub mod math;

pub use math::RollingWindow;
