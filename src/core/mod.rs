//! Core application primitives (scanner, cycle, scheduler, HTTP surface)

pub mod bootstrap;
pub mod http;
pub mod runtime;
pub mod scanner;
pub mod scheduler;

pub use http::*;
pub use runtime::*;
pub use scanner::*;
pub use scheduler::*;
