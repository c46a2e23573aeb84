//! Application-level configuration.
//!
//! - [`RetryParams`]: attempt budget, forced tool choice and retry mode

pub mod retry_params;

pub use retry_params::{DEFAULT_MAX_ATTEMPTS, RetryParams};
