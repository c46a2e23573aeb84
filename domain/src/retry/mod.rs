//! Retry domain: the pure pieces of the validate-and-retry loop.
//!
//! - [`state::AttemptState`]: working history, attempt counter, boundary
//! - [`aggregate::Aggregator`]: merges attempts into one candidate
//! - [`mode::RetryMode`]: plain or JSONPatch correction
//!
//! The loop itself (generation, cancellation, routing) lives in the
//! application layer.

pub mod aggregate;
pub mod mode;
pub mod state;

pub use aggregate::{Aggregator, LastAssistantMessage, PatchMergeAggregator};
pub use mode::RetryMode;
pub use state::AttemptState;
