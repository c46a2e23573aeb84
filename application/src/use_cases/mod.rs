//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod bind;
pub(crate) mod shared;
pub mod validate_with_retries;
