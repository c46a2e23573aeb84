pub mod config_issue;
pub mod error;
