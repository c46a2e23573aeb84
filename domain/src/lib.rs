//! Domain layer for toolmend
//!
//! This crate contains the core entities, value objects and pure logic of
//! the validate-and-retry loop for LLM tool calling. It has no dependencies
//! on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Message / ToolCall**: what a generator produces
//! - **ToolCallValidation**: checks a candidate's calls against their schemas
//! - **Aggregator**: collapses several attempts into one candidate, either
//!   last-wins or by merging JSONPatch corrections
//! - **AttemptState**: working history sliced by a generation boundary

pub mod conversation;
pub mod core;
pub mod retry;
pub mod tool;
pub mod util;
pub mod validation;

// Re-export commonly used types
pub use conversation::{ConversationInput, Message, PromptValue, Role};
pub use core::config_issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use retry::{Aggregator, AttemptState, LastAssistantMessage, PatchMergeAggregator, RetryMode};
pub use tool::{
    DefaultToolValidator, JsonPatch, PatchCorrection, PatchError, PatchOp, ToolCall, ToolSchema,
    ToolSet, ToolValidator, apply_patches,
    patch::{PATCH_TOOL_DESCRIPTION, PATCH_TOOL_NAME},
};
pub use validation::{
    CallOutcome, DefaultErrorFormatter, ErrorFormatter, PatchErrorFormatter, ToolCallError,
    ToolCallValidation, ValidationReport,
};
