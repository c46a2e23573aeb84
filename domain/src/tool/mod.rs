//! Tool domain module
//!
//! Defines what a generator may call and how its calls are checked:
//!
//! - [`ToolSchema`]: name, description and JSON Schema of one tool
//! - [`ToolSet`]: the fixed set of tools a generator is bound to
//! - [`ToolCall`]: a structured invocation emitted by a generator
//! - [`ToolValidator`]: pure trait that checks a call against its schema
//! - [`patch`]: JSONPatch corrections used by the patch-based retry variant
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolSet      │───▶│ ToolCall     │───▶│ ToolValidator    │
//! │ (schemas)    │    │ (generated)  │    │ Ok / Err(reason) │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//! ```

pub mod entities;
pub mod patch;
pub mod traits;

pub use entities::{ToolCall, ToolSchema, ToolSet};
pub use patch::{JsonPatch, PatchCorrection, PatchError, PatchOp, apply_patches};
pub use traits::{DefaultToolValidator, ToolValidator};
