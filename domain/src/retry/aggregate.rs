//! Aggregators: collapse the messages generated across attempts into the
//! single current-best candidate.
//!
//! - [`LastAssistantMessage`]: plain retries, the most recent answer wins
//! - [`PatchMergeAggregator`]: JSONPatch corrections applied cumulatively
//!   to the calls they target

use crate::conversation::message::Message;
use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;
use crate::tool::patch::{PATCH_TOOL_NAME, PatchCorrection, apply_patches};
use tracing::{debug, warn};

/// Merges a sequence of generated messages into one assistant message.
pub trait Aggregator: Send + Sync {
    /// `messages` holds only what was generated inside the retry loop.
    ///
    /// Returns [`DomainError::NoAssistantMessage`] when there is nothing to
    /// aggregate, which means an attempt failed to append its answer.
    fn aggregate(&self, messages: &[Message]) -> Result<Message, DomainError>;
}

/// Last-wins aggregation: the newest assistant message.
#[derive(Debug, Clone, Default)]
pub struct LastAssistantMessage;

impl Aggregator for LastAssistantMessage {
    fn aggregate(&self, messages: &[Message]) -> Result<Message, DomainError> {
        messages
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .cloned()
            .ok_or(DomainError::NoAssistantMessage)
    }
}

/// Patch-merge aggregation.
///
/// Walks every assistant message in order, keeping the latest resolved
/// version of each tool call. Plain calls are inserted (or overwrite a call
/// with the same id). A correction call is applied to the call whose current
/// id it names, after which that call takes the correction's id so the next
/// correction can target it.
///
/// A correction naming an id that is not known is applied to the first known
/// call instead. This is a heuristic: with several calls in flight it can
/// patch the wrong one.
#[derive(Debug, Clone)]
pub struct PatchMergeAggregator {
    correction_tool: String,
}

impl PatchMergeAggregator {
    pub fn new() -> Self {
        Self::with_correction_tool(PATCH_TOOL_NAME)
    }

    pub fn with_correction_tool(name: impl Into<String>) -> Self {
        Self {
            correction_tool: name.into(),
        }
    }

    pub fn correction_tool(&self) -> &str {
        &self.correction_tool
    }

    fn apply_correction(&self, resolved: &mut [ToolCall], call: &ToolCall, correction: PatchCorrection) {
        let index = match resolved.iter().position(|c| c.id == correction.tool_call_id) {
            Some(index) => index,
            None if resolved.is_empty() => {
                warn!(
                    "Correction {} targets unknown tool call {} and no call is known yet; skipping",
                    call.id, correction.tool_call_id
                );
                return;
            }
            None => {
                warn!(
                    "Correction {} targets unknown tool call {}; valid ids: {:?}. Using {}",
                    call.id,
                    correction.tool_call_id,
                    resolved.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
                    resolved[0].id
                );
                0
            }
        };

        let target = &mut resolved[index];
        match apply_patches(&target.args, &correction.patches) {
            Ok(args) => {
                debug!(
                    "Applied {} patch(es) from {} to {}",
                    correction.patches.len(),
                    call.id,
                    target.id
                );
                target.args = args;
            }
            Err(e) => {
                warn!(
                    "Patch from {} could not be applied to {}: {}; keeping previous arguments",
                    call.id, target.id, e
                );
            }
        }
        target.id = call.id.clone();
    }
}

impl Default for PatchMergeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for PatchMergeAggregator {
    fn aggregate(&self, messages: &[Message]) -> Result<Message, DomainError> {
        let mut resolved: Vec<ToolCall> = Vec::new();
        let mut content = String::new();
        let mut seen_assistant = false;

        for message in messages.iter().filter(|m| m.is_assistant()) {
            seen_assistant = true;
            if content.is_empty() {
                content = message.content.clone();
            }
            for call in &message.tool_calls {
                let correction = if call.name == self.correction_tool {
                    PatchCorrection::from_args(&call.args)
                } else {
                    None
                };
                match correction {
                    Some(correction) => self.apply_correction(&mut resolved, call, correction),
                    None => match resolved.iter_mut().find(|c| c.id == call.id) {
                        Some(existing) => *existing = call.clone(),
                        None => resolved.push(call.clone()),
                    },
                }
            }
        }

        if !seen_assistant {
            return Err(DomainError::NoAssistantMessage);
        }
        Ok(Message::assistant(content).with_tool_calls(resolved))
    }
}
