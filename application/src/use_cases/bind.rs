//! Binding helpers: turn a chat model, a validator and a tool list into a
//! ready-to-run [`ValidateWithRetries`].
//!
//! - [`bind_validator_with_retries`]: plain retries, the model sees its
//!   errors and answers again
//! - [`bind_validator_with_patch_retries`]: the fallback may only call
//!   the JSONPatch correction tool, and corrections are merged into the
//!   original calls
//! - [`bind_validator`]: dispatch on [`RetryParams::mode`]

use crate::config::RetryParams;
use crate::ports::chat_model::ChatModel;
use crate::ports::generator::{BoundGenerator, Generator};
use crate::use_cases::validate_with_retries::{RetryError, RetryStrategy, ValidateWithRetries};
use std::sync::Arc;
use toolmend_domain::{
    PATCH_TOOL_DESCRIPTION, PATCH_TOOL_NAME, PatchCorrection, PatchErrorFormatter,
    PatchMergeAggregator, RetryMode, ToolCallValidation, ToolSchema, ToolSet, ToolValidator,
};
use tracing::debug;

/// Tool choices that force "some tool" rather than a specific one.
const GENERIC_TOOL_CHOICES: &[&str] = &["any", "required"];

fn check_tool_choice(tools: &[ToolSchema], tool_choice: Option<&str>) -> Result<(), RetryError> {
    match tool_choice {
        Some(choice)
            if !GENERIC_TOOL_CHOICES.contains(&choice) && !tools.iter().any(|t| t.name == choice) =>
        {
            Err(RetryError::UnknownToolChoice(choice.to_string()))
        }
        _ => Ok(()),
    }
}

/// Bind `tools` to `model` and retry on validation failure.
pub fn bind_validator_with_retries(
    model: Arc<dyn ChatModel>,
    validator: Arc<dyn ToolValidator>,
    tools: Vec<ToolSchema>,
    params: &RetryParams,
) -> Result<ValidateWithRetries, RetryError> {
    check_tool_choice(&tools, params.tool_choice.as_deref())?;
    debug!(
        "Binding {} tool(s) to {} with plain retries",
        tools.len(),
        model.name()
    );

    let validation = ToolCallValidation::new(tools.iter().cloned().collect(), validator);
    let primary: Arc<dyn Generator> =
        Arc::new(BoundGenerator::new(model, tools).with_tool_choice(params.tool_choice.clone()));
    let strategy = RetryStrategy::default().with_max_attempts(params.max_attempts);

    Ok(
        ValidateWithRetries::new(primary, validation, strategy, params.tool_choice.clone())?
            .with_mode(RetryMode::Plain),
    )
}

/// JSON schema of the correction tool.
pub fn patch_tool_schema() -> Result<ToolSchema, RetryError> {
    ToolSchema::from_type::<PatchCorrection>(PATCH_TOOL_NAME, PATCH_TOOL_DESCRIPTION)
        .map_err(|e| RetryError::InvalidToolSchema(e.to_string()))
}

/// Bind `tools` to `model` and repair invalid calls with JSONPatch
/// corrections.
///
/// The primary generator sees the caller's tools and tool choice. The
/// fallback is bound to the correction tool only, with no forced choice.
/// Validation accepts both sets so a well-formed but unapplied correction
/// is reported instead of rejected as unknown.
pub fn bind_validator_with_patch_retries(
    model: Arc<dyn ChatModel>,
    validator: Arc<dyn ToolValidator>,
    tools: Vec<ToolSchema>,
    params: &RetryParams,
) -> Result<ValidateWithRetries, RetryError> {
    check_tool_choice(&tools, params.tool_choice.as_deref())?;
    let correction = patch_tool_schema()?;
    debug!(
        "Binding {} tool(s) to {} with JSONPatch retries",
        tools.len(),
        model.name()
    );

    let validation_tools: ToolSet = tools
        .iter()
        .cloned()
        .chain(std::iter::once(correction.clone()))
        .collect();
    let validation = ToolCallValidation::new(validation_tools, validator)
        .with_formatter(Arc::new(PatchErrorFormatter));

    let primary: Arc<dyn Generator> = Arc::new(
        BoundGenerator::new(model.clone(), tools).with_tool_choice(params.tool_choice.clone()),
    );
    let fallback: Arc<dyn Generator> = Arc::new(BoundGenerator::new(model, vec![correction]));
    let strategy = RetryStrategy::default()
        .with_max_attempts(params.max_attempts)
        .with_fallback(fallback)
        .with_aggregator(Arc::new(PatchMergeAggregator::new()));

    Ok(
        ValidateWithRetries::new(primary, validation, strategy, params.tool_choice.clone())?
            .with_mode(RetryMode::JsonPatch),
    )
}

/// Bind according to `params.mode`.
pub fn bind_validator(
    model: Arc<dyn ChatModel>,
    validator: Arc<dyn ToolValidator>,
    tools: Vec<ToolSchema>,
    params: &RetryParams,
) -> Result<ValidateWithRetries, RetryError> {
    match params.mode {
        RetryMode::Plain => bind_validator_with_retries(model, validator, tools, params),
        RetryMode::JsonPatch => bind_validator_with_patch_retries(model, validator, tools, params),
    }
}
