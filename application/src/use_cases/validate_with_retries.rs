//! Validate-with-retries use case.
//!
//! Drives a generator until its tool calls pass schema validation or the
//! attempt budget runs out. The loop is an explicit state machine:
//!
//! ```text
//! Count ─▶ Generate ─▶ RouteAfterGenerate ──(no tool calls, no forced choice)──▶ done
//!                              │
//!                              ▼
//!            ┌──────────▶ Validate ─▶ RouteAfterValidate ──(clean)──▶ Finalize ─▶ done
//!            │                               │
//!            └──── FallbackGenerate ◀─(error)┘──(budget spent)──▶ RetryBudgetExhausted
//! ```
//!
//! Each invocation owns its working history, so independent invocations can
//! run concurrently on the same [`ValidateWithRetries`].

use crate::ports::chat_model::GeneratorError;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generator::Generator;
use crate::ports::progress::{GenerationKind, NoRetryProgress, RetryProgressNotifier};
use crate::use_cases::shared::{check_cancelled, generate_cancellable};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use toolmend_domain::util::preview;
use toolmend_domain::{
    Aggregator, AttemptState, ConversationInput, DomainError, LastAssistantMessage, Message,
    RetryMode, ToolCallValidation,
};
use tracing::{debug, info, warn};

/// Errors that can end a retry loop.
#[derive(Error, Debug)]
pub enum RetryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Could not extract a valid value in {attempts} attempts (max_attempts={max_attempts})")]
    RetryBudgetExhausted { attempts: usize, max_attempts: usize },

    #[error("max_attempts must be at least 1, got {0}")]
    InvalidMaxAttempts(usize),

    #[error("tool_choice '{0}' does not name a bound tool")]
    UnknownToolChoice(String),

    #[error("Invalid tool schema: {0}")]
    InvalidToolSchema(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RetryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::RetryBudgetExhausted { .. })
    }
}

/// How the loop retries.
///
/// - `max_attempts`: hard cap on generations (default 3)
/// - `fallback`: generator for every attempt after the first failure;
///   the primary generator is reused when unset
/// - `aggregator`: how attempts collapse into one candidate; defaults to
///   [`LastAssistantMessage`]
#[derive(Clone)]
pub struct RetryStrategy {
    pub max_attempts: usize,
    pub fallback: Option<Arc<dyn Generator>>,
    pub aggregator: Option<Arc<dyn Aggregator>>,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::DEFAULT_MAX_ATTEMPTS,
            fallback: None,
            aggregator: None,
        }
    }
}

impl RetryStrategy {
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Generator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_aggregator(mut self, aggregator: Arc<dyn Aggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }
}

/// Result of a successful loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutput {
    /// The resolved assistant message.
    pub message: Message,
    /// Generation attempts made, primary and fallback alike.
    pub attempts: usize,
}

/// Named states of the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Count,
    Generate,
    RouteAfterGenerate,
    Validate,
    RouteAfterValidate,
    FallbackGenerate,
    Finalize,
}

/// Use case: generate, validate, and re-prompt until the tool calls are valid.
pub struct ValidateWithRetries {
    primary: Arc<dyn Generator>,
    fallback: Arc<dyn Generator>,
    validation: ToolCallValidation,
    aggregator: Arc<dyn Aggregator>,
    max_attempts: usize,
    tool_choice: Option<String>,
    mode: RetryMode,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for ValidateWithRetries {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            fallback: self.fallback.clone(),
            validation: self.validation.clone(),
            aggregator: self.aggregator.clone(),
            max_attempts: self.max_attempts,
            tool_choice: self.tool_choice.clone(),
            mode: self.mode,
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl ValidateWithRetries {
    pub fn new(
        primary: Arc<dyn Generator>,
        validation: ToolCallValidation,
        strategy: RetryStrategy,
        tool_choice: Option<String>,
    ) -> Result<Self, RetryError> {
        if strategy.max_attempts == 0 {
            return Err(RetryError::InvalidMaxAttempts(strategy.max_attempts));
        }
        let fallback = strategy.fallback.unwrap_or_else(|| primary.clone());
        let aggregator = strategy
            .aggregator
            .unwrap_or_else(|| Arc::new(LastAssistantMessage));
        Ok(Self {
            primary,
            fallback,
            validation,
            aggregator,
            max_attempts: strategy.max_attempts,
            tool_choice,
            mode: RetryMode::Plain,
            conversation_logger: Arc::new(NoConversationLogger),
        })
    }

    /// Label the loop with its correction mode (used in logs).
    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn tool_choice(&self) -> Option<&str> {
        self.tool_choice.as_deref()
    }

    pub fn mode(&self) -> RetryMode {
        self.mode
    }

    /// Run the loop without progress reporting or cancellation.
    pub async fn invoke(&self, input: impl Into<ConversationInput>) -> Result<RetryOutput, RetryError> {
        self.invoke_with_progress(input, &NoRetryProgress, &None).await
    }

    /// Decode raw JSON input and run the loop.
    ///
    /// Input that is neither a message list nor a prompt value fails here,
    /// before any generation call.
    pub async fn invoke_json(
        &self,
        input: serde_json::Value,
        progress: &dyn RetryProgressNotifier,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<RetryOutput, RetryError> {
        let input = ConversationInput::from_json(input)?;
        self.invoke_with_progress(input, progress, cancellation_token)
            .await
    }

    /// Run the loop with progress callbacks and optional cancellation.
    pub async fn invoke_with_progress(
        &self,
        input: impl Into<ConversationInput>,
        progress: &dyn RetryProgressNotifier,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<RetryOutput, RetryError> {
        let mut state = AttemptState::new(input.into().into_messages());
        info!(
            "Starting {} retry loop: {} input messages, max_attempts={}",
            self.mode,
            state.messages().len(),
            self.max_attempts
        );

        let mut step = Step::Count;
        loop {
            check_cancelled(cancellation_token)?;
            debug!("Retry loop step {:?} (attempts={})", step, state.attempts());

            step = match step {
                Step::Count => {
                    state.record_boundary();
                    Step::Generate
                }
                Step::Generate => {
                    self.generate(&mut state, GenerationKind::Primary, progress, cancellation_token)
                        .await?;
                    Step::RouteAfterGenerate
                }
                Step::RouteAfterGenerate => {
                    let has_tool_calls = state.last().is_some_and(|m| m.has_tool_calls());
                    if has_tool_calls || self.tool_choice.is_some() {
                        Step::Validate
                    } else {
                        debug!("No tool calls to validate; passing the message through");
                        break;
                    }
                }
                Step::Validate => {
                    self.validate(&mut state, progress)?;
                    Step::RouteAfterValidate
                }
                Step::RouteAfterValidate => {
                    if state.attempts() > self.max_attempts {
                        return Err(self.exhausted(&state, progress));
                    }
                    if !state.last_round_failed() {
                        Step::Finalize
                    } else if state.attempts() >= self.max_attempts {
                        // Another fallback would push the counter past the cap.
                        return Err(self.exhausted(&state, progress));
                    } else {
                        Step::FallbackGenerate
                    }
                }
                Step::FallbackGenerate => {
                    self.generate(&mut state, GenerationKind::Fallback, progress, cancellation_token)
                        .await?;
                    Step::Validate
                }
                Step::Finalize => {
                    let resolved = self.aggregator.aggregate(state.generated())?;
                    state.finalize(resolved);
                    break;
                }
            };
        }

        let attempts = state.attempts();
        let message = state
            .into_output()
            .ok_or(RetryError::Domain(DomainError::NoAssistantMessage))?;

        info!("Retry loop completed after {} attempt(s)", attempts);
        progress.on_complete(attempts);
        self.conversation_logger.log(ConversationEvent::new(
            "finalized",
            serde_json::json!({
                "mode": self.mode.as_str(),
                "attempts": attempts,
                "tool_calls": message.tool_calls,
                "content": message.content,
            }),
        ));

        Ok(RetryOutput { message, attempts })
    }

    async fn generate(
        &self,
        state: &mut AttemptState,
        kind: GenerationKind,
        progress: &dyn RetryProgressNotifier,
        cancellation_token: &Option<CancellationToken>,
    ) -> Result<(), RetryError> {
        let attempt = state.attempts() + 1;
        let generator = match kind {
            GenerationKind::Primary => &self.primary,
            GenerationKind::Fallback => &self.fallback,
        };

        info!("Attempt {}/{}: {} generation", attempt, self.max_attempts, kind);
        progress.on_generation_start(attempt, kind);

        let message =
            generate_cancellable(generator.as_ref(), state.messages(), cancellation_token).await?;
        if !message.is_assistant() {
            return Err(RetryError::Generator(GeneratorError::InvalidResponse(format!(
                "expected an assistant message, got a {} message",
                message.role
            ))));
        }

        debug!(
            "Attempt {} produced {} tool call(s): {}",
            attempt,
            message.tool_calls.len(),
            preview(&message.content, 100)
        );
        progress.on_generation_complete(attempt, &message);
        self.conversation_logger.log(ConversationEvent::new(
            "generation",
            serde_json::json!({
                "mode": self.mode.as_str(),
                "attempt": attempt,
                "generator": kind.as_str(),
                "content": message.content,
                "tool_calls": message.tool_calls,
            }),
        ));

        state.append(message);
        state.record_attempt();
        Ok(())
    }

    fn validate(
        &self,
        state: &mut AttemptState,
        progress: &dyn RetryProgressNotifier,
    ) -> Result<(), RetryError> {
        let attempt = state.attempts();
        let candidate = self.aggregator.aggregate(state.generated())?;

        if let Some(choice) = &self.tool_choice
            && !candidate.has_tool_calls()
        {
            warn!("Attempt {}: tool_choice={} but no tool call was made", attempt, choice);
            let errors = vec![format!("no tool call (tool_choice={})", choice)];
            progress.on_validation_failed(attempt, &errors);
            self.log_validation_failed(attempt, &errors);
            state.push(
                Message::user(format!(
                    "ValidationError: please respond with a valid tool call [tool_choice={}].",
                    choice
                ))
                .as_error(),
            );
            return Ok(());
        }

        let report = self.validation.validate(&candidate);
        if report.is_success() {
            debug!("Attempt {}: candidate passed validation", attempt);
            progress.on_validation_passed(attempt);
            self.conversation_logger.log(ConversationEvent::new(
                "validation_passed",
                serde_json::json!({ "mode": self.mode.as_str(), "attempt": attempt }),
            ));
            state.push(candidate);
            return Ok(());
        }

        let errors: Vec<String> = report
            .errors()
            .map(|e| format!("{} ({}): {}", e.tool_call.name, e.tool_call.id, e.error))
            .collect();
        warn!(
            "Attempt {}/{}: {} tool call(s) failed validation",
            attempt,
            self.max_attempts,
            errors.len()
        );
        progress.on_validation_failed(attempt, &errors);
        self.log_validation_failed(attempt, &errors);
        state.extend(self.validation.error_messages(&report));
        Ok(())
    }

    fn log_validation_failed(&self, attempt: usize, errors: &[String]) {
        self.conversation_logger.log(ConversationEvent::new(
            "validation_failed",
            serde_json::json!({
                "mode": self.mode.as_str(),
                "attempt": attempt,
                "errors": errors,
            }),
        ));
    }

    fn exhausted(&self, state: &AttemptState, progress: &dyn RetryProgressNotifier) -> RetryError {
        let attempts = state.attempts();
        warn!(
            "Retry budget exhausted after {} attempt(s) (max_attempts={})",
            attempts, self.max_attempts
        );
        progress.on_exhausted(attempts, self.max_attempts);
        self.conversation_logger.log(ConversationEvent::new(
            "retry_exhausted",
            serde_json::json!({
                "mode": self.mode.as_str(),
                "attempts": attempts,
                "max_attempts": self.max_attempts,
            }),
        ));
        RetryError::RetryBudgetExhausted {
            attempts,
            max_attempts: self.max_attempts,
        }
    }
}
