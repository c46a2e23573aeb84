//! Shared utilities for use cases.
//!
//! Cancellation checking and cancellable generation calls.

use crate::ports::generator::Generator;
use crate::use_cases::validate_with_retries::RetryError;
use tokio_util::sync::CancellationToken;
use toolmend_domain::Message;

/// Check if cancellation has been requested.
///
/// Returns `Err(RetryError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RetryError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RetryError::Cancelled);
    }
    Ok(())
}

/// Run one generation call, abandoning it as soon as the token is cancelled.
///
/// A cancelled call produces no message; the caller must not record an
/// attempt for it.
pub(crate) async fn generate_cancellable(
    generator: &dyn Generator,
    messages: &[Message],
    cancellation_token: &Option<CancellationToken>,
) -> Result<Message, RetryError> {
    check_cancelled(cancellation_token)?;

    match cancellation_token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(RetryError::Cancelled),
                result = generator.generate(messages) => result.map_err(RetryError::Generator),
            }
        }
        None => generator
            .generate(messages)
            .await
            .map_err(RetryError::Generator),
    }
}
