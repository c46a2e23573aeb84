//! Progress notification port
//!
//! Defines the interface for reporting progress through the retry loop.

use toolmend_domain::Message;

/// Which generator produced an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Primary,
    Fallback,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Primary => "primary",
            GenerationKind::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during a retry loop
///
/// Implementations live in the presentation layer. Every method has a
/// no-op default.
pub trait RetryProgressNotifier: Send + Sync {
    /// Called before a generation call; `attempt` is 1-based.
    fn on_generation_start(&self, _attempt: usize, _kind: GenerationKind) {}

    /// Called with the freshly generated message.
    fn on_generation_complete(&self, _attempt: usize, _message: &Message) {}

    /// Called when the candidate passes validation.
    fn on_validation_passed(&self, _attempt: usize) {}

    /// Called with one line per problem when the candidate is rejected.
    fn on_validation_failed(&self, _attempt: usize, _errors: &[String]) {}

    /// Called once the loop has produced its answer.
    fn on_complete(&self, _attempts: usize) {}

    /// Called when the attempt budget runs out.
    fn on_exhausted(&self, _attempts: usize, _max_attempts: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoRetryProgress;

impl RetryProgressNotifier for NoRetryProgress {}
