//! Progress reporting for the retry loop

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolmend_application::{GenerationKind, RetryProgressNotifier};
use toolmend_domain::Message;

/// Reports progress with a spinner on stderr
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryProgressNotifier for ProgressReporter {
    fn on_generation_start(&self, attempt: usize, kind: GenerationKind) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Attempt {}", attempt));
        pb.set_message(format!("waiting for {} generation...", kind));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_generation_complete(&self, _attempt: usize, message: &Message) {
        self.with_spinner(|pb| {
            pb.set_message(format!("validating {} tool call(s)...", message.tool_calls.len()))
        });
    }

    fn on_validation_passed(&self, attempt: usize) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_with_message(format!("{} attempt {} passed validation", "v".green(), attempt));
        }
    }

    fn on_validation_failed(&self, attempt: usize, errors: &[String]) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_with_message(format!(
                "{} attempt {}: {} error(s)",
                "x".red(),
                attempt,
                errors.len()
            ));
            for error in errors {
                pb.println(format!("    {}", error.dimmed()));
            }
        }
    }

    fn on_exhausted(&self, attempts: usize, max_attempts: usize) {
        if let Some(pb) = self.take_spinner() {
            pb.abandon_with_message(format!(
                "{} gave up after {}/{} attempts",
                "x".red(),
                attempts,
                max_attempts
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RetryProgressNotifier for SimpleProgress {
    fn on_generation_start(&self, attempt: usize, kind: GenerationKind) {
        eprintln!(
            "{} {} ({} generation)",
            "->".cyan(),
            format!("Attempt {}", attempt).bold(),
            kind
        );
    }

    fn on_validation_passed(&self, _attempt: usize) {
        eprintln!("  {} valid", "v".green());
    }

    fn on_validation_failed(&self, _attempt: usize, errors: &[String]) {
        for error in errors {
            eprintln!("  {} {}", "x".red(), error);
        }
    }

    fn on_complete(&self, attempts: usize) {
        eprintln!("{} done after {} attempt(s)", "->".cyan(), attempts);
    }

    fn on_exhausted(&self, attempts: usize, max_attempts: usize) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            format!("gave up after {}/{} attempts", attempts, max_attempts).red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_survives_full_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_generation_start(1, GenerationKind::Primary);
        reporter.on_generation_complete(1, &Message::assistant("x"));
        reporter.on_validation_failed(1, &["Respond (c1): missing".to_string()]);
        reporter.on_generation_start(2, GenerationKind::Fallback);
        reporter.on_validation_passed(2);
        reporter.on_complete(2);
        assert!(reporter.take_spinner().is_none());
    }

    #[test]
    fn test_new_generation_replaces_unfinished_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_generation_start(1, GenerationKind::Primary);
        reporter.on_generation_start(2, GenerationKind::Fallback);
        let pb = reporter.take_spinner().unwrap();
        assert_eq!(pb.prefix(), "Attempt 2");
        pb.finish_and_clear();
    }
}
