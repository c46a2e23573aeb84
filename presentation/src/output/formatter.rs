//! Output formatter trait

use toolmend_application::RetryOutput;

/// Trait for formatting retry loop results
pub trait OutputFormatter {
    /// Human-readable summary
    fn format(&self, output: &RetryOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &RetryOutput) -> String;
}
