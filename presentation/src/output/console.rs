//! Console output formatter for resolved tool calls

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use toolmend_application::{RetryError, RetryOutput};

/// Formats retry results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the resolved message with its tool calls
    pub fn format(output: &RetryOutput) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Resolved Tool Calls"));
        text.push('\n');
        text.push_str(&format!(
            "{} {}\n",
            "Attempts:".cyan().bold(),
            output.attempts
        ));

        let message = &output.message;
        if !message.content.is_empty() {
            text.push_str(&format!("\n{}\n", Self::indent(&message.content, "  ")));
        }

        if message.tool_calls.is_empty() {
            text.push_str(&format!("\n{}\n", "(no tool calls)".dimmed()));
        }

        for call in &message.tool_calls {
            let args = serde_json::to_string_pretty(&call.args).unwrap_or_else(|_| call.args.to_string());
            text.push_str(&format!(
                "\n{} {}\n{}\n",
                format!("── {} ──", call.name).yellow().bold(),
                format!("({})", call.id).dimmed(),
                Self::indent(&args, "  ")
            ));
        }

        text.push_str(&Self::footer());
        text
    }

    /// Format as JSON: `{"attempts": N, "message": {...}}`
    pub fn format_json(output: &RetryOutput) -> String {
        let value = serde_json::json!({
            "attempts": output.attempts,
            "message": output.message,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a failed run for stderr
    pub fn format_error(error: &RetryError) -> String {
        let label = if error.is_exhausted() {
            "Validation failed:"
        } else if error.is_cancelled() {
            "Cancelled:"
        } else {
            "Error:"
        };
        format!("{} {}", label.red().bold(), error)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &RetryOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &RetryOutput) -> String {
        Self::format_json(output)
    }
}
