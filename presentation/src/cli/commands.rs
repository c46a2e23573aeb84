//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use toolmend_domain::RetryMode;

/// Output format for the resolved message
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary of the tool calls
    Text,
    /// The resolved message as JSON
    Json,
}

/// Correction mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Re-prompt with the validation errors
    Plain,
    /// Ask for JSONPatch corrections of the invalid arguments
    #[value(alias = "json-patch", alias = "patch")]
    Jsonpatch,
}

impl From<ModeArg> for RetryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Plain => RetryMode::Plain,
            ModeArg::Jsonpatch => RetryMode::JsonPatch,
        }
    }
}

/// CLI arguments for toolmend
#[derive(Parser, Debug)]
#[command(name = "toolmend")]
#[command(author, version, about = "Validate LLM tool calls against their schemas and retry until they pass")]
#[command(long_about = r#"
toolmend asks a chat model for tool calls, validates the arguments against
the tools' JSON schemas and feeds any errors back until the calls are valid
or the attempt budget runs out.

Two correction modes are available:
  plain      The model sees its errors and answers again
  jsonpatch  The model sends JSONPatch corrections that are merged into
             its original calls

INPUT is a JSON file (or '-' for stdin) holding either a list of messages
or a prompt ({"text": "..."} or {"messages": [...]}).

Configuration files are loaded from (in priority order):
1. TOOLMEND_<SECTION>__<KEY>             Environment overrides
2. --config <path>                        Explicit config file
3. ./toolmend.toml                        Project-level config
4. ~/.config/toolmend/config.toml         Global config

Example:
  toolmend --tools tools.json conversation.json
  toolmend --tools tools.json --mode jsonpatch --tool-choice Respond prompt.json
  toolmend --tools tools.json --replay recorded.jsonl conversation.json
"#)]
pub struct Cli {
    /// Conversation or prompt JSON file ('-' reads stdin)
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// JSON file with the tool schemas to bind
    #[arg(short, long, value_name = "PATH", required_unless_present = "show_config")]
    pub tools: Option<PathBuf>,

    /// Replay recorded assistant messages instead of calling a model
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,

    /// Correction mode (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum generation attempts (overrides config)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<usize>,

    /// Force the model to call this tool ("any" forces some tool)
    #[arg(long, value_name = "NAME")]
    pub tool_choice: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write operation logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
