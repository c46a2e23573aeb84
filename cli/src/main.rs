//! CLI entrypoint for toolmend
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use toolmend_application::{
    ChatModel, NoRetryProgress, RetryParams, RetryProgressNotifier, bind_validator,
};
use toolmend_domain::RetryMode;
use toolmend_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolValidator, JsonlConversationLogger, ReplayChatModel,
    load_tool_schemas,
};
use toolmend_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting toolmend");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    for warning in config.check()? {
        warn!("Config: {}", warning.message);
    }
    let params = retry_params(&config, &cli);

    // === Dependency Injection ===
    let tools_path = cli
        .tools
        .as_ref()
        .context("--tools is required")?;
    let tools = load_tool_schemas(tools_path)?;
    info!("Loaded {} tool(s) from {}", tools.len(), tools_path.display());

    let model = build_model(&cli, &config)?;
    let mut use_case = bind_validator(
        model,
        Arc::new(JsonSchemaToolValidator::new()),
        tools,
        &params,
    )?;
    if let Some(path) = config.logging.conversation_log_path()
        && let Some(logger) = JsonlConversationLogger::new(&path)
    {
        info!("Writing conversation log to {}", path.display());
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let input = read_input(&cli.input)?;

    // Ctrl-C abandons the in-flight generation
    let cancellation = CancellationToken::new();
    let token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling");
            token.cancel();
        }
    });

    let progress: Box<dyn RetryProgressNotifier> = if cli.quiet {
        Box::new(NoRetryProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    match use_case
        .invoke_json(input, progress.as_ref(), &Some(cancellation))
        .await
    {
        Ok(output) => {
            let text = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format(&output),
                OutputFormat::Json => ConsoleFormatter::format_json(&output),
            };
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Initialize tracing based on verbosity, optionally writing to a file.
///
/// `RUST_LOG`, when set, takes precedence over `-v`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Config values overridden by command-line flags.
fn retry_params(config: &FileConfig, cli: &Cli) -> RetryParams {
    let (mut params, _) = config.retry.to_retry_params();
    if let Some(max) = cli.max_attempts {
        params.max_attempts = max;
    }
    if let Some(mode) = cli.mode {
        params.mode = RetryMode::from(mode);
    }
    if let Some(choice) = &cli.tool_choice {
        params.tool_choice = Some(choice.clone());
    }
    params
}

#[cfg(feature = "http-model")]
fn build_model(cli: &Cli, config: &FileConfig) -> Result<Arc<dyn ChatModel>> {
    use toolmend_infrastructure::{OpenAiChatModel, OpenAiConfig};

    if let Some(path) = &cli.replay {
        return Ok(Arc::new(ReplayChatModel::from_path(path)?));
    }
    let model_config = OpenAiConfig::from_file_config(&config.model)?;
    info!("Using {} at {}", model_config.model, model_config.base_url);
    Ok(Arc::new(OpenAiChatModel::new(model_config)?))
}

#[cfg(not(feature = "http-model"))]
fn build_model(cli: &Cli, _config: &FileConfig) -> Result<Arc<dyn ChatModel>> {
    match &cli.replay {
        Some(path) => Ok(Arc::new(ReplayChatModel::from_path(path)?)),
        None => anyhow::bail!("Built without the http-model feature; pass --replay <PATH>"),
    }
}

/// Read the conversation JSON from a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<serde_json::Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read input from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?
    };
    serde_json::from_str(&text).context("Input is not valid JSON")
}
