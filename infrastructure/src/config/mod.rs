//! Configuration file loading for toolmend
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLMEND_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolmend.toml` or `./.toolmend.toml`
//! 4. Global: `~/.config/toolmend/config.toml` (platform config dir)
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileConfig, FileLoggingConfig, FileModelConfig,
    FileRetryConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
