//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: &[&str] = &["toolmend.toml", ".toolmend.toml"];

/// Prefix of environment variable overrides (`TOOLMEND_RETRY__MAX_ATTEMPTS=5`).
pub const ENV_PREFIX: &str = "TOOLMEND_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TOOLMEND_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolmend.toml` or `./.toolmend.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolmend/config.toml` (or platform equivalent)
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        Self::figment(config_path, Self::global_config_path().as_deref(), Path::new("."))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Build the merged figment, resolving project files relative to `project_dir`.
    fn figment(config_path: Option<&PathBuf>, global: Option<&Path>, project_dir: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(path) = Self::find_project_config(project_dir) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `<config dir>/toolmend/config.toml`, e.g.
    /// `~/.config/toolmend/config.toml` on Linux.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolmend").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::find_project_config(Path::new("."))
    }

    fn find_project_config(dir: &Path) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./toolmend.toml or ./.toolmend.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use toolmend_domain::RetryMode;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.model.model.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("toolmend"));
    }

    #[test]
    fn test_later_sources_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[retry]\nmax_attempts = 7\nmode = \"jsonpatch\"\n[model]\nmodel = \"global-model\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("toolmend.toml"),
            "[model]\nmodel = \"project-model\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[retry]\nmax_attempts = 2\n").unwrap();

        let config: FileConfig =
            ConfigLoader::figment(Some(&explicit), Some(&global), dir.path())
                .extract()
                .unwrap();

        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.mode.parse::<RetryMode>().unwrap(), RetryMode::JsonPatch);
        assert_eq!(config.model.model.as_deref(), Some("project-model"));
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let config: FileConfig = ConfigLoader::figment(None, Some(&missing), dir.path())
            .extract()
            .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_hidden_project_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".toolmend.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::find_project_config(dir.path()),
            Some(dir.path().join(".toolmend.toml"))
        );
    }
}
