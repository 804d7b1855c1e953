use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "modopt.yaml";

/// Prefix of environment variables that override the configuration
pub const ENV_PREFIX: &str = "MODOPT";

/// Application configuration.
///
/// Sources are layered, later ones winning:
/// 1. built-in defaults
/// 2. the YAML config file, if present
/// 3. `MODOPT_*` environment variables (e.g. `MODOPT_DEBUG_MODE=true`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory holding one sub-directory per mod
    pub mod_root: Utf8PathBuf,

    pub log_dir: Utf8PathBuf,
    pub log_prefix: String,
    pub debug_mode: bool,
    pub console_output: bool,

    /// Buffer size of the change event channel
    pub event_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mod_root: Utf8PathBuf::from("mods"),
            log_dir: Utf8PathBuf::from("logs"),
            log_prefix: "modopt".to_string(),
            debug_mode: false,
            console_output: true,
            event_capacity: 100,
        }
    }
}

impl EditorConfig {
    /// Load the configuration from `path` (optional file) and the environment.
    ///
    /// Runs before logging is set up, so it does not log.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("mod_root", defaults.mod_root.as_str())?
            .set_default("log_dir", defaults.log_dir.as_str())?
            .set_default("log_prefix", defaults.log_prefix.as_str())?
            .set_default("debug_mode", defaults.debug_mode)?
            .set_default("console_output", defaults.console_output)?
            .set_default("event_capacity", defaults.event_capacity as i64)?
            .add_source(File::new(path.as_str(), FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path))?;

        config
            .try_deserialize()
            .with_context(|| format!("Failed to parse configuration from {}", path))
    }

    /// Write this configuration as YAML
    pub fn save<P: AsRef<Utf8Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config to YAML")?;

        std::fs::write(path, yaml).with_context(|| format!("Failed to write config: {}", path))?;

        tracing::info!("Saved config to {}", path);
        Ok(())
    }
}
