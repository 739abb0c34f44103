//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside a config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// LOD fix pass settings.
    pub fix: FixConfig,
    /// Where and how fixed scenes are written.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// LOD fix pass configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FixConfig {
    /// Deepest hierarchy accepted before the pass refuses to run.
    pub max_depth: usize,
    /// Run the fix and report, but do not write the result.
    pub dry_run: bool,
    /// After the fix, set the last level of every group to a transition
    /// height of 0 so groups never cull out at distance.
    pub last_level_always_visible: bool,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the fixed scene back over the input file.
    pub overwrite_input: bool,
    /// Suffix appended to the input file stem when not overwriting.
    pub suffix: String,
    /// Pretty-print the written RON.
    pub pretty: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "debug", "info", "warn,trian_lod=debug").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            dry_run: false,
            last_level_always_visible: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overwrite_input: false,
            suffix: "_lodfixed".to_string(),
            pretty: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Re-read the config file: returns `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Check that every setting holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fix.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fix.max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.output.overwrite_input && self.output.suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.suffix",
                reason: "must not be empty unless overwrite_input is set".to_string(),
            });
        }
        Ok(())
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
