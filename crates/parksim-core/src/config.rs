//! Configuration management for parksim.
//!
//! Loads configuration from ${PARKSIM_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for parksim configuration.
    //!
    //! PARKSIM_HOME resolution order:
    //! 1. PARKSIM_HOME environment variable (if set)
    //! 2. ~/.config/parksim (default)
    //! 3. ./.parksim when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the parksim home directory.
    pub fn parksim_home() -> PathBuf {
        if let Ok(home) = std::env::var("PARKSIM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".parksim"),
            |h| h.join(".config").join("parksim"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        parksim_home().join("config.toml")
    }
}

/// Settings for the randomized automatic mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutomaticConfig {
    /// Pause between readings in milliseconds
    pub interval_ms: u64,
    /// Lower bound (inclusive) of a regular reading
    pub base_min_cm: u32,
    /// Upper bound (inclusive) of a regular reading
    pub base_max_cm: u32,
    /// Probability that a reading is replaced by an obstacle reading
    pub obstacle_probability: f64,
    /// Lower bound (inclusive) of an obstacle reading
    pub obstacle_min_cm: u32,
    /// Upper bound (inclusive) of an obstacle reading
    pub obstacle_max_cm: u32,
    /// Stop after this many readings; `None` runs until interrupted
    #[serde(default)]
    pub max_readings: Option<u64>,
}

impl AutomaticConfig {
    const DEFAULT_INTERVAL_MS: u64 = 800;
    const DEFAULT_BASE_MIN_CM: u32 = 10;
    const DEFAULT_BASE_MAX_CM: u32 = 250;
    const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.3;
    const DEFAULT_OBSTACLE_MIN_CM: u32 = 0;
    const DEFAULT_OBSTACLE_MAX_CM: u32 = 79;

    /// Returns the pause between readings.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Checks ranges and probability.
    ///
    /// # Errors
    /// Returns an error if a range is inverted or the probability is outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.base_min_cm > self.base_max_cm {
            bail!(
                "automatic.base_min_cm ({}) must not exceed automatic.base_max_cm ({})",
                self.base_min_cm,
                self.base_max_cm
            );
        }
        if self.obstacle_min_cm > self.obstacle_max_cm {
            bail!(
                "automatic.obstacle_min_cm ({}) must not exceed automatic.obstacle_max_cm ({})",
                self.obstacle_min_cm,
                self.obstacle_max_cm
            );
        }
        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            bail!(
                "automatic.obstacle_probability must be between 0 and 1, got {}",
                self.obstacle_probability
            );
        }
        Ok(())
    }
}

impl Default for AutomaticConfig {
    fn default() -> Self {
        Self {
            interval_ms: Self::DEFAULT_INTERVAL_MS,
            base_min_cm: Self::DEFAULT_BASE_MIN_CM,
            base_max_cm: Self::DEFAULT_BASE_MAX_CM,
            obstacle_probability: Self::DEFAULT_OBSTACLE_PROBABILITY,
            obstacle_min_cm: Self::DEFAULT_OBSTACLE_MIN_CM,
            obstacle_max_cm: Self::DEFAULT_OBSTACLE_MAX_CM,
            max_readings: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV file readings are appended to
    pub log_file: String,

    /// Automatic mode settings
    #[serde(default)]
    pub automatic: AutomaticConfig,
}

impl Config {
    const DEFAULT_LOG_FILE: &str = "parking_log.csv";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };

        config
            .automatic
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: Self::DEFAULT_LOG_FILE.to_string(),
            automatic: AutomaticConfig::default(),
        }
    }
}
