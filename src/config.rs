use std::path::Path;

use log::warn;

use crate::error::ConfigError;
use crate::evaluator::DEFAULT_CENTER_WEIGHT;
use crate::search::{DEFAULT_MAX_DEPTH, WIN_SCORE};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub simulation: SimulationConfig,
}

/// Settings for the minimax agent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below each candidate move before falling back to the evaluator
    pub max_depth: usize,
    /// Points per token in the centre column
    pub center_weight: i32,
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            center_weight: DEFAULT_CENTER_WEIGHT,
            pruning: true,
        }
    }
}

/// Settings for batch bot-versus-bot games.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub games: usize,
    pub parallel: bool,
    pub progress: bool,
    /// Seeds the random agents; each game derives its own stream from it
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 100,
            parallel: true,
            progress: true,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_depth == 0 {
            return Err(ConfigError::Validation(
                "search.max_depth must be >= 1".into(),
            ));
        }
        if self.search.max_depth >= WIN_SCORE as usize {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be < {}",
                WIN_SCORE
            )));
        }
        if self.search.center_weight < 0 {
            return Err(ConfigError::Validation(
                "search.center_weight must be >= 0".into(),
            ));
        }
        if self.simulation.games == 0 {
            return Err(ConfigError::Validation(
                "simulation.games must be > 0".into(),
            ));
        }
        Ok(())
    }
}
