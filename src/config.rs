use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;
use crate::random::SpawnPolicy;

/// Settings for a play session, loadable from TOML.
///
/// ```toml
/// seed = 42
/// max_moves = 5000
///
/// [spawn]
/// four_in = 9
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    /// Seed for the spawn generator; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub spawn: SpawnPolicy,

    /// Cap on moves in automatic play.
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            spawn: SpawnPolicy::default(),
            max_moves: defaults::max_moves(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Apply command-line values on top of this config. `None` keeps the
    /// current setting.
    pub fn with_overrides(
        mut self,
        seed: Option<u64>,
        four_in: Option<u32>,
        max_moves: Option<u64>,
    ) -> Result<Self, EngineError> {
        if let Some(seed) = seed {
            self.seed = Some(seed);
        }
        if let Some(four_in) = four_in {
            self.spawn = SpawnPolicy::new(four_in)?;
        }
        if let Some(max_moves) = max_moves {
            self.max_moves = max_moves;
        }
        Ok(self)
    }
}

mod defaults {
    pub fn max_moves() -> u64 { 10_000 }
}
