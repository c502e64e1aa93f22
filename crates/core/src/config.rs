//! Game configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BLOCKFALL_BASE_DROP_MS` | 1000 | Gravity interval at level 1 |
//! | `BLOCKFALL_SPEED_FACTOR` | 0.75 | Interval multiplier per level, in (0, 1] |
//! | `BLOCKFALL_SEED` | unset | Fixed seed for the piece generator |
//! | `BLOCKFALL_LOG` | unset | Log file path (read by the binary) |
//!
//! Empty values count as unset. Board dimensions are fixed.

use thiserror::Error;

use crate::scoring::drop_interval_ms;
use crate::types::{BASE_DROP_MS, SPEED_FACTOR};

pub const ENV_BASE_DROP_MS: &str = "BLOCKFALL_BASE_DROP_MS";
pub const ENV_SPEED_FACTOR: &str = "BLOCKFALL_SPEED_FACTOR";
pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_LOG_PATH: &str = "BLOCKFALL_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?} as a number")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: {value} is out of range")]
    OutOfRange { var: &'static str, value: String },
}

/// Tunables for a game session
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Gravity interval at level 1, in milliseconds
    pub base_drop_ms: u32,
    /// Each level multiplies the interval by this factor
    pub speed_factor: f64,
    /// Fixed piece generator seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_drop_ms: BASE_DROP_MS,
            speed_factor: SPEED_FACTOR,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = Self::default();

        if let Some(value) = get(ENV_BASE_DROP_MS) {
            config.base_drop_ms = parse(ENV_BASE_DROP_MS, value)?;
        }
        if let Some(value) = get(ENV_SPEED_FACTOR) {
            config.speed_factor = parse(ENV_SPEED_FACTOR, value)?;
        }
        if let Some(value) = get(ENV_SEED) {
            config.seed = Some(parse(ENV_SEED, value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_drop_ms == 0 {
            return Err(ConfigError::OutOfRange {
                var: ENV_BASE_DROP_MS,
                value: self.base_drop_ms.to_string(),
            });
        }
        if !(self.speed_factor > 0.0 && self.speed_factor <= 1.0) {
            return Err(ConfigError::OutOfRange {
                var: ENV_SPEED_FACTOR,
                value: self.speed_factor.to_string(),
            });
        }
        Ok(())
    }

    /// Gravity interval at `level` under this configuration.
    pub fn drop_interval_ms(&self, level: u32) -> u32 {
        drop_interval_ms(self.base_drop_ms, self.speed_factor, level)
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}
