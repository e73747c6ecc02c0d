//! Environment configuration.
//!
//! LMDB fixes both the maximum map size and the number of named databases when
//! the environment is opened, so they are the only knobs exposed here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Granularity the map size is rounded up to.
pub const PAGE_GRANULARITY: usize = 4096;

/// Default maximum map size: 1 GiB.
const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

/// Default maximum number of named collections.
const DEFAULT_MAX_COLLECTIONS: u32 = 10;

/// Configuration validation errors.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

/// Parameters an [`Environment`](crate::Environment) is opened with.
///
/// # Validation Rules
///
/// - `map_size` must be > 0 and no closer to `usize::MAX` than one page
/// - `max_collections` must be >= 1
///
/// # Example
///
/// ```no_run
/// # use stowage::EnvironmentConfig;
/// let config = EnvironmentConfig::builder()
///     .map_size(64 * 1024 * 1024)
///     .max_collections(4)
///     .build()
///     .expect("valid environment config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnvironmentConfig {
    /// Maximum size of the memory map, in bytes. Rounded up to a multiple of
    /// [`PAGE_GRANULARITY`] when the environment is opened.
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    /// Maximum number of named collections in the environment.
    #[serde(default = "default_max_collections")]
    pub max_collections: u32,
}

#[bon::bon]
impl EnvironmentConfig {
    /// Creates a new environment configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a value is out of range.
    #[builder]
    pub fn new(
        #[builder(default = default_map_size())] map_size: usize,
        #[builder(default = default_max_collections())] max_collections: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self { map_size, max_collections };
        config.validate()?;
        Ok(config)
    }
}

impl EnvironmentConfig {
    /// Validates the configuration values.
    ///
    /// Call after deserialization to ensure values are within valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size == 0 || self.map_size > usize::MAX - PAGE_GRANULARITY {
            return Err(ConfigError::Validation {
                message: format!("map_size must be between 1 and usize::MAX - {PAGE_GRANULARITY}, got {}", self.map_size),
            });
        }
        if self.max_collections == 0 {
            return Err(ConfigError::Validation {
                message: "max_collections must be >= 1, got 0".to_string(),
            });
        }
        Ok(())
    }

    /// The map size rounded up to the next multiple of [`PAGE_GRANULARITY`].
    #[must_use]
    pub fn rounded_map_size(&self) -> usize {
        match self.map_size % PAGE_GRANULARITY {
            0 => self.map_size,
            rem => self.map_size + (PAGE_GRANULARITY - rem),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self { map_size: default_map_size(), max_collections: default_max_collections() }
    }
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_max_collections() -> u32 {
    DEFAULT_MAX_COLLECTIONS
}
