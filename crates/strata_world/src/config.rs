//! # World Configuration
//!
//! Tunables loaded once at startup. Every field has a default, so a config
//! file only needs the values it changes:
//!
//! ```toml
//! seed = 42
//! render_distance = 4
//!
//! [motion]
//! jump_velocity = 30.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::seed::WorldSeed;

/// Movement tunables shared by every kinematic body.
///
/// Speeds are pixels per 60 Hz tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Downward acceleration per tick while airborne.
    pub gravity: f32,
    /// Terminal falling speed.
    pub max_fall_speed: f32,
    /// Upward speed applied by a jump.
    pub jump_velocity: f32,
    /// Horizontal speed cap while walking.
    pub walk_speed: f32,
    /// Horizontal speed gained per tick of walking.
    pub acceleration: f32,
    /// Horizontal speed multiplier per tick without input.
    pub friction: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            gravity: 2.0,
            max_fall_speed: 24.0,
            jump_velocity: 27.0,
            walk_speed: 9.0,
            acceleration: 0.5,
            friction: 0.85,
        }
    }
}

/// World configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of the shared random stream.
    pub seed: u64,
    /// Block edge length in pixels.
    pub block_size: i32,
    /// Chebyshev radius, in chunks, kept generated around the player.
    pub render_distance: i32,
    /// Extra chunks kept resident beyond the render distance.
    pub eviction_margin: i32,
    /// Maximum chunks generated per window update. `None` is unbounded.
    pub generation_budget: Option<usize>,
    /// Movement tunables.
    pub motion: MotionConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default().value(),
            block_size: 32,
            render_distance: 3,
            eviction_margin: 2,
            generation_budget: None,
            motion: MotionConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration with a specific seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML and `InvalidConfig` for values
    /// the engine cannot use.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigRead` if the file cannot be read, otherwise the same
    /// errors as [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.block_size <= 0 {
            return Err(invalid("block_size must be positive"));
        }
        if self.render_distance < 0 {
            return Err(invalid("render_distance must not be negative"));
        }
        if self.eviction_margin < 0 {
            return Err(invalid("eviction_margin must not be negative"));
        }
        if self.generation_budget == Some(0) {
            return Err(invalid("generation_budget must be at least 1"));
        }

        let motion = &self.motion;
        if motion.gravity < 0.0 || motion.max_fall_speed <= 0.0 {
            return Err(invalid("gravity and max_fall_speed must be positive"));
        }
        if motion.walk_speed <= 0.0 || motion.acceleration <= 0.0 {
            return Err(invalid("walk_speed and acceleration must be positive"));
        }
        if !(0.0..=1.0).contains(&motion.friction) {
            return Err(invalid("friction must be within 0.0..=1.0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> WorldError {
    WorldError::InvalidConfig(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.seed, 0xDEAD_BEEF_CAFE_BABE);
        assert_eq!(config.block_size, 32);
        assert_eq!(config.render_distance, 3);
        assert_eq!(config.eviction_margin, 2);
        assert_eq!(config.generation_budget, None);
        assert_eq!(config.motion.jump_velocity, 27.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            seed = 42
            generation_budget = 4

            [motion]
            gravity = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.generation_budget, Some(4));
        assert_eq!(config.motion.gravity, 1.5);
        assert_eq!(config.motion.walk_speed, 9.0);
        assert_eq!(config.block_size, 32);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(WorldConfig::from_toml_str("").unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_malformed_toml() {
        let err = WorldConfig::from_toml_str("seed = \"many\"").unwrap_err();
        assert!(matches!(err, WorldError::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = WorldConfig::from_toml_str("block_size = 0").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));

        let err = WorldConfig::from_toml_str("[motion]\nfriction = 1.5").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = WorldConfig::from_toml_file("/nonexistent/strata.toml").unwrap_err();
        match err {
            WorldError::ConfigRead { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/strata.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
