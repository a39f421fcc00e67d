//! Tunable session parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest column or row count that still fits the border and spawn clear-zone.
pub const MIN_GRID_EXTENT: u32 = 4;

/// How many lives a single detonation may take.
///
/// The blast checks the player against every cell it covers, so one bomb can
/// register several overlaps when the player stands between two cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamagePolicy {
    /// At most one life is lost per detonation regardless of overlaps.
    #[default]
    OncePerDetonation,
    /// One life is lost for every overlapping blast cell.
    OncePerCell,
}

/// Parameters that shape a session. Missing fields fall back to [`Default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cell columns in generated maps.
    pub columns: u32,
    /// Number of cell rows in generated maps.
    pub rows: u32,
    /// Side length of one cell measured in world units.
    pub tile_length: f32,
    /// Fuse length in milliseconds.
    pub fuse_ms: u64,
    /// Lives granted at the start of a session.
    pub initial_lives: u32,
    /// Bomb limit at the start of a session.
    pub initial_max_bombs: u32,
    /// Chance that a free interior cell receives a breakable wall.
    pub breakable_probability: f64,
    /// Chance that a destroyed wall leaves a power-up behind.
    pub power_up_probability: f64,
    /// Score awarded per destroyed wall.
    pub points_per_wall: u32,
    /// Seed feeding map generation and power-up rolls.
    pub seed: u64,
    /// Damage accounting applied to multi-cell overlaps.
    pub damage_policy: DamagePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 13,
            rows: 11,
            tile_length: 32.0,
            fuse_ms: 4_000,
            initial_lives: 3,
            initial_max_bombs: 1,
            breakable_probability: 0.7,
            power_up_probability: 0.25,
            points_per_wall: 10,
            seed: 0x5eed_b0b0_2d2d_2d2d,
            damage_policy: DamagePolicy::OncePerDetonation,
        }
    }
}

impl GameConfig {
    /// Fuse length as a duration.
    #[must_use]
    pub const fn fuse(&self) -> Duration {
        Duration::from_millis(self.fuse_ms)
    }

    /// Checks every field against the ranges the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_GRID_EXTENT || self.rows < MIN_GRID_EXTENT {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !self.tile_length.is_finite() || self.tile_length <= 0.0 {
            return Err(ConfigError::InvalidTileLength(self.tile_length));
        }
        if self.fuse_ms == 0 {
            return Err(ConfigError::ZeroFuse);
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.initial_max_bombs == 0 {
            return Err(ConfigError::NoBombs);
        }
        check_probability("breakable_probability", self.breakable_probability)?;
        check_probability("power_up_probability", self.power_up_probability)?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

/// Reasons a [`GameConfig`] is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot hold the border plus the spawn clear-zone.
    #[error("grid {columns}x{rows} is smaller than the {}x{} minimum", MIN_GRID_EXTENT, MIN_GRID_EXTENT)]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Tile length must be a positive finite number.
    #[error("tile length {0} must be positive and finite")]
    InvalidTileLength(f32),
    /// Bombs need a non-zero fuse.
    #[error("fuse must be longer than zero milliseconds")]
    ZeroFuse,
    /// Sessions start with at least one life.
    #[error("initial lives must be at least one")]
    NoLives,
    /// Sessions start with at least one bomb.
    #[error("initial bomb limit must be at least one")]
    NoBombs,
    /// Probabilities live in `0.0..=1.0`.
    #[error("{field} = {value} is outside 0.0..=1.0")]
    ProbabilityOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f64,
    },
}
