//! Game settings and tuning
//!
//! Every timing, score value and spawn rate the simulation uses. Loaded from JSON
//! (missing fields fall back to defaults) and validated once at construction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a settings block is rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("pyramid needs at least {min} rows, got {rows}")]
    TooFewRows { rows: u32, min: u32 },

    #[error("disk row {disk_row} must lie above the base row of a {rows}-row pyramid")]
    DiskRowOutOfRange { disk_row: u32, rows: u32 },

    #[error("pyramid may have at most {max} rows, got {rows}")]
    TooManyRows { rows: u32, max: u32 },

    #[error("reverter spawn row {row} must be at least {min}")]
    ReverterRowTooHigh { row: u32, min: u32 },

    #[error("{name} must be a positive number of seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },

    #[error("starting lives must be at least 1")]
    NoLives,

    #[error("spawn weights must not all be zero")]
    EmptySpawnWeights,

    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Points awarded by the round/life controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    /// Multiplied by the tile's new step on every advancing hop
    pub step_points: u64,
    /// Landing on a side disk
    pub disk_bonus: u64,
    /// Catching a collectible
    pub collectible_bonus: u64,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            step_points: 25,
            disk_bonus: 500,
            collectible_bonus: 100,
        }
    }
}

/// Relative odds for the timed enemy spawn roll (out of their sum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub descender: u32,
    pub collectible: u32,
    pub pursuer: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            descender: 35,
            collectible: 30,
            pursuer: 35,
        }
    }
}

impl SpawnWeights {
    /// Sum of all weights (wide enough that no combination overflows)
    pub fn total(&self) -> u64 {
        u64::from(self.descender) + u64::from(self.collectible) + u64::from(self.pursuer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between timed spawns on round 0
    pub base_interval: f32,
    /// Interval shrinks by this much per round
    pub interval_decay_per_round: f32,
    /// Interval never drops below this
    pub min_interval: f32,
    /// Delay before the first reverter appears
    pub reverter_first_delay: f32,
    /// Delay between subsequent reverters
    pub reverter_interval: f32,
    /// Row reverters appear on; rows past the base use the base row
    pub reverter_row: u32,
    pub weights: SpawnWeights,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            base_interval: 2.5,
            interval_decay_per_round: 0.25,
            min_interval: 1.2,
            reverter_first_delay: 12.0,
            reverter_interval: 14.0,
            reverter_row: 2,
            weights: SpawnWeights::default(),
        }
    }
}

impl SpawnSettings {
    /// Seconds between timed spawns for the given round
    pub fn interval_for_round(&self, round: u32) -> f32 {
        (self.base_interval - round as f32 * self.interval_decay_per_round).max(self.min_interval)
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pyramid height
    pub rows: u32,
    pub starting_lives: u8,

    // === Player ===
    /// Seconds a hop is in flight
    pub hop_duration: f32,
    /// Seconds between leaving the pyramid and losing the life
    pub fall_duration: f32,

    // === Enemies ===
    /// Seconds between steps for descending enemies (and dormant pursuers)
    pub enemy_cadence: f32,
    /// Seconds between steps for an active pursuer
    pub pursuer_cadence: f32,
    /// Seconds a pursuer stays dormant
    pub hatch_duration: f32,

    // === Disks ===
    /// Row the side disks sit beside; `None` puts them one row above the base
    pub disk_row: Option<u32>,

    pub scoring: ScoreSettings,
    pub spawn: SpawnSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            starting_lives: STARTING_LIVES,

            hop_duration: HOP_DURATION,
            fall_duration: FALL_DURATION,

            enemy_cadence: ENEMY_CADENCE,
            pursuer_cadence: PURSUER_CADENCE,
            hatch_duration: HATCH_DURATION,

            disk_row: None,

            scoring: ScoreSettings::default(),
            spawn: SpawnSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings for a pyramid of the given height
    pub fn with_rows(rows: u32) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Row the disks sit beside
    pub fn effective_disk_row(&self) -> u32 {
        self.disk_row.unwrap_or_else(|| self.rows.saturating_sub(2))
    }

    /// Row reverters spawn on, clamped to the base of small pyramids
    pub fn effective_reverter_row(&self) -> u32 {
        self.spawn.reverter_row.min(self.rows.saturating_sub(1))
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows < MIN_ROWS {
            return Err(SettingsError::TooFewRows {
                rows: self.rows,
                min: MIN_ROWS,
            });
        }

        if self.rows > MAX_ROWS {
            return Err(SettingsError::TooManyRows {
                rows: self.rows,
                max: MAX_ROWS,
            });
        }

        // A disk is reached by hopping up and outward from the row below it
        let disk_row = self.effective_disk_row();
        if disk_row.saturating_add(1) >= self.rows {
            return Err(SettingsError::DiskRowOutOfRange {
                disk_row,
                rows: self.rows,
            });
        }

        if self.spawn.reverter_row < MIN_REVERTER_ROW {
            return Err(SettingsError::ReverterRowTooHigh {
                row: self.spawn.reverter_row,
                min: MIN_REVERTER_ROW,
            });
        }

        let durations = [
            ("hop_duration", self.hop_duration),
            ("fall_duration", self.fall_duration),
            ("enemy_cadence", self.enemy_cadence),
            ("pursuer_cadence", self.pursuer_cadence),
            ("hatch_duration", self.hatch_duration),
            ("spawn.base_interval", self.spawn.base_interval),
            ("spawn.min_interval", self.spawn.min_interval),
            ("spawn.reverter_first_delay", self.spawn.reverter_first_delay),
            ("spawn.reverter_interval", self.spawn.reverter_interval),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidDuration { name, value });
            }
        }
        if !self.spawn.interval_decay_per_round.is_finite() || self.spawn.interval_decay_per_round < 0.0 {
            return Err(SettingsError::InvalidDuration {
                name: "spawn.interval_decay_per_round",
                value: self.spawn.interval_decay_per_round,
            });
        }

        if self.starting_lives == 0 {
            return Err(SettingsError::NoLives);
        }

        if self.spawn.weights.total() == 0 {
            return Err(SettingsError::EmptySpawnWeights);
        }

        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
