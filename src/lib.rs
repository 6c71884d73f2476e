//! Pyramid Hop - a tile-hopping arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pyramid graph, player, enemies, collisions)
//! - `settings`: Data-driven game tuning
//!
//! Rendering, audio, haptics and input widgets live outside this crate and talk
//! to it through [`sim::tick`], [`sim::GameState`] and the drained [`sim::GameEvent`] queue.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

use sim::TileIndex;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default pyramid height
    pub const DEFAULT_ROWS: u32 = 7;
    /// Smallest pyramid that still has a disk row above the base
    pub const MIN_ROWS: u32 = 2;
    /// Tallest pyramid the settings accept
    pub const MAX_ROWS: u32 = 64;
    /// Reverters never spawn above this row
    pub const MIN_REVERTER_ROW: u32 = 2;
    pub const STARTING_LIVES: u8 = 3;

    /// Player timings (seconds)
    pub const HOP_DURATION: f32 = 0.2;
    pub const FALL_DURATION: f32 = 0.8;

    /// Enemy timings (seconds)
    pub const ENEMY_CADENCE: f32 = 0.35;
    pub const PURSUER_CADENCE: f32 = 0.25;
    pub const HATCH_DURATION: f32 = 1.5;

    /// Tile progress never needs more than this many hops
    pub const MAX_TARGET_STEP: u32 = 3;
    pub const MIN_TARGET_STEP: u32 = 2;

    /// Vertical spacing between rows relative to tile size
    pub const ROW_SPACING: f32 = 0.88;
}

/// Project a tile index onto the 2-D plane (apex at origin, rows grow downward,
/// column 0 on the left edge).
///
/// Off-pyramid indices (disk slots) project the same way, so adapters can place
/// disks with this too.
#[inline]
pub fn tile_center(index: TileIndex, tile_size: f32) -> Vec2 {
    let x = (index.column * 2 - index.row) as f32 * tile_size / 2.0;
    let y = -(index.row as f32) * tile_size * consts::ROW_SPACING;
    Vec2::new(x, y)
}
