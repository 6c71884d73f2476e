//! Events emitted during a simulation tick.
//!
//! The presentation, haptics and audio adapters drain these from
//! [`GameState::drain_events`](super::GameState::drain_events) after each frame.

use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::pyramid::TileIndex;
use super::state::DiskSide;

/// Discrete cues for haptics and sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackEvent {
    /// Player left a tile
    Jump,
    /// Player stepped off the pyramid or was caught
    Danger,
    /// Pyramid finished or disk reached
    LevelComplete,
    LifeLost,
}

/// Why an enemy left the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Walked off the base of the pyramid
    Escaped,
    /// Harmful enemy reached the player
    CaughtPlayer,
    /// Collectible picked up
    Collected,
    /// Reverter touched the player and wiped the colors
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    RoundChanged(u32),
    LivesChanged(u8),
    /// A tile's displayed color index changed
    TileChanged { index: TileIndex, visual_step: u32 },
    /// Every tile repainted to its starting color
    TilesReverted,
    /// Player started a hop (toward a tile or a disk)
    PlayerHopStarted { from: TileIndex, to: TileIndex },
    PlayerLanded { tile: TileIndex },
    /// Player stepped off the pyramid
    PlayerFalling { from: TileIndex },
    /// Player placed without a hop (respawn, disk ride, new round)
    PlayerRepositioned { tile: TileIndex },
    EnemySpawned { id: u32, kind: EnemyKind, tile: TileIndex },
    EnemyMoved { id: u32, tile: TileIndex },
    /// Pursuer left its dormant phase
    EnemyHatched { id: u32 },
    EnemyRemoved { id: u32, reason: RemovalReason },
    /// Every enemy removed at once (new round or game reset)
    EnemiesCleared,
    DiskConsumed { side: DiskSide },
    Feedback(FeedbackEvent),
    Paused,
    Resumed,
    /// Audio adapter: start music
    SessionStarted,
    /// Audio adapter: stop music
    SessionEnded,
}
