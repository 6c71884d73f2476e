//! Player controller
//!
//! Hops and falls are timed transitions polled by the tick rather than
//! callbacks. At most one is in flight; moves queued meanwhile wait in FIFO order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::pyramid::{Direction, TileIndex};

/// What the player is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerMotion {
    Idle,
    /// In the air between two tiles (or a tile and a disk)
    Hopping {
        from: TileIndex,
        to: TileIndex,
        elapsed: f32,
    },
    /// Stepped off the pyramid; the life is lost when the fall ends
    Falling { from: TileIndex, elapsed: f32 },
}

/// A timed transition that finished this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionComplete {
    Landed(TileIndex),
    Fell,
}

/// The player's position and move queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Tile the player stands on (origin tile while hopping)
    pub tile: TileIndex,
    pending: VecDeque<Direction>,
    motion: PlayerMotion,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(TileIndex::APEX)
    }
}

impl Player {
    pub fn new(tile: TileIndex) -> Self {
        Self {
            tile,
            pending: VecDeque::new(),
            motion: PlayerMotion::Idle,
        }
    }

    pub fn motion(&self) -> PlayerMotion {
        self.motion
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.motion, PlayerMotion::Idle)
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.motion, PlayerMotion::Falling { .. })
    }

    /// Queued moves, oldest first
    pub fn pending_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().copied()
    }

    pub fn enqueue(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    /// Next move to resolve, if nothing is in flight
    pub fn take_next_move(&mut self) -> Option<Direction> {
        if !self.is_idle() {
            return None;
        }
        self.pending.pop_front()
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn begin_hop(&mut self, to: TileIndex) {
        self.motion = PlayerMotion::Hopping {
            from: self.tile,
            to,
            elapsed: 0.0,
        };
    }

    pub fn begin_fall(&mut self) {
        self.motion = PlayerMotion::Falling {
            from: self.tile,
            elapsed: 0.0,
        };
    }

    /// Put the player on a tile, cancelling any hop or fall in flight
    pub fn place(&mut self, tile: TileIndex) {
        self.tile = tile;
        self.motion = PlayerMotion::Idle;
    }

    /// Advance the in-flight transition. Fires exactly once per transition.
    pub fn update(&mut self, dt: f32, hop_duration: f32, fall_duration: f32) -> Option<MotionComplete> {
        match &mut self.motion {
            PlayerMotion::Idle => None,
            PlayerMotion::Hopping { to, elapsed, .. } => {
                *elapsed += dt;
                if *elapsed < hop_duration {
                    return None;
                }
                let to = *to;
                self.tile = to;
                self.motion = PlayerMotion::Idle;
                Some(MotionComplete::Landed(to))
            }
            PlayerMotion::Falling { elapsed, .. } => {
                *elapsed += dt;
                if *elapsed < fall_duration {
                    return None;
                }
                self.motion = PlayerMotion::Idle;
                Some(MotionComplete::Fell)
            }
        }
    }
}
