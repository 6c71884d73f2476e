//! Enemy actors and their movement policies
//!
//! Every enemy shares the same cadence loop: accumulate time, and once the
//! accumulator reaches the cadence, zero it and take exactly one hop. What
//! differs per kind is the interaction with the player and the policy used to
//! pick the hop. The pursuer additionally swaps policy when it hatches.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::pyramid::{Direction, Pyramid, TileIndex};
use super::state::RngState;

/// Effect of touching the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// Costs a life
    Harmful,
    /// Awards points
    Beneficial,
    /// Wipes tile colors
    Revert,
}

/// Pursuer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuerPhase {
    /// Falls like a descender until the timer runs out
    Dormant { hatch_timer: f32 },
    /// Chases the player
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    RandomDescender,
    Collectible,
    /// Undoes progress on every tile it lands on
    Reverter,
    Pursuer(PursuerPhase),
}

impl EnemyKind {
    pub fn interaction(&self) -> Interaction {
        match self {
            EnemyKind::RandomDescender | EnemyKind::Pursuer(_) => Interaction::Harmful,
            EnemyKind::Collectible => Interaction::Beneficial,
            EnemyKind::Reverter => Interaction::Revert,
        }
    }

    /// Policy used for the next hop
    pub fn policy(&self) -> MovementPolicy {
        match self {
            EnemyKind::Pursuer(PursuerPhase::Active) => MovementPolicy::Pursue,
            _ => MovementPolicy::Descend,
        }
    }

    pub fn is_active_pursuer(&self) -> bool {
        matches!(self, EnemyKind::Pursuer(PursuerPhase::Active))
    }
}

/// How an enemy picks its next tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPolicy {
    /// Random down-left or down-right; escapes off the base
    Descend,
    /// Greedy step toward the player's tile
    Pursue,
}

/// Weight of the on-screen hop length in the pursuit score
const PURSUIT_TIEBREAK: f32 = 0.001;

/// Result of one movement decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Cadence not reached, or nowhere to go
    Stay,
    Moved(TileIndex),
    /// Left the pyramid
    Escaped,
}

impl MovementPolicy {
    pub fn choose(
        self,
        from: TileIndex,
        pyramid: &Pyramid,
        player_tile: TileIndex,
        rng: &mut RngState,
    ) -> Movement {
        match self {
            MovementPolicy::Descend => {
                let Some(&direction) = Direction::DOWNWARD.choose(rng.rng()) else {
                    return Movement::Stay;
                };
                match pyramid.adjacency(from, direction) {
                    Some(next) => Movement::Moved(next),
                    None => Movement::Escaped,
                }
            }
            MovementPolicy::Pursue => {
                let origin = crate::tile_center(from, 1.0);
                let mut best: Option<(f32, TileIndex)> = None;
                for (_, next) in pyramid.neighbors(from) {
                    let hop = crate::tile_center(next, 1.0).distance(origin);
                    let score = next.distance_to(player_tile) + hop * PURSUIT_TIEBREAK;
                    // Strict comparison keeps the first direction on ties
                    if best.is_none_or(|(best_score, _)| score < best_score) {
                        best = Some((score, next));
                    }
                }
                best.map_or(Movement::Stay, |(_, next)| Movement::Moved(next))
            }
        }
    }
}

/// What happened to an enemy during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub movement: Movement,
    /// Pursuer switched to its active phase this step
    pub hatched: bool,
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub tile: TileIndex,
    /// Seconds between hops
    pub cadence: f32,
    /// Seconds since the last hop
    pub accumulator: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, tile: TileIndex, cadence: f32) -> Self {
        Self {
            id,
            kind,
            tile,
            cadence,
            accumulator: 0.0,
        }
    }

    pub fn interaction(&self) -> Interaction {
        self.kind.interaction()
    }

    /// Advance the cadence clock and hop if due. Leftover time is dropped.
    fn step_cadence(
        &mut self,
        dt: f32,
        pyramid: &Pyramid,
        player_tile: TileIndex,
        rng: &mut RngState,
    ) -> Movement {
        self.accumulator += dt;
        if self.accumulator < self.cadence {
            return Movement::Stay;
        }
        self.accumulator = 0.0;

        let movement = self.kind.policy().choose(self.tile, pyramid, player_tile, rng);
        if let Movement::Moved(next) = movement {
            self.tile = next;
        }
        movement
    }

    /// One simulation step.
    ///
    /// A dormant pursuer moves with the descent policy first and then checks its
    /// hatch timer; hatching switches it to `active_cadence` with a fresh clock.
    pub fn step(
        &mut self,
        dt: f32,
        pyramid: &Pyramid,
        player_tile: TileIndex,
        active_cadence: f32,
        rng: &mut RngState,
    ) -> StepOutcome {
        let hatch_due = match &mut self.kind {
            EnemyKind::Pursuer(PursuerPhase::Dormant { hatch_timer }) => {
                *hatch_timer -= dt;
                Some(*hatch_timer <= 0.0)
            }
            _ => None,
        };

        let movement = self.step_cadence(dt, pyramid, player_tile, rng);
        if hatch_due != Some(true) || movement == Movement::Escaped {
            return StepOutcome { movement, hatched: false };
        }

        self.kind = EnemyKind::Pursuer(PursuerPhase::Active);
        self.cadence = active_cadence;
        self.accumulator = 0.0;
        StepOutcome { movement, hatched: true }
    }
}
