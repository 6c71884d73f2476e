//! Per-tile progress state machine

use serde::{Deserialize, Serialize};

use super::pyramid::TileIndex;
use crate::consts::{MAX_TARGET_STEP, MIN_TARGET_STEP};

/// Hops a tile needs before it counts as complete in the given round
pub fn target_step_for_round(round: u32) -> u32 {
    (MIN_TARGET_STEP + round / 3).min(MAX_TARGET_STEP)
}

/// A single pyramid tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub index: TileIndex,
    current_step: u32,
    target_step: u32,
    /// Color index shown by the renderer, in `0..=target_step`.
    ///
    /// Tracks `current_step` except after a reverter wipe, which repaints
    /// without touching progress.
    visual_step: u32,
}

impl Tile {
    pub fn new(index: TileIndex, round: u32) -> Self {
        Self {
            index,
            current_step: 0,
            target_step: target_step_for_round(round),
            visual_step: 0,
        }
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn target_step(&self) -> u32 {
        self.target_step
    }

    pub fn visual_step(&self) -> u32 {
        self.visual_step
    }

    pub fn is_complete(&self) -> bool {
        self.current_step >= self.target_step
    }

    /// Player landed here. Returns `step_points * new_step`, or 0 once complete.
    pub fn advance(&mut self, round: u32, step_points: u64) -> u64 {
        self.target_step = target_step_for_round(round);
        if self.current_step >= self.target_step {
            return 0;
        }
        self.current_step += 1;
        self.visual_step = self.current_step;
        step_points * self.current_step as u64
    }

    /// One step back, floored at 0
    pub fn revert(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
        self.visual_step = self.current_step;
    }

    pub fn reset(&mut self, round: u32) {
        self.current_step = 0;
        self.target_step = target_step_for_round(round);
        self.visual_step = 0;
    }

    /// Repaint to the starting color; progress is kept
    pub fn revert_visual(&mut self) {
        self.visual_step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_step_schedule() {
        assert_eq!(target_step_for_round(1), 2);
        assert_eq!(target_step_for_round(2), 2);
        assert_eq!(target_step_for_round(3), 3);
        assert_eq!(target_step_for_round(100), 3);
    }

    #[test]
    fn test_advance_scores_new_step() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        assert_eq!(tile.advance(1, 25), 25);
        assert_eq!(tile.visual_step(), 1);
        assert!(!tile.is_complete());
        assert_eq!(tile.advance(1, 25), 50);
        assert!(tile.is_complete());
    }

    #[test]
    fn test_advance_idempotent_when_complete() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        tile.advance(1, 25);
        tile.advance(1, 25);
        for _ in 0..5 {
            assert_eq!(tile.advance(1, 25), 0);
            assert_eq!(tile.current_step(), 2);
        }
    }

    #[test]
    fn test_advance_picks_up_round_target() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        assert_eq!(tile.target_step(), 2);
        tile.advance(3, 25);
        assert_eq!(tile.target_step(), 3);
    }

    #[test]
    fn test_revert_floors_at_zero() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        tile.revert();
        assert_eq!(tile.current_step(), 0);
        tile.advance(1, 25);
        tile.advance(1, 25);
        tile.revert();
        assert_eq!(tile.current_step(), 1);
        assert_eq!(tile.visual_step(), 1);
        assert!(!tile.is_complete());
    }

    #[test]
    fn test_visual_revert_keeps_progress() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        tile.advance(1, 25);
        tile.revert_visual();
        assert_eq!(tile.visual_step(), 0);
        assert_eq!(tile.current_step(), 1);
        // Next landing repaints from real progress
        assert_eq!(tile.advance(1, 25), 50);
        assert_eq!(tile.visual_step(), 2);
    }

    #[test]
    fn test_reset() {
        let mut tile = Tile::new(TileIndex::APEX, 1);
        tile.advance(1, 25);
        tile.reset(4);
        assert_eq!(tile.current_step(), 0);
        assert_eq!(tile.target_step(), 3);
    }
}
