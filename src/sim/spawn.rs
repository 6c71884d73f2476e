//! Enemy spawn timers
//!
//! Two independent clocks: a round-scaled timer that drops a random enemy on
//! the apex, and a slower one that places a reverter part-way down.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, PursuerPhase};
use super::state::RngState;
use crate::settings::{SpawnSettings, SpawnWeights};

/// A spawn that came due this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    /// Weighted pick, placed on the apex
    Timed(EnemyKind),
    /// Reverter on a random tile of the reverter row
    Reverter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Counts up toward the round's spawn interval
    enemy_timer: f32,
    /// Counts down to the next reverter
    reverter_timer: f32,
}

impl Spawner {
    pub fn new(settings: &SpawnSettings) -> Self {
        Self {
            enemy_timer: 0.0,
            reverter_timer: settings.reverter_first_delay,
        }
    }

    pub fn reset(&mut self, settings: &SpawnSettings) {
        *self = Self::new(settings);
    }

    /// Advance both clocks, returning whatever came due (timed spawn first)
    pub fn update(
        &mut self,
        dt: f32,
        round: u32,
        settings: &SpawnSettings,
        hatch_duration: f32,
        rng: &mut RngState,
    ) -> Vec<SpawnRequest> {
        let mut due = Vec::new();

        self.enemy_timer += dt;
        if self.enemy_timer > settings.interval_for_round(round) {
            self.enemy_timer = 0.0;
            due.push(SpawnRequest::Timed(roll_kind(&settings.weights, hatch_duration, rng)));
        }

        self.reverter_timer -= dt;
        if self.reverter_timer < 0.0 {
            self.reverter_timer = settings.reverter_interval;
            due.push(SpawnRequest::Reverter);
        }

        due
    }
}

/// Weighted pick between descender, collectible and a fresh pursuer
pub fn roll_kind(weights: &SpawnWeights, hatch_duration: f32, rng: &mut RngState) -> EnemyKind {
    let total = weights.total();
    if total == 0 {
        return EnemyKind::RandomDescender;
    }
    let roll = rng.rng().random_range(0..total);
    let descender = u64::from(weights.descender);
    if roll < descender {
        EnemyKind::RandomDescender
    } else if roll < descender + u64::from(weights.collectible) {
        EnemyKind::Collectible
    } else {
        EnemyKind::Pursuer(PursuerPhase::Dormant {
            hatch_timer: hatch_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_spawn_interval() {
        let settings = SpawnSettings::default();
        let mut spawner = Spawner::new(&settings);
        let mut rng = RngState::new(1);

        // Round 1 interval is 2.25s
        assert!(spawner.update(2.0, 1, &settings, 1.5, &mut rng).is_empty());
        let due = spawner.update(0.5, 1, &settings, 1.5, &mut rng);
        assert_eq!(due.len(), 1);
        assert!(matches!(due[0], SpawnRequest::Timed(_)));
        assert!(spawner.update(0.5, 1, &settings, 1.5, &mut rng).is_empty());
    }

    #[test]
    fn test_reverter_schedule() {
        let settings = SpawnSettings {
            base_interval: 100.0,
            min_interval: 100.0,
            ..SpawnSettings::default()
        };
        let mut spawner = Spawner::new(&settings);
        let mut rng = RngState::new(1);

        assert!(spawner.update(11.9, 1, &settings, 1.5, &mut rng).is_empty());
        assert_eq!(spawner.update(0.2, 1, &settings, 1.5, &mut rng), vec![SpawnRequest::Reverter]);
        assert!(spawner.update(13.9, 1, &settings, 1.5, &mut rng).is_empty());
        assert_eq!(spawner.update(0.2, 1, &settings, 1.5, &mut rng), vec![SpawnRequest::Reverter]);
    }

    #[test]
    fn test_roll_respects_weights() {
        let mut rng = RngState::new(42);
        let only_collectibles = SpawnWeights {
            descender: 0,
            collectible: 1,
            pursuer: 0,
        };
        for _ in 0..50 {
            assert_eq!(roll_kind(&only_collectibles, 1.5, &mut rng), EnemyKind::Collectible);
        }

        let only_pursuers = SpawnWeights {
            descender: 0,
            collectible: 0,
            pursuer: 3,
        };
        assert_eq!(
            roll_kind(&only_pursuers, 1.5, &mut rng),
            EnemyKind::Pursuer(PursuerPhase::Dormant { hatch_timer: 1.5 })
        );
    }

    #[test]
    fn test_roll_handles_huge_weights() {
        let mut rng = RngState::new(9);
        let weights = SpawnWeights {
            descender: 0,
            collectible: u32::MAX,
            pursuer: u32::MAX,
        };
        for _ in 0..50 {
            assert_ne!(roll_kind(&weights, 1.5, &mut rng), EnemyKind::RandomDescender);
        }
    }

    #[test]
    fn test_roll_covers_all_kinds() {
        let mut rng = RngState::new(7);
        let weights = SpawnWeights::default();
        let mut seen = [false; 3];
        for _ in 0..500 {
            match roll_kind(&weights, 1.5, &mut rng) {
                EnemyKind::RandomDescender => seen[0] = true,
                EnemyKind::Collectible => seen[1] = true,
                EnemyKind::Pursuer(_) => seen[2] = true,
                EnemyKind::Reverter => unreachable!(),
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}
