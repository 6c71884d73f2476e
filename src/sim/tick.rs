//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::resolve_collisions;
use super::enemy::Interaction;
use super::pyramid::{Direction, TileIndex};
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hops requested since the last tick, oldest first
    pub moves: Vec<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    // Don't tick if paused
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    for &direction in &input.moves {
        state.enqueue_move(direction);
    }

    // Idle/demo mode - pick the next hop once the queue runs dry
    if input.idle_mode && state.player.is_idle() && state.player.pending_moves().next().is_none() {
        if let Some(direction) = autopilot_move(state) {
            state.enqueue_move(direction);
        }
    }

    // Contacts are checked after each side moves so neither can step out
    // from under the other unnoticed. One harmful contact per tick at most.
    state.update_player(dt);
    let caught = resolve_collisions(state);
    state.update_spawns(dt);
    state.update_enemies(dt);
    if !caught {
        resolve_collisions(state);
    }
}

/// Choose a hop for the autopilot.
///
/// Never steps off the pyramid and never lands next to a harmful enemy when
/// another option exists. Prefers unfinished tiles, then any safe tile; the
/// starting direction rotates with the tick counter so ties don't loop forever.
pub fn autopilot_move(state: &GameState) -> Option<Direction> {
    let from = state.player.tile;
    let start = (state.time_ticks % 4) as usize;
    let candidates: Vec<_> = (0..4)
        .map(|i| Direction::ALL[(start + i) % 4])
        .filter_map(|d| state.pyramid.adjacency(from, d).map(|next| (d, next)))
        .collect();

    let is_safe = |tile: TileIndex| {
        !state.enemies.iter().any(|e| {
            e.interaction() == Interaction::Harmful
                && (e.tile == tile || state.pyramid.neighbors(e.tile).any(|(_, n)| n == tile))
        })
    };
    let unfinished = |tile: TileIndex| state.pyramid.tile(tile).is_some_and(|t| !t.is_complete());

    candidates
        .iter()
        .find(|(_, next)| is_safe(*next) && unfinished(*next))
        .or_else(|| candidates.iter().find(|(_, next)| is_safe(*next)))
        .or_else(|| candidates.first())
        .map(|(direction, _)| *direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::events::{FeedbackEvent, GameEvent};

    /// Tick with no input for the given number of seconds
    fn run_for(state: &mut GameState, seconds: f32) {
        let steps = (seconds / SIM_DT).ceil() as u32;
        for _ in 0..steps {
            tick(state, &TickInput::default(), SIM_DT);
        }
    }

    fn moves(moves: &[Direction]) -> TickInput {
        TickInput {
            moves: moves.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_hop_lands_and_scores() {
        let mut state = GameState::new(12345);
        tick(&mut state, &moves(&[Direction::DownRight]), SIM_DT);
        assert!(!state.player.is_idle());
        assert_eq!(state.player.tile, TileIndex::APEX);

        run_for(&mut state, 0.25);
        assert_eq!(state.player.tile, TileIndex::new(1, 1));
        assert_eq!(state.score, 25);
        assert!(state.events().contains(&GameEvent::Feedback(FeedbackEvent::Jump)));
    }

    #[test]
    fn test_stepping_off_costs_a_life_after_fall() {
        let mut state = GameState::new(12345);
        tick(&mut state, &moves(&[Direction::UpLeft]), SIM_DT);
        assert!(state.player.is_falling());
        assert_eq!(state.lives, 3);

        run_for(&mut state, 0.5);
        assert_eq!(state.lives, 3);
        run_for(&mut state, 0.4);
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.tile, TileIndex::APEX);
        assert!(state.player.is_idle());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;

        // Moves while paused are ignored and nothing advances
        tick(&mut state, &moves(&[Direction::DownLeft]), SIM_DT);
        run_for(&mut state, 5.0);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.player.is_idle());
        assert!(state.enemies.is_empty());

        // Unpause
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let mut state = GameState::new(12345);
        state.player.place(TileIndex::new(6, 3));
        run_for(&mut state, 2.3);
        assert!(state.events().iter().any(|e| matches!(e, GameEvent::EnemySpawned { .. })));
    }

    #[test]
    fn test_autopilot_avoids_edges_and_enemies() {
        let mut state = GameState::new(1);
        // From the apex only the two downward hops are on the pyramid
        let direction = autopilot_move(&state).unwrap();
        assert!(Direction::DOWNWARD.contains(&direction));

        // A harmful enemy below-left makes down-right the only safe choice
        state.spawn_enemy(EnemyKind::RandomDescender, TileIndex::new(2, 0));
        assert_eq!(autopilot_move(&state), Some(Direction::DownRight));
    }

    #[test]
    fn test_idle_mode_keeps_playing() {
        let mut state = GameState::new(77);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        let landings = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerLanded { .. }))
            .count();
        assert!(landings > 10);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..1200 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.tile, state2.player.tile);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }
}
