//! Game state and the round/life controller
//!
//! Everything needed to continue a session lives in [`GameState`]; the event
//! queue is the only part that is not serialized.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, Movement};
use super::events::{FeedbackEvent, GameEvent, RemovalReason};
use super::player::{MotionComplete, Player};
use super::pyramid::{Direction, Pyramid, TileIndex};
use super::spawn::{SpawnRequest, Spawner};
use crate::settings::{Settings, SettingsError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
}

/// RNG state wrapper for serialization.
///
/// Carries the live generator so a JSON snapshot resumes the exact stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    rng: Pcg32,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Generator positioned where the last draw left off
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskSide {
    Left,
    Right,
}

/// A side exit. Usable once per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub side: DiskSide,
    /// Off-pyramid slot the disk occupies
    pub tile: TileIndex,
    pub active: bool,
}

impl Disk {
    /// Both disks beside the given row: left at column -1, right one past the row's end
    pub fn pair(row: u32) -> Vec<Disk> {
        let row = row as i32;
        vec![
            Disk {
                side: DiskSide::Left,
                tile: TileIndex::new(row, -1),
                active: true,
            },
            Disk {
                side: DiskSide::Right,
                tile: TileIndex::new(row, row + 1),
                active: true,
            },
        ]
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    pub settings: Settings,
    /// Current round (1-based)
    pub round: u32,
    pub lives: u8,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub pyramid: Pyramid,
    pub player: Player,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    pub disks: Vec<Disk>,
    pub spawner: Spawner,
    /// Notifications not yet drained by adapters
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// New game with default settings
    pub fn new(seed: u64) -> Self {
        Self::build(Settings::default(), seed)
    }

    /// New game with custom settings, rejected up front if unusable
    pub fn with_settings(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings, seed))
    }

    fn build(settings: Settings, seed: u64) -> Self {
        let round = 1;
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            round,
            lives: settings.starting_lives,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            pyramid: Pyramid::new(settings.rows, round),
            player: Player::new(TileIndex::APEX),
            enemies: Vec::new(),
            disks: Disk::pair(settings.effective_disk_row()),
            spawner: Spawner::new(&settings.spawn),
            events: Vec::new(),
            next_id: 1,
            settings,
        };
        log::info!(
            "New session: seed={}, rows={}, tiles={}",
            seed,
            state.pyramid.rows(),
            state.pyramid.tile_count()
        );
        state.emit(GameEvent::SessionStarted);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tell the audio adapter the session is over
    pub fn end_session(&mut self) {
        log::info!("Session ended: score={}, round={}", self.score, self.round);
        self.emit(GameEvent::SessionEnded);
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.emit(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.emit(GameEvent::Resumed);
            }
        }
    }

    pub fn active_disk_at(&self, tile: TileIndex) -> Option<&Disk> {
        self.disks.iter().find(|d| d.active && d.tile == tile)
    }

    // === Player controller ===

    /// Queue a hop. Starts immediately when the player is idle.
    pub fn enqueue_move(&mut self, direction: Direction) {
        self.player.enqueue(direction);
        self.start_next_move();
    }

    /// Begin the oldest queued move if nothing is in flight
    pub(crate) fn start_next_move(&mut self) {
        let Some(direction) = self.player.take_next_move() else {
            return;
        };
        let from = self.player.tile;

        let target = self
            .pyramid
            .adjacency(from, direction)
            .or_else(|| self.active_disk_at(from.offset(direction)).map(|d| d.tile));

        match target {
            Some(to) => {
                self.player.begin_hop(to);
                self.emit(GameEvent::PlayerHopStarted { from, to });
                self.emit(GameEvent::Feedback(FeedbackEvent::Jump));
            }
            None => {
                log::debug!("Player stepped off the pyramid at {:?} going {:?}", from, direction);
                self.player.begin_fall();
                self.emit(GameEvent::PlayerFalling { from });
                self.emit(GameEvent::Feedback(FeedbackEvent::Danger));
            }
        }
    }

    /// Advance the in-flight hop or fall and apply its outcome
    pub(crate) fn update_player(&mut self, dt: f32) {
        let completed = self
            .player
            .update(dt, self.settings.hop_duration, self.settings.fall_duration);

        match completed {
            None => {}
            Some(MotionComplete::Landed(tile)) => {
                self.emit(GameEvent::PlayerLanded { tile });
                // Disk landings are settled by the collision pass
                if !self.pyramid.contains(tile) {
                    return;
                }
                let delta = self
                    .pyramid
                    .advance(tile, self.round, self.settings.scoring.step_points);
                if delta > 0 {
                    self.emit_tile(tile);
                    self.on_hop_advance(delta);
                }
                if self.pyramid.is_complete() {
                    self.on_level_complete();
                }
                self.start_next_move();
            }
            Some(MotionComplete::Fell) => self.on_life_lost(),
        }
    }

    fn emit_tile(&mut self, index: TileIndex) {
        if let Some(tile) = self.pyramid.tile(index) {
            let visual_step = tile.visual_step();
            self.emit(GameEvent::TileChanged { index, visual_step });
        }
    }

    fn emit_all_tiles(&mut self) {
        let changes: Vec<_> = self
            .pyramid
            .tiles()
            .iter()
            .map(|t| GameEvent::TileChanged {
                index: t.index,
                visual_step: t.visual_step(),
            })
            .collect();
        self.events.extend(changes);
    }

    fn reposition_player(&mut self, clear_pending: bool) {
        self.player.place(TileIndex::APEX);
        if clear_pending {
            self.player.clear_pending();
        }
        self.emit(GameEvent::PlayerRepositioned { tile: TileIndex::APEX });
    }

    // === Round/life controller ===

    pub fn on_hop_advance(&mut self, score_delta: u64) {
        self.score += score_delta;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    pub fn on_level_complete(&mut self) {
        self.round += 1;
        log::info!("Round {} cleared, starting round {} (score {})", self.round - 1, self.round, self.score);
        self.emit(GameEvent::RoundChanged(self.round));
        self.emit(GameEvent::Feedback(FeedbackEvent::LevelComplete));

        self.pyramid.reset_all(self.round);
        self.emit_all_tiles();
        self.rearm_disks();
        self.reposition_player(true);
        self.clear_enemies();
    }

    pub fn on_life_lost(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Life lost, {} remaining", self.lives);
        self.emit(GameEvent::LivesChanged(self.lives));
        self.emit(GameEvent::Feedback(FeedbackEvent::LifeLost));

        if self.lives == 0 {
            self.reset_game();
        } else {
            self.reposition_player(true);
        }
    }

    /// Full reset after the last life: round 1, no score, full lives
    pub fn reset_game(&mut self) {
        log::info!("Game over: score={}, round={}", self.score, self.round);
        self.emit(GameEvent::SessionEnded);

        self.round = 1;
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.emit(GameEvent::RoundChanged(self.round));
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::LivesChanged(self.lives));

        self.pyramid.reset_all(self.round);
        self.emit_all_tiles();
        self.rearm_disks();
        self.reposition_player(true);
        self.clear_enemies();
        self.spawner.reset(&self.settings.spawn);

        self.emit(GameEvent::SessionStarted);
    }

    /// Player rode a disk. Bonus and back to the apex; the round continues.
    pub fn on_disk_reached(&mut self, side: DiskSide) {
        log::debug!("Disk {:?} reached", side);
        self.score += self.settings.scoring.disk_bonus;
        self.emit(GameEvent::DiskConsumed { side });
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::Feedback(FeedbackEvent::LevelComplete));
        self.reposition_player(false);
        self.start_next_move();
    }

    pub fn on_collectible_caught(&mut self) {
        self.score += self.settings.scoring.collectible_bonus;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Reverter wipe: all tiles show their starting color, progress untouched
    pub fn revert_tile_colors(&mut self) {
        self.pyramid.revert_visuals();
        self.emit(GameEvent::TilesReverted);
    }

    fn rearm_disks(&mut self) {
        for disk in &mut self.disks {
            disk.active = true;
        }
    }

    // === Enemy system ===

    pub fn spawn_enemy(&mut self, kind: EnemyKind, tile: TileIndex) -> u32 {
        let id = self.next_entity_id();
        log::debug!("Spawned {:?} #{} at {:?}", kind, id, tile);
        self.enemies.push(Enemy::new(id, kind, tile, self.settings.enemy_cadence));
        self.emit(GameEvent::EnemySpawned { id, kind, tile });
        id
    }

    /// Remove the enemy at `slot`, keeping the others in spawn order
    pub(crate) fn remove_enemy(&mut self, slot: usize, reason: RemovalReason) -> Enemy {
        let enemy = self.enemies.remove(slot);
        self.emit(GameEvent::EnemyRemoved { id: enemy.id, reason });
        enemy
    }

    pub fn clear_enemies(&mut self) {
        if self.enemies.is_empty() {
            return;
        }
        self.enemies.clear();
        self.emit(GameEvent::EnemiesCleared);
    }

    pub(crate) fn update_spawns(&mut self, dt: f32) {
        let requests = self.spawner.update(
            dt,
            self.round,
            &self.settings.spawn,
            self.settings.hatch_duration,
            &mut self.rng_state,
        );
        for request in requests {
            match request {
                SpawnRequest::Timed(kind) => {
                    self.spawn_enemy(kind, TileIndex::APEX);
                }
                SpawnRequest::Reverter => {
                    let row = self.settings.effective_reverter_row();
                    let column = self.rng_state.rng().random_range(0..=row);
                    self.spawn_enemy(EnemyKind::Reverter, TileIndex::new(row as i32, column as i32));
                }
            }
        }
    }

    /// Step every enemy once, dropping the ones that walked off
    pub(crate) fn update_enemies(&mut self, dt: f32) {
        let player_tile = self.player.tile;
        let mut slot = 0;
        while slot < self.enemies.len() {
            let enemy = &mut self.enemies[slot];
            let outcome = enemy.step(
                dt,
                &self.pyramid,
                player_tile,
                self.settings.pursuer_cadence,
                &mut self.rng_state,
            );
            let (id, kind) = (enemy.id, enemy.kind);

            if outcome.hatched {
                log::debug!("Pursuer #{} hatched", id);
                self.emit(GameEvent::EnemyHatched { id });
            }

            match outcome.movement {
                Movement::Stay => {}
                Movement::Moved(tile) => {
                    self.emit(GameEvent::EnemyMoved { id, tile });
                    if kind == EnemyKind::Reverter {
                        self.pyramid.revert(tile);
                        self.emit_tile(tile);
                    }
                }
                Movement::Escaped => {
                    log::debug!("Enemy #{} escaped", id);
                    self.remove_enemy(slot, RemovalReason::Escaped);
                    continue;
                }
            }
            slot += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let mut state = GameState::new(1);
        assert_eq!(state.round, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.tile, TileIndex::APEX);
        assert_eq!(state.pyramid.tile_count(), 28);
        assert_eq!(state.drain_events(), vec![GameEvent::SessionStarted]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(GameState::with_settings(Settings::with_rows(1), 1).is_err());
        assert!(GameState::with_settings(Settings::with_rows(4), 1).is_ok());
    }

    #[test]
    fn test_disk_slots() {
        let state = GameState::new(1);
        assert_eq!(state.disks[0].tile, TileIndex::new(5, -1));
        assert_eq!(state.disks[1].tile, TileIndex::new(5, 6));
        assert!(!state.pyramid.contains(state.disks[0].tile));
        assert!(!state.pyramid.contains(state.disks[1].tile));
    }

    #[test]
    fn test_rng_is_reproducible() {
        let mut a = RngState::new(99);
        let mut b = RngState::new(99);
        let seq_a: Vec<u32> = (0..16).map(|_| a.rng().random_range(0..100)).collect();
        let seq_b: Vec<u32> = (0..16).map(|_| b.rng().random_range(0..100)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|v| *v < 100));

        // Resuming from a snapshot continues the same stream
        let json = serde_json::to_string(&a).unwrap();
        let mut resumed: RngState = serde_json::from_str(&json).unwrap();
        assert_eq!(resumed, a);
        let next: u32 = a.rng().random();
        assert_eq!(resumed.rng().random::<u32>(), next);
    }

    #[test]
    fn test_level_complete_resets_round() {
        let mut state = GameState::new(1);
        state.spawn_enemy(EnemyKind::RandomDescender, TileIndex::new(3, 1));
        state.disks[0].active = false;
        state.player.place(TileIndex::new(4, 2));
        state.enqueue_move(Direction::DownLeft);

        state.on_level_complete();
        assert_eq!(state.round, 2);
        assert!(state.enemies.is_empty());
        assert!(state.disks.iter().all(|d| d.active));
        assert_eq!(state.player.tile, TileIndex::APEX);
        assert!(state.player.is_idle());
        assert_eq!(state.player.pending_moves().count(), 0);
        assert!(state.pyramid.tiles().iter().all(|t| t.current_step() == 0));
        assert!(state.events().contains(&GameEvent::Feedback(FeedbackEvent::LevelComplete)));
    }

    #[test]
    fn test_life_lost_keeps_round_and_enemies() {
        let mut state = GameState::new(1);
        state.score = 300;
        state.round = 2;
        state.spawn_enemy(EnemyKind::Collectible, TileIndex::new(2, 1));
        state.player.place(TileIndex::new(3, 3));

        state.on_life_lost();
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 300);
        assert_eq!(state.round, 2);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.tile, TileIndex::APEX);
    }

    #[test]
    fn test_last_life_resets_game() {
        let mut state = GameState::new(1);
        state.lives = 1;
        state.score = 1234;
        state.round = 5;
        state.pyramid.advance(TileIndex::new(2, 2), 5, 25);
        state.spawn_enemy(EnemyKind::RandomDescender, TileIndex::new(3, 1));
        state.player.place(TileIndex::new(6, 0));
        state.drain_events();

        state.on_life_lost();
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.round, 1);
        assert!(state.enemies.is_empty());
        assert!(state.pyramid.tiles().iter().all(|t| t.current_step() == 0 && t.target_step() == 2));
        assert_eq!(state.player.tile, TileIndex::APEX);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SessionEnded));
        assert_eq!(events.last(), Some(&GameEvent::SessionStarted));
    }

    #[test]
    fn test_reverter_undoes_tiles_it_lands_on() {
        let mut state = GameState::new(3);
        for column in 0..=1 {
            let tile = TileIndex::new(1, column);
            state.pyramid.advance(tile, 1, 25);
        }
        state.spawn_enemy(EnemyKind::Reverter, TileIndex::APEX);
        state.player.place(TileIndex::new(6, 6));
        state.update_enemies(state.settings.enemy_cadence);

        let landed = state.enemies[0].tile;
        assert_eq!(landed.row, 1);
        assert_eq!(state.pyramid.tile(landed).map(|t| t.current_step()), Some(0));
    }

    #[test]
    fn test_escaped_enemies_are_removed() {
        let mut state = GameState::new(3);
        let id = state.spawn_enemy(EnemyKind::RandomDescender, TileIndex::new(6, 2));
        state.player.place(TileIndex::APEX);
        state.update_enemies(1.0);
        assert!(state.enemies.is_empty());
        assert!(state.events().contains(&GameEvent::EnemyRemoved {
            id,
            reason: RemovalReason::Escaped
        }));
    }

    #[test]
    fn test_reverter_spawns_on_its_row() {
        let settings = Settings {
            spawn: crate::settings::SpawnSettings {
                base_interval: 100.0,
                min_interval: 100.0,
                reverter_first_delay: 0.1,
                ..Default::default()
            },
            ..Settings::default()
        };
        let mut state = GameState::with_settings(settings, 11).unwrap();
        state.update_spawns(0.2);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Reverter);
        assert_eq!(state.enemies[0].tile.row, 2);
        assert!(state.pyramid.contains(state.enemies[0].tile));
    }
}
