//! Pyramid Hop headless runner
//!
//! Plays the simulation with the autopilot at a fixed timestep and logs the
//! event stream. Usage: `pyramid-hop [seed] [seconds] [settings.json]`.

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use pyramid_hop::consts::*;
    use pyramid_hop::sim::{GameEvent, GameState, TickInput, tick};

    /// Game instance holding all state
    pub struct Game {
        pub state: GameState,
        accumulator: f32,
        input: TickInput,
        // Event counters for the summary
        hops: u32,
        lives_lost: u32,
        rounds_cleared: u32,
        best_score: u64,
    }

    impl Game {
        pub fn new(state: GameState) -> Self {
            Self {
                state,
                accumulator: 0.0,
                input: TickInput {
                    idle_mode: true,
                    ..Default::default()
                },
                hops: 0,
                lives_lost: 0,
                rounds_cleared: 0,
                best_score: 0,
            }
        }

        /// Run simulation ticks for one frame of `dt` seconds
        pub fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.moves.clear();
                self.input.pause = false;
            }

            for event in self.state.drain_events() {
                self.observe(&event);
            }
        }

        fn observe(&mut self, event: &GameEvent) {
            match event {
                GameEvent::PlayerLanded { .. } => self.hops += 1,
                GameEvent::LivesChanged(lives) if *lives < self.state.settings.starting_lives => {
                    self.lives_lost += 1
                }
                GameEvent::RoundChanged(round) if *round > 1 => self.rounds_cleared += 1,
                GameEvent::ScoreChanged(score) => self.best_score = self.best_score.max(*score),
                _ => {}
            }
            log::trace!("{:?}", event);
        }

        pub fn summary(&self) {
            log::info!(
                "Finished: score={}, best={}, round={}, lives={}, hops={}, lives lost={}, rounds cleared={}",
                self.state.score,
                self.best_score,
                self.state.round,
                self.state.lives,
                self.hops,
                self.lives_lost,
                self.rounds_cleared
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pyramid_hop::Settings;
    use pyramid_hop::sim::GameState;

    env_logger::init();
    log::info!("Pyramid Hop (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Rejected settings {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let state = match GameState::with_settings(settings, seed) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Cannot start game: {}", err);
            std::process::exit(1);
        }
    };

    // Drive at a 30 Hz "frame rate" so the accumulator does real substepping
    let frame = 1.0 / 30.0;
    let frames = (seconds / frame).ceil() as u32;
    let mut game = native_game::Game::new(state);
    for _ in 0..frames {
        game.update(frame);
    }

    game.state.end_session();
    game.summary();

    match serde_json::to_string(&game.state) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(err) => log::warn!("Snapshot failed: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; a browser shell drives `sim::tick` directly
}
