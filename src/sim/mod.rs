//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod enemy;
pub mod events;
pub mod player;
pub mod pyramid;
pub mod spawn;
pub mod state;
pub mod tile;
pub mod tick;

pub use collision::{enemy_contact, resolve_collisions};
pub use enemy::{Enemy, EnemyKind, Interaction, Movement, MovementPolicy, PursuerPhase};
pub use events::{FeedbackEvent, GameEvent, RemovalReason};
pub use player::{Player, PlayerMotion};
pub use pyramid::{Direction, Pyramid, TileIndex};
pub use spawn::{SpawnRequest, Spawner};
pub use state::{Disk, DiskSide, GamePhase, GameState, RngState};
pub use tile::{Tile, target_step_for_round};
pub use tick::{TickInput, autopilot_move, tick};
