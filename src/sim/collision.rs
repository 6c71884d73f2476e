//! Collision detection and response
//!
//! Contacts are tile co-location: the player and an enemy (or an active disk)
//! sharing a [`TileIndex`]. A falling player touches nothing.

use super::enemy::{Enemy, Interaction};
use super::events::{FeedbackEvent, GameEvent, RemovalReason};
use super::pyramid::TileIndex;
use super::state::GameState;

/// Slot of the first enemy standing on the given tile
pub fn enemy_contact(tile: TileIndex, enemies: &[Enemy]) -> Option<usize> {
    enemies.iter().position(|e| e.tile == tile)
}

/// Resolve the player's current contacts.
///
/// Disk first (the player only ever stands on a disk slot right after landing
/// there), then enemies in spawn order. A harmful contact ends the pass: the
/// player has just been sent back to the apex. Returns whether that happened.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    if state.player.is_falling() {
        return false;
    }

    let player_tile = state.player.tile;
    if let Some(slot) = state
        .disks
        .iter()
        .position(|d| d.active && d.tile == player_tile)
    {
        state.disks[slot].active = false;
        let side = state.disks[slot].side;
        state.on_disk_reached(side);
    }

    while let Some(slot) = enemy_contact(state.player.tile, &state.enemies) {
        match state.enemies[slot].interaction() {
            Interaction::Harmful => {
                let enemy = state.remove_enemy(slot, RemovalReason::CaughtPlayer);
                log::debug!("Caught by {:?} #{} at {:?}", enemy.kind, enemy.id, enemy.tile);
                state.emit(GameEvent::Feedback(FeedbackEvent::Danger));
                state.on_life_lost();
                return true;
            }
            Interaction::Beneficial => {
                state.remove_enemy(slot, RemovalReason::Collected);
                state.on_collectible_caught();
            }
            Interaction::Revert => {
                state.revert_tile_colors();
                state.remove_enemy(slot, RemovalReason::Reverted);
            }
        }
    }
    false
}
