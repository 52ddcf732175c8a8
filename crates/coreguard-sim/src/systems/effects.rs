//! Effect lifecycle system — debris physics and beam flash expiry.
//!
//! Everything here is cosmetic; expiring an effect never touches
//! gameplay state.

use hecs::{Entity, World};

use coreguard_core::components::{BeamFlash, DebrisPiece};
use coreguard_core::constants::{DEBRIS_GRAVITY, DT};
use coreguard_core::types::Position;

/// Integrate debris motion and remove expired effect entities.
pub fn run(world: &mut World, current_tick: u64, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (piece, pos)) in world.query_mut::<(&mut DebrisPiece, &mut Position)>() {
        piece.age_secs += DT;
        if piece.age_secs > piece.lifetime_secs {
            despawn_buffer.push(entity);
            continue;
        }

        // Gravity integrates at half strength per step.
        piece.vel_y += DEBRIS_GRAVITY * DT * 0.5;
        pos.x += piece.vel_x * DT;
        pos.z += piece.vel_z * DT;
        piece.height += piece.vel_y * DT;
    }

    for (entity, flash) in world.query_mut::<&mut BeamFlash>() {
        if current_tick >= flash.expires_at_tick {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
