//! Enemy movement system.
//!
//! Advances each live enemy along the ground plane toward its current
//! target by `speed × dt`. A tower-targeting enemy already inside 0.9×
//! the melee range holds position; melee resolution takes over from
//! there.

use std::collections::HashMap;

use hecs::World;

use coreguard_core::components::{Enemy, EnemyAgent, TowerUnit};
use coreguard_core::constants::{DT, MELEE_HOLD_FACTOR, TOWER_ATTACK_RANGE};
use coreguard_core::enums::TargetKind;
use coreguard_core::types::Position;

use crate::world_setup::core_position;

/// Run ground-plane movement for all live enemies.
pub fn run(world: &mut World) {
    // Tower lookup: id → (position, destroyed).
    let towers: HashMap<u32, (Position, bool)> = world
        .query::<(&TowerUnit, &Position)>()
        .iter()
        .map(|(_, (unit, pos))| (unit.tower_id, (*pos, unit.is_destroyed)))
        .collect();

    let core = core_position();

    for (_, (_, agent, pos)) in world.query_mut::<(&Enemy, &mut EnemyAgent, &mut Position)>() {
        if agent.is_dead {
            continue;
        }

        let target_pos = match agent.target {
            TargetKind::Core => core,
            TargetKind::Tower { tower_id } => match towers.get(&tower_id) {
                Some(&(tower_pos, false)) => tower_pos,
                // Target vanished or was destroyed since the scan; fall
                // back to the core for this step.
                _ => {
                    agent.target = TargetKind::Core;
                    core
                }
            },
        };

        let dist = pos.distance_to(&target_pos);

        if matches!(agent.target, TargetKind::Tower { .. })
            && dist < TOWER_ATTACK_RANGE * MELEE_HOLD_FACTOR
        {
            continue;
        }

        if dist > 1e-3 {
            let dir = pos.direction_to(&target_pos);
            pos.advance(dir, agent.speed * DT);
        }
    }
}
