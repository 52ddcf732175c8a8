//! Projectile resolution system.
//!
//! Each projectile chases its target's *current* position at a fixed
//! speed and resolves on approach. A projectile whose target is gone or
//! already flagged dead is removed without effect.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::{Enemy, EnemyAgent, Projectile};
use coreguard_core::constants::{DT, PROJECTILE_HIT_RADIUS};
use coreguard_core::events::GameEvent;
use coreguard_core::types::Position;

use crate::systems::damage;

/// Move all projectiles and resolve hits.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    coins: &mut i32,
    despawn_buffer: &mut Vec<Entity>,
) {
    let enemy_index: HashMap<u32, Entity> = world
        .query::<(&Enemy, &EnemyAgent)>()
        .iter()
        .map(|(entity, (_, agent))| (agent.enemy_id, entity))
        .collect();

    let projectiles: Vec<(Entity, Position, u32, f64, i32)> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(entity, (proj, pos))| {
            (entity, *pos, proj.target_enemy_id, proj.speed, proj.damage)
        })
        .collect();

    for (proj_entity, proj_pos, target_id, speed, dmg) in projectiles {
        // Target loss: enemy no longer in the registry.
        let Some(&target_entity) = enemy_index.get(&target_id) else {
            despawn_buffer.push(proj_entity);
            continue;
        };

        // Target already flagged dead by an earlier hit this tick.
        let target_dead = world
            .get::<&EnemyAgent>(target_entity)
            .map_or(true, |agent| agent.is_dead);
        if target_dead {
            despawn_buffer.push(proj_entity);
            continue;
        }

        let target_pos = match world.get::<&Position>(target_entity) {
            Ok(pos) => *pos,
            Err(_) => {
                despawn_buffer.push(proj_entity);
                continue;
            }
        };

        if proj_pos.distance_to(&target_pos) < PROJECTILE_HIT_RADIUS {
            let _ = damage::damage_enemy(
                world,
                target_entity,
                dmg,
                rng,
                events,
                coins,
                despawn_buffer,
            );
            despawn_buffer.push(proj_entity);
            continue;
        }

        if let Ok(mut pos) = world.get::<&mut Position>(proj_entity) {
            let dir = pos.direction_to(&target_pos);
            pos.advance(dir, speed * DT);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
