//! Shared damage application paths.
//!
//! Both paths are idempotent: an enemy's `is_dead` flag and a tower's
//! `is_destroyed` flag each flip exactly once, and redundant damage
//! calls after the flip are no-ops. Hit points never go below zero.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::{EnemyAgent, Health, TowerUnit};
use coreguard_core::constants::*;
use coreguard_core::events::GameEvent;
use coreguard_core::types::Position;

use crate::world_setup;

/// Apply tower-fire damage to an enemy. Returns `true` when this call
/// killed it: the kill path runs exactly once — debris burst, one
/// `EnemyKilled` event, the kill reward, and a queued despawn.
pub fn damage_enemy(
    world: &mut World,
    entity: Entity,
    amount: i32,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    coins: &mut i32,
    despawn_buffer: &mut Vec<Entity>,
) -> bool {
    let (enemy_id, position) = {
        let mut agent = match world.get::<&mut EnemyAgent>(entity) {
            Ok(agent) => agent,
            Err(_) => return false,
        };
        if agent.is_dead {
            return false;
        }

        let mut health = match world.get::<&mut Health>(entity) {
            Ok(health) => health,
            Err(_) => return false,
        };
        health.hp = (health.hp - amount).max(0);
        if health.hp > 0 {
            return false;
        }

        agent.is_dead = true;
        let position = match world.get::<&Position>(entity) {
            Ok(pos) => *pos,
            Err(_) => Position::default(),
        };
        (agent.enemy_id, position)
    };

    world_setup::spawn_debris_burst(world, rng, position, ENEMY_DEBRIS_COUNT, 1.0, 1.4);
    events.push(GameEvent::EnemyKilled { enemy_id });
    *coins += KILL_REWARD;
    despawn_buffer.push(entity);
    true
}

/// Apply damage to a tower. On crossing zero hp the tower transitions
/// to its destroyed state exactly once: it stops firing, scatters
/// debris, and stays registered as an inert obstacle. Further damage
/// calls are no-ops.
pub fn damage_tower(
    world: &mut World,
    entity: Entity,
    amount: i32,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
) {
    let destroyed = {
        let mut unit = match world.get::<&mut TowerUnit>(entity) {
            Ok(unit) => unit,
            Err(_) => return,
        };
        if unit.is_destroyed {
            return;
        }

        let mut health = match world.get::<&mut Health>(entity) {
            Ok(health) => health,
            Err(_) => return,
        };
        health.hp = (health.hp - amount).max(0);
        if health.hp > 0 {
            None
        } else {
            unit.is_destroyed = true;
            let position = match world.get::<&Position>(entity) {
                Ok(pos) => *pos,
                Err(_) => Position::default(),
            };
            Some((unit.tower_id, position))
        }
    };

    if let Some((tower_id, position)) = destroyed {
        world_setup::spawn_debris_burst(world, rng, position, TOWER_DEBRIS_COUNT, 1.2, 1.7);
        events.push(GameEvent::TowerDestroyed { tower_id });
    }
}
