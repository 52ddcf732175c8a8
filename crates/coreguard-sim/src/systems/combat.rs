//! Combat resolution — melee trades and core contact.
//!
//! Evaluated after movement, per enemy, first match wins:
//! 1. melee trade against the targeted live, non-core tower in range;
//! 2. core contact, regardless of the declared target.
//! Removals go through the despawn buffer; the live collections are
//! never mutated mid-iteration.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::{Enemy, EnemyAgent, Health, TowerUnit};
use coreguard_core::constants::*;
use coreguard_core::enums::{TargetKind, TowerKind};
use coreguard_core::events::GameEvent;
use coreguard_core::types::Position;

use crate::systems::damage;
use crate::world_setup::{self, core_position};

/// Run melee and core-contact resolution for all enemies.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    core_hp: &mut i32,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    let tower_index: HashMap<u32, Entity> = world
        .query::<&TowerUnit>()
        .iter()
        .map(|(entity, unit)| (unit.tower_id, entity))
        .collect();

    let enemies: Vec<(Entity, Position, TargetKind)> = world
        .query::<(&Enemy, &EnemyAgent, &Position)>()
        .iter()
        .filter(|(_, (_, agent, _))| !agent.is_dead)
        .map(|(entity, (_, agent, pos))| (entity, *pos, agent.target))
        .collect();

    let core = core_position();

    for (entity, enemy_pos, target) in enemies {
        let mut removed = false;

        // 1) Melee trade with the targeted tower. Core-kind towers are
        // excluded even when the enemy has locked onto one.
        if let TargetKind::Tower { tower_id } = target {
            if let Some(&tower_entity) = tower_index.get(&tower_id) {
                removed = resolve_melee(
                    world,
                    rng,
                    events,
                    despawn_buffer,
                    entity,
                    &enemy_pos,
                    tower_entity,
                );
            }
        }

        // 2) Core contact. This path exists so enemies that are out of
        // tower range or ignore towers (bosses) still damage the core.
        if !removed && enemy_pos.distance_to(&core) < CORE_ATTACK_RANGE {
            *core_hp = (*core_hp - 1).max(0);
            events.push(GameEvent::CoreHit {
                hp_remaining: *core_hp,
            });

            if let Ok(mut agent) = world.get::<&mut EnemyAgent>(entity) {
                agent.is_dead = true;
            }
            world_setup::spawn_debris_burst(world, rng, enemy_pos, ENEMY_DEBRIS_COUNT, 1.0, 1.4);
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Mutual hp trade between an enemy and its targeted tower.
/// Returns `true` when the trade killed the enemy.
fn resolve_melee(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
    enemy_entity: Entity,
    enemy_pos: &Position,
    tower_entity: Entity,
) -> bool {
    let (tower_kind, tower_destroyed) = match world.get::<&TowerUnit>(tower_entity) {
        Ok(unit) => (unit.kind, unit.is_destroyed),
        Err(_) => return false,
    };
    let tower_pos = match world.get::<&Position>(tower_entity) {
        Ok(pos) => *pos,
        Err(_) => return false,
    };
    let tower_hp = match world.get::<&Health>(tower_entity) {
        Ok(health) => health.hp,
        Err(_) => return false,
    };

    if tower_kind == TowerKind::Core
        || tower_destroyed
        || enemy_pos.distance_to(&tower_pos) >= TOWER_ATTACK_RANGE
    {
        return false;
    }

    let enemy_hp = match world.get::<&Health>(enemy_entity) {
        Ok(health) => health.hp,
        Err(_) => return false,
    };
    if enemy_hp <= 0 || tower_hp <= 0 {
        return false;
    }

    let trade = enemy_hp.min(tower_hp);

    // Tower side goes through its damage contract (destruction handled
    // there); enemy side is direct subtraction.
    damage::damage_tower(world, tower_entity, trade, rng, events);

    let killed = {
        match world.get::<&mut Health>(enemy_entity) {
            Ok(mut health) => {
                health.hp = (health.hp - trade).max(0);
                health.hp == 0
            }
            Err(_) => false,
        }
    };

    if killed {
        if let Ok(mut agent) = world.get::<&mut EnemyAgent>(enemy_entity) {
            agent.is_dead = true;
        }
        world_setup::spawn_debris_burst(world, rng, *enemy_pos, ENEMY_DEBRIS_COUNT, 1.0, 1.4);
        despawn_buffer.push(enemy_entity);
    }
    killed
}
