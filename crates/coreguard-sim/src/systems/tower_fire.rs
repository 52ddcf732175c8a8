//! Tower firing system — cooldown-gated target acquisition and burst
//! discharge.
//!
//! Each live tower scans all enemies for the nearest one within range.
//! When its cooldown has elapsed it fires a full burst: instant-effect
//! kinds apply damage immediately and leave a beam flash; projectile
//! kinds spawn traveling projectiles, staggered laterally for
//! multi-shot towers.

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::{Enemy, EnemyAgent, Projectile, Tower, TowerUnit};
use coreguard_core::constants::*;
use coreguard_core::enums::FireMode;
use coreguard_core::events::GameEvent;
use coreguard_core::types::Position;

use crate::systems::damage;
use crate::world_setup;

/// Run target acquisition and firing for all live towers.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    current_tick: u64,
    events: &mut Vec<GameEvent>,
    coins: &mut i32,
    despawn_buffer: &mut Vec<Entity>,
) {
    let towers: Vec<(Entity, Position, TowerUnit)> = world
        .query::<(&Tower, &TowerUnit, &Position)>()
        .iter()
        .filter(|(_, (_, unit, _))| !unit.is_destroyed)
        .map(|(entity, (_, unit, pos))| (entity, *pos, unit.clone()))
        .collect();

    let enemies: Vec<(Entity, Position)> = world
        .query::<(&Enemy, &EnemyAgent, &Position)>()
        .iter()
        .map(|(entity, (_, _, pos))| (entity, *pos))
        .collect();

    for (tower_entity, tower_pos, unit) in towers {
        let stats = tower_stats(unit.kind);

        let cooled_down = match unit.last_fire_tick {
            None => true,
            Some(last) => (current_tick.saturating_sub(last)) as f64 * DT >= stats.fire_period_secs,
        };
        if !cooled_down {
            continue;
        }

        // Nearest live enemy within range. Liveness is re-checked
        // against the world so enemies killed earlier this tick by
        // another tower are skipped.
        let mut nearest: Option<(Entity, Position)> = None;
        let mut min_dist = stats.range;
        for &(enemy_entity, enemy_pos) in &enemies {
            let alive = world
                .get::<&EnemyAgent>(enemy_entity)
                .map_or(false, |agent| !agent.is_dead);
            if !alive {
                continue;
            }
            let dist = tower_pos.distance_to(&enemy_pos);
            if dist < min_dist {
                min_dist = dist;
                nearest = Some((enemy_entity, enemy_pos));
            }
        }

        let Some((target_entity, target_pos)) = nearest else {
            continue;
        };

        if let Ok(mut live_unit) = world.get::<&mut TowerUnit>(tower_entity) {
            live_unit.last_fire_tick = Some(current_tick);
        }

        match stats.mode {
            FireMode::Instant => {
                for _ in 0..stats.shots_per_burst {
                    let _ = damage::damage_enemy(
                        world,
                        target_entity,
                        stats.damage,
                        rng,
                        events,
                        coins,
                        despawn_buffer,
                    );
                }
                let flash_ticks = (BEAM_FLASH_SECS * TICK_RATE as f64).ceil() as u64;
                world_setup::spawn_beam_flash(
                    world,
                    tower_pos,
                    target_pos,
                    current_tick + flash_ticks,
                );
            }
            FireMode::Projectile => {
                let target_id = target_enemy_id(world, target_entity);
                for i in 0..stats.shots_per_burst {
                    let start = stagger_origin(tower_pos, target_pos, i, stats.shots_per_burst);
                    world.spawn((
                        start,
                        Projectile {
                            source_kind: unit.kind,
                            target_enemy_id: target_id,
                            speed: PROJECTILE_SPEED,
                            damage: stats.damage,
                        },
                    ));
                }
            }
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Offset a burst shot sideways from the tower-to-target line so
/// multi-shot bursts fan out instead of overlapping.
fn stagger_origin(tower_pos: Position, target_pos: Position, index: u32, total: u32) -> Position {
    if total <= 1 {
        return tower_pos;
    }

    let to_target = tower_pos.direction_to(&target_pos);
    if to_target.length_squared() == 0.0 {
        return tower_pos;
    }

    let side = DVec2::new(-to_target.y, to_target.x);
    let offset = (index as f64 - (total - 1) as f64 / 2.0) * BURST_STAGGER_SPACING;

    let mut start = tower_pos;
    start.advance(side, offset);
    start
}

fn target_enemy_id(world: &World, entity: Entity) -> u32 {
    world
        .get::<&EnemyAgent>(entity)
        .map(|agent| agent.enemy_id)
        .unwrap_or(u32::MAX)
}
