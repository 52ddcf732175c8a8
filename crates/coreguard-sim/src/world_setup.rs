//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the core, placed towers, enemies, and ephemeral effect
//! entities with appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::*;
use coreguard_core::constants::*;
use coreguard_core::enums::{EnemyRole, TargetKind, TowerKind};
use coreguard_core::types::Position;

use coreguard_ai::profiles::get_profile;

/// The core sits at the map origin; every enemy's default destination.
pub fn core_position() -> Position {
    Position::new(0.0, 0.0)
}

/// Set up a fresh session: spawns the core tower at the origin.
/// Returns the core's tower id.
pub fn setup_session(world: &mut World, next_tower_id: &mut u32) -> u32 {
    spawn_tower(world, next_tower_id, TowerKind::Core, core_position())
}

/// Spawn a tower of the given kind at a grid-aligned position.
/// Returns the assigned tower id.
pub fn spawn_tower(
    world: &mut World,
    next_tower_id: &mut u32,
    kind: TowerKind,
    position: Position,
) -> u32 {
    let tower_id = *next_tower_id;
    *next_tower_id += 1;

    let stats = tower_stats(kind);
    world.spawn((
        Tower,
        position,
        Health {
            hp: stats.max_hp,
            max_hp: stats.max_hp,
        },
        TowerUnit {
            tower_id,
            kind,
            last_fire_tick: None,
            is_destroyed: false,
        },
    ));
    tower_id
}

/// Pick a spawn point on a random edge of the playfield square.
fn random_edge_position(rng: &mut ChaCha8Rng) -> Position {
    let range = SPAWN_EDGE_RANGE;
    let offset = rng.gen_range(-range..range);
    match rng.gen_range(0..4u8) {
        0 => Position::new(-range, offset),
        1 => Position::new(range, offset),
        2 => Position::new(offset, -range),
        _ => Position::new(offset, range),
    }
}

/// Spawn a normal enemy at a random map edge.
pub fn spawn_enemy(world: &mut World, rng: &mut ChaCha8Rng, next_enemy_id: &mut u32) -> u32 {
    spawn_enemy_at(
        world,
        EnemyRole::Normal,
        random_edge_position(rng),
        next_enemy_id,
    )
}

/// Spawn the wave's mini-boss at a random map edge.
pub fn spawn_mini_boss(world: &mut World, rng: &mut ChaCha8Rng, next_enemy_id: &mut u32) -> u32 {
    spawn_enemy_at(
        world,
        EnemyRole::MiniBoss,
        random_edge_position(rng),
        next_enemy_id,
    )
}

/// Spawn the boss at its fixed approach point.
/// No-op returning `None` when a live boss already exists.
pub fn spawn_boss(world: &mut World, next_enemy_id: &mut u32) -> Option<u32> {
    let boss_alive = world
        .query::<&EnemyAgent>()
        .iter()
        .any(|(_, agent)| agent.role == EnemyRole::Boss && !agent.is_dead);
    if boss_alive {
        return None;
    }

    Some(spawn_enemy_at(
        world,
        EnemyRole::Boss,
        Position::new(BOSS_SPAWN_X, BOSS_SPAWN_Z),
        next_enemy_id,
    ))
}

/// Spawn an enemy of the given role at an explicit position.
pub fn spawn_enemy_at(
    world: &mut World,
    role: EnemyRole,
    position: Position,
    next_enemy_id: &mut u32,
) -> u32 {
    let enemy_id = *next_enemy_id;
    *next_enemy_id += 1;

    let profile = get_profile(role);
    world.spawn((
        Enemy,
        position,
        Health {
            hp: profile.hp,
            max_hp: profile.hp,
        },
        EnemyAgent {
            enemy_id,
            role,
            speed: profile.speed,
            target: TargetKind::Core,
            is_dead: false,
        },
    ));
    enemy_id
}

/// Scatter a burst of cosmetic debris pieces around a death position.
pub fn spawn_debris_burst(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    origin: Position,
    count: usize,
    min_life: f64,
    max_life: f64,
) {
    for _ in 0..count {
        let position = Position::new(
            origin.x + rng.gen_range(-0.25..0.25),
            origin.z + rng.gen_range(-0.25..0.25),
        );
        let piece = DebrisPiece {
            vel_x: rng.gen_range(-2.5..2.5),
            vel_z: rng.gen_range(-2.5..2.5),
            height: rng.gen_range(0.0..0.5),
            vel_y: rng.gen_range(2.0..5.0),
            spin: rng.gen_range(-4.0..4.0),
            age_secs: 0.0,
            lifetime_secs: rng.gen_range(min_life..max_life),
        };
        world.spawn((position, piece));
    }
}

/// Spawn a short-lived beam flash marking an instant-effect shot.
pub fn spawn_beam_flash(world: &mut World, from: Position, to: Position, expires_at_tick: u64) {
    world.spawn((BeamFlash {
        from_x: from.x,
        from_z: from.z,
        to_x: to.x,
        to_z: to.z,
        expires_at_tick,
    },));
}
