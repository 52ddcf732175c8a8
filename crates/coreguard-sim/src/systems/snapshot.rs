//! Snapshot system: queries the ECS world and builds a complete
//! GameStateSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use coreguard_core::components::*;
use coreguard_core::enums::{EnemyRole, WavePhase};
use coreguard_core::events::GameEvent;
use coreguard_core::state::*;
use coreguard_core::types::{Position, SimTime};

/// Build a complete snapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: WavePhase,
    wave: u32,
    wave_time_left: f64,
    banner: Option<&str>,
    core_hp: i32,
    coins: i32,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        wave,
        wave_time_left,
        timer_text: format_timer(wave_time_left),
        banner: banner.map(str::to_string),
        core_hp,
        coins,
        boss_hp_ratio: find_boss_hp_ratio(world),
        enemies: build_enemies(world),
        towers: build_towers(world),
        projectiles: build_projectiles(world),
        debris: build_debris(world),
        flashes: build_flashes(world),
        events,
    }
}

/// Countdown text in m:ss form.
fn format_timer(secs_left: f64) -> String {
    let total = secs_left.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// hp fraction of the live boss, if one exists.
fn find_boss_hp_ratio(world: &World) -> Option<f64> {
    world
        .query::<(&EnemyAgent, &Health)>()
        .iter()
        .find(|(_, (agent, _))| agent.role == EnemyRole::Boss && !agent.is_dead)
        .map(|(_, (_, health))| ratio(health))
}

fn ratio(health: &Health) -> f64 {
    if health.max_hp <= 0 {
        return 0.0;
    }
    (health.hp as f64 / health.max_hp as f64).clamp(0.0, 1.0)
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut views: Vec<EnemyView> = world
        .query::<(&Enemy, &EnemyAgent, &Health, &Position)>()
        .iter()
        .map(|(_, (_, agent, health, pos))| EnemyView {
            enemy_id: agent.enemy_id,
            role: agent.role,
            position: *pos,
            hp_ratio: ratio(health),
        })
        .collect();

    views.sort_by_key(|v| v.enemy_id);
    views
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut views: Vec<TowerView> = world
        .query::<(&Tower, &TowerUnit, &Health, &Position)>()
        .iter()
        .map(|(_, (_, unit, health, pos))| TowerView {
            tower_id: unit.tower_id,
            kind: unit.kind,
            position: *pos,
            hp_ratio: ratio(health),
            is_destroyed: unit.is_destroyed,
        })
        .collect();

    views.sort_by_key(|v| v.tower_id);
    views
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (proj, pos))| ProjectileView {
            position: *pos,
            source_kind: proj.source_kind,
        })
        .collect();

    // Deterministic ordering for serialized snapshots.
    views.sort_by(|a, b| {
        (a.position.x, a.position.z)
            .partial_cmp(&(b.position.x, b.position.z))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_debris(world: &World) -> Vec<DebrisView> {
    let mut views: Vec<DebrisView> = world
        .query::<(&DebrisPiece, &Position)>()
        .iter()
        .map(|(_, (piece, pos))| DebrisView {
            position: *pos,
            height: piece.height,
            spin: piece.spin,
            opacity: (1.0 - piece.age_secs / piece.lifetime_secs).clamp(0.0, 1.0),
        })
        .collect();

    views.sort_by(|a, b| {
        (a.position.x, a.position.z)
            .partial_cmp(&(b.position.x, b.position.z))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}

fn build_flashes(world: &World) -> Vec<BeamFlashView> {
    let mut views: Vec<BeamFlashView> = world
        .query::<&BeamFlash>()
        .iter()
        .map(|(_, flash)| BeamFlashView {
            from: Position::new(flash.from_x, flash.from_z),
            to: Position::new(flash.to_x, flash.to_z),
        })
        .collect();

    views.sort_by(|a, b| {
        (a.from.x, a.from.z, a.to.x, a.to.z)
            .partial_cmp(&(b.from.x, b.from.z, b.to.x, b.to.z))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    views
}
