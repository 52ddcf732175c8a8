//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Hit points, shared by enemies and towers. Always clamped ≥ 0 by the
/// damage systems.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
}

/// Per-enemy AI state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyAgent {
    /// Stable id for projectile targeting and snapshots.
    pub enemy_id: u32,
    pub role: EnemyRole,
    /// Movement speed (units/sec).
    pub speed: f64,
    /// Current destination: the core or a specific live tower.
    pub target: TargetKind,
    /// Set exactly once by the kill path; suppresses duplicate kill
    /// notifications from overlapping damage sources.
    pub is_dead: bool,
}

/// Per-tower combat state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerUnit {
    /// Stable id for enemy targeting and snapshots.
    pub tower_id: u32,
    pub kind: TowerKind,
    /// Tick of the last fired burst; `None` until the first shot.
    pub last_fire_tick: Option<u64>,
    /// A destroyed tower stops firing and is non-targetable, but stays
    /// registered as an obstacle occupying its placement cell.
    pub is_destroyed: bool,
}

/// A traveling projectile chasing a specific enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Kind of the tower that fired this shot.
    pub source_kind: TowerKind,
    pub target_enemy_id: u32,
    /// Travel speed (units/sec).
    pub speed: f64,
    pub damage: i32,
}

/// A cosmetic debris piece spawned on a death event.
/// Carries no gameplay state and never affects invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisPiece {
    /// Ground-plane velocity.
    pub vel_x: f64,
    pub vel_z: f64,
    /// Vertical state; debris arcs up and falls under gravity.
    pub height: f64,
    pub vel_y: f64,
    /// Angular velocity (rad/sec) for spin in the renderer.
    pub spin: f64,
    pub age_secs: f64,
    pub lifetime_secs: f64,
}

/// Short-lived visual marker for an instant-effect shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamFlash {
    pub from_x: f64,
    pub from_z: f64,
    pub to_x: f64,
    pub to_z: f64,
    /// Tick at which this flash is removed.
    pub expires_at_tick: u64,
}

/// Marks an entity as an enemy unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Marks an entity as a tower (including the core).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower;
