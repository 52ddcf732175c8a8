//! Game state snapshot — the complete visible state produced each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete game state handed to the rendering/UI layer after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: WavePhase,
    pub wave: u32,
    /// Seconds left on the active wave timer.
    pub wave_time_left: f64,
    /// Countdown text in m:ss form for the top panel.
    pub timer_text: String,
    /// Center-screen banner ("3", "WARNING", ...), if one is showing.
    pub banner: Option<String>,
    pub core_hp: i32,
    pub coins: i32,
    /// Boss hp fraction while a boss is alive.
    pub boss_hp_ratio: Option<f64>,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub debris: Vec<DebrisView>,
    pub flashes: Vec<BeamFlashView>,
    /// Discrete events since the previous snapshot.
    pub events: Vec<GameEvent>,
}

/// A renderable enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub enemy_id: u32,
    pub role: EnemyRole,
    pub position: Position,
    /// hp / max_hp, clamped to [0, 1].
    pub hp_ratio: f64,
}

/// A renderable tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub tower_id: u32,
    pub kind: TowerKind,
    pub position: Position,
    pub hp_ratio: f64,
    /// Destroyed towers hide their primary visual but keep their cell.
    pub is_destroyed: bool,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub source_kind: TowerKind,
}

/// A cosmetic debris piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisView {
    pub position: Position,
    pub height: f64,
    pub spin: f64,
    /// 1.0 at spawn fading to 0.0 at end of life.
    pub opacity: f64,
}

/// An instant-shot beam flash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamFlashView {
    pub from: Position,
    pub to: Position,
}
