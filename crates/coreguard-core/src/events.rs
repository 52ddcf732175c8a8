//! Discrete events emitted by the simulation for UI feedback.
//!
//! Drained into each tick's snapshot; consumers react once per event.

use serde::{Deserialize, Serialize};

use crate::enums::TowerKind;

/// Per-tick game events for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// An enemy reached the core: −1 core hp.
    CoreHit { hp_remaining: i32 },
    /// An enemy was killed by tower fire: +1 coin.
    EnemyKilled { enemy_id: u32 },
    /// Intro countdown step ("3", "2", "1", "Wave N").
    CountdownStep { text: String },
    /// Wave timer started, spawning enabled.
    WaveStarted { wave: u32 },
    /// One-shot boss warning banner.
    BossWarning,
    /// The boss phase spawned its boss.
    BossSpawned { enemy_id: u32 },
    /// Boss killed, next wave prepared.
    WaveAdvanced { wave: u32 },
    /// A tower crossed into its destroyed state.
    TowerDestroyed { tower_id: u32 },
    /// A placement request was accepted and paid for.
    TowerPlaced { tower_id: u32, kind: TowerKind, cost: i32 },
}
