//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick
//! boundary.

use serde::{Deserialize, Serialize};

use crate::enums::TowerKind;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Begin a new session: spawns the core and starts the wave-1 intro.
    StartGame,
    /// Place a tower at a grid-aligned ground position. The placement
    /// layer has already validated the cell; the engine applies the
    /// cost table and ignores the request if coins are insufficient.
    PlaceTower { kind: TowerKind, x: f64, z: f64 },
}
