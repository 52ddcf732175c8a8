//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy role category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyRole {
    /// Standard wave unit.
    #[default]
    Normal,
    /// Mid-wave elevated-difficulty unit, one per wave.
    MiniBoss,
    /// End-of-wave unit; at most one alive at any time.
    Boss,
}

/// Tower type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Single projectile per burst, short cooldown.
    #[default]
    Basic,
    /// Two staggered projectiles per burst.
    Double,
    /// Long-range instant-effect shot.
    Sniper,
    /// Short-range high-damage instant-effect shot.
    Cannon,
    /// The defended core. Fires like a basic tower but is excluded from
    /// melee trades and cannot be placed by the player.
    Core,
}

/// What an enemy is currently heading toward.
/// Exactly one of: the core, or a specific live tower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TargetKind {
    #[default]
    Core,
    Tower {
        tower_id: u32,
    },
}

/// How a tower's discharge resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// Damage applied the moment the shot is fired; a short-lived beam
    /// flash marks the shot.
    Instant,
    /// A projectile entity travels toward the target and resolves on
    /// approach.
    Projectile,
}

/// Wave phase (top-level state machine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No session running yet.
    #[default]
    Idle,
    /// Countdown sequence before the wave timer starts; spawning disabled.
    Intro,
    /// Wave timer running, spawning enabled.
    Active,
    /// Timer expired: spawning disabled, a single boss is active.
    BossPhase,
}
