//! Simulation constants and tuning parameters.

use crate::enums::{FireMode, TowerKind};

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Map ---

/// Half-extent of the playfield; enemies spawn on this square's edge.
pub const SPAWN_EDGE_RANGE: f64 = 20.0;

/// Grid cell size for tower placement.
pub const GRID_SIZE: f64 = 2.0;

// --- Enemy movement & melee ---

/// Base enemy movement speed (units/sec).
pub const ENEMY_SPEED: f64 = 1.0;

/// Maximum distance at which an enemy will consider a tower as a target.
pub const TOWER_AGGRO_RADIUS: f64 = 8.0;

/// Distance at which an enemy starts trading melee hits with a tower.
pub const TOWER_ATTACK_RANGE: f64 = 1.5;

/// Fraction of the attack range at which a tower-targeting enemy holds
/// position instead of advancing.
pub const MELEE_HOLD_FACTOR: f64 = 0.9;

/// If the nearest and second-nearest towers are within this distance of
/// each other, the enemy targets the core instead (prevents oscillation).
pub const TARGET_TIE_EPSILON: f64 = 0.2;

/// Range at which an enemy damages the core and is consumed.
pub const CORE_ATTACK_RANGE: f64 = 2.0;

// --- Enemy roles ---

pub const NORMAL_ENEMY_HP: i32 = 1;

pub const MINI_BOSS_HP: i32 = 10;
pub const MINI_BOSS_SPEED: f64 = 2.0;

pub const BOSS_HP: i32 = 50;
pub const BOSS_SPEED: f64 = 1.5;
/// Boss spawn point, well outside the playfield.
pub const BOSS_SPAWN_X: f64 = 0.0;
pub const BOSS_SPAWN_Z: f64 = -60.0;

// --- Session ---

/// Starting core hit points.
pub const CORE_START_HP: i32 = 20;

/// Coins awarded per enemy killed by tower fire.
pub const KILL_REWARD: i32 = 1;

// --- Projectiles ---

/// Projectile travel speed (units/sec).
pub const PROJECTILE_SPEED: f64 = 20.0;

/// Distance at which a projectile counts as a hit.
pub const PROJECTILE_HIT_RADIUS: f64 = 0.5;

/// Lateral spacing between staggered burst projectiles.
pub const BURST_STAGGER_SPACING: f64 = 0.8;

// --- Effects ---

/// Lifetime of the instant-shot beam flash (seconds).
pub const BEAM_FLASH_SECS: f64 = 0.12;

/// Debris pieces per enemy death burst.
pub const ENEMY_DEBRIS_COUNT: usize = 8;

/// Debris pieces per tower destruction burst.
pub const TOWER_DEBRIS_COUNT: usize = 10;

/// Gravity applied to debris vertical velocity (units/sec²).
/// Integrated at half strength per step; debris hangs a little longer
/// than true free fall.
pub const DEBRIS_GRAVITY: f64 = -9.8;

// --- Waves ---

/// Active wave duration (seconds).
pub const WAVE_DURATION_SECS: f64 = 60.0;

/// Seconds between intro countdown steps ("3", "2", "1", "Wave N").
pub const INTRO_STEP_SECS: f64 = 1.0;

/// How long the boss WARNING banner stays up (seconds).
pub const BOSS_WARNING_SECS: f64 = 1.2;

/// Mini-boss spawn window: first spawn check with progress strictly
/// inside (low, high) produces the wave's single mini-boss.
pub const MINI_BOSS_WINDOW_LOW: f64 = 0.4;
pub const MINI_BOSS_WINDOW_HIGH: f64 = 0.9;

/// Per-wave spawn interval configuration: (max_interval, min_interval)
/// in seconds. The live interval interpolates linearly from max to min
/// as wave progress goes 0 → 1.
pub const WAVE_INTERVALS: [(f64, f64); 3] = [
    (1.5, 0.4),  // wave 1: starts slow, ends fairly fast
    (1.2, 0.35), // wave 2: overall faster
    (1.0, 0.3),  // wave 3: faster still
];

/// Spawn interval config for a wave index (1-based). Waves beyond the
/// table reuse the wave-1 config.
pub fn wave_interval_config(wave: u32) -> (f64, f64) {
    let idx = wave.saturating_sub(1) as usize;
    *WAVE_INTERVALS.get(idx).unwrap_or(&WAVE_INTERVALS[0])
}

// --- Tower stats ---

/// Static per-kind tower stats.
#[derive(Debug, Clone, Copy)]
pub struct TowerStats {
    /// Cooldown between bursts (seconds).
    pub fire_period_secs: f64,
    /// Discharges per burst.
    pub shots_per_burst: u32,
    /// Target acquisition range.
    pub range: f64,
    pub max_hp: i32,
    /// Damage per discharge.
    pub damage: i32,
    pub mode: FireMode,
}

/// Stats table for each tower kind.
pub fn tower_stats(kind: TowerKind) -> TowerStats {
    match kind {
        TowerKind::Core => TowerStats {
            fire_period_secs: 2.4,
            shots_per_burst: 1,
            range: 15.0,
            max_hp: 9999,
            damage: 1,
            mode: FireMode::Projectile,
        },
        TowerKind::Basic => TowerStats {
            fire_period_secs: 1.2,
            shots_per_burst: 1,
            range: 15.0,
            max_hp: 5,
            damage: 1,
            mode: FireMode::Projectile,
        },
        TowerKind::Double => TowerStats {
            fire_period_secs: 1.2,
            shots_per_burst: 2,
            range: 15.0,
            max_hp: 5,
            damage: 1,
            mode: FireMode::Projectile,
        },
        TowerKind::Sniper => TowerStats {
            fire_period_secs: 4.8,
            shots_per_burst: 1,
            range: 50.0,
            max_hp: 5,
            damage: 10,
            mode: FireMode::Instant,
        },
        TowerKind::Cannon => TowerStats {
            fire_period_secs: 2.4,
            shots_per_burst: 1,
            range: 10.0,
            max_hp: 5,
            damage: 15,
            mode: FireMode::Instant,
        },
    }
}

/// Placement cost per tower kind. The core is not placeable.
pub fn tower_cost(kind: TowerKind) -> Option<i32> {
    match kind {
        TowerKind::Basic => Some(5),
        TowerKind::Double => Some(10),
        TowerKind::Sniper => Some(15),
        TowerKind::Cannon => Some(12),
        TowerKind::Core => None,
    }
}
