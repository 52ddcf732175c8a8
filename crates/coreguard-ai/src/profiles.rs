//! Per-role enemy stat profiles.

use coreguard_core::constants::*;
use coreguard_core::enums::EnemyRole;

/// Spawn-time stats for an enemy role.
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    pub hp: i32,
    /// Movement speed (units/sec).
    pub speed: f64,
    /// Whether this role considers towers at all. Bosses ignore them
    /// and head straight for the core.
    pub aggros_towers: bool,
}

/// Stat profile for an enemy role.
pub fn get_profile(role: EnemyRole) -> RoleProfile {
    match role {
        EnemyRole::Normal => RoleProfile {
            hp: NORMAL_ENEMY_HP,
            speed: ENEMY_SPEED,
            aggros_towers: true,
        },
        EnemyRole::MiniBoss => RoleProfile {
            hp: MINI_BOSS_HP,
            speed: MINI_BOSS_SPEED,
            aggros_towers: true,
        },
        EnemyRole::Boss => RoleProfile {
            hp: BOSS_HP,
            speed: BOSS_SPEED,
            aggros_towers: false,
        },
    }
}
