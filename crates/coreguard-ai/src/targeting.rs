//! Target selection for enemy units.
//!
//! Scans live towers within the aggro radius, tracking the nearest and
//! second-nearest distances. A near-tie between the two resolves to the
//! core, which keeps enemies from oscillating between two towers that
//! sit at almost the same distance.

use coreguard_core::constants::{TARGET_TIE_EPSILON, TOWER_AGGRO_RADIUS};
use coreguard_core::enums::{EnemyRole, TargetKind, TowerKind};
use coreguard_core::types::Position;

use crate::profiles::get_profile;

/// A tower as seen by the targeting scan.
#[derive(Debug, Clone, Copy)]
pub struct TowerCandidate {
    pub tower_id: u32,
    pub kind: TowerKind,
    pub position: Position,
    pub is_destroyed: bool,
}

/// Pick an enemy's destination.
///
/// Bosses always head for the core. Other roles lock onto the nearest
/// live tower within [`TOWER_AGGRO_RADIUS`], unless the nearest and
/// second-nearest are within [`TARGET_TIE_EPSILON`] of each other, in
/// which case the tie resolves to the core.
///
/// Destroyed towers are skipped; core-kind towers are not (melee
/// resolution excludes them separately, so a core-lock costs the enemy
/// nothing and the core-contact radius resolves it).
pub fn select_target(
    role: EnemyRole,
    enemy_pos: &Position,
    candidates: &[TowerCandidate],
) -> TargetKind {
    if !get_profile(role).aggros_towers {
        return TargetKind::Core;
    }

    let mut min_dist = TOWER_AGGRO_RADIUS;
    let mut second_min = f64::INFINITY;
    let mut nearest: Option<u32> = None;

    for tower in candidates {
        if tower.is_destroyed {
            continue;
        }

        let d = enemy_pos.distance_to(&tower.position);
        if d < min_dist {
            // Previous nearest becomes second-nearest.
            second_min = min_dist;
            min_dist = d;
            nearest = Some(tower.tower_id);
        } else if d < second_min {
            second_min = d;
        }
    }

    match nearest {
        Some(_) if (second_min - min_dist).abs() < TARGET_TIE_EPSILON => TargetKind::Core,
        Some(tower_id) => TargetKind::Tower { tower_id },
        None => TargetKind::Core,
    }
}
