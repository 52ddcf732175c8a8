//! Enemy targeting system — re-evaluates each enemy's destination.
//!
//! Builds the tower candidate list once, then applies the pure decision
//! from coreguard-ai per enemy.

use hecs::World;

use coreguard_core::components::{Enemy, EnemyAgent, Tower, TowerUnit};
use coreguard_core::types::Position;

use coreguard_ai::targeting::{select_target, TowerCandidate};

/// Run the targeting scan for all live enemies.
pub fn run(world: &mut World) {
    let candidates: Vec<TowerCandidate> = world
        .query::<(&Tower, &TowerUnit, &Position)>()
        .iter()
        .map(|(_, (_, unit, pos))| TowerCandidate {
            tower_id: unit.tower_id,
            kind: unit.kind,
            position: *pos,
            is_destroyed: unit.is_destroyed,
        })
        .collect();

    for (_, (_, agent, pos)) in world.query_mut::<(&Enemy, &mut EnemyAgent, &Position)>() {
        if agent.is_dead {
            continue;
        }
        agent.target = select_target(agent.role, pos, &candidates);
    }
}
