//! The simulation engine — owns the world and runs the fixed-tick loop.
//!
//! One call to [`SimulationEngine::tick`] advances the simulation by one
//! step: queued commands are applied, the phase machine and all systems
//! run in a fixed order, and a complete [`GameStateSnapshot`] is built
//! from the resulting world. Everything is single-threaded and, for a
//! given seed and command sequence, fully deterministic.

use std::collections::VecDeque;
use std::mem;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use coreguard_core::commands::PlayerCommand;
use coreguard_core::constants::*;
use coreguard_core::enums::{TowerKind, WavePhase};
use coreguard_core::env::{NullEnv, WorldEnv};
use coreguard_core::events::GameEvent;
use coreguard_core::state::GameStateSnapshot;
use coreguard_core::types::{Position, SimTime};

use crate::director::WaveDirector;
use crate::spawner::SpawnerState;
use crate::systems::{
    combat, effects, movement, projectiles, snapshot, targeting, tower_fire,
};
use crate::world_setup;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed; the same seed and command sequence reproduce the same
    /// run tick for tick.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The complete simulation: ECS world, phase machine, spawner, and the
/// session resources (core hp, coins) that live outside the world.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    director: WaveDirector,
    spawner: SpawnerState,
    env: Box<dyn WorldEnv>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    despawn_buffer: Vec<Entity>,
    next_enemy_id: u32,
    next_tower_id: u32,
    core_hp: i32,
    coins: i32,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self::with_env(config, Box::new(NullEnv))
    }

    /// Build an engine wired to a specific environment collaborator.
    pub fn with_env(config: SimConfig, env: Box<dyn WorldEnv>) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            director: WaveDirector::default(),
            spawner: SpawnerState::default(),
            env,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            next_enemy_id: 0,
            next_tower_id: 0,
            core_hp: 0,
            coins: 0,
        }
    }

    /// Queue a player command for the next tick.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one fixed step and return the snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.director.phase != WavePhase::Idle {
            self.env.update_day_night(
                self.time.elapsed_secs,
                self.director.phase == WavePhase::BossPhase,
            );

            self.director.run(
                &mut self.world,
                &mut self.rng,
                &mut self.spawner,
                self.env.as_mut(),
                &mut self.events,
                &mut self.despawn_buffer,
                &mut self.next_enemy_id,
                self.time.tick,
            );

            crate::spawner::run(
                &mut self.world,
                &mut self.rng,
                &mut self.spawner,
                self.director.wave_progress(),
                self.director.spawning_enabled,
                &mut self.next_enemy_id,
            );

            targeting::run(&mut self.world);
            movement::run(&mut self.world);
            combat::run(
                &mut self.world,
                &mut self.rng,
                &mut self.core_hp,
                &mut self.events,
                &mut self.despawn_buffer,
            );
            tower_fire::run(
                &mut self.world,
                &mut self.rng,
                self.time.tick,
                &mut self.events,
                &mut self.coins,
                &mut self.despawn_buffer,
            );
            projectiles::run(
                &mut self.world,
                &mut self.rng,
                &mut self.events,
                &mut self.coins,
                &mut self.despawn_buffer,
            );
            effects::run(&mut self.world, self.time.tick, &mut self.despawn_buffer);
        }

        self.time.advance();

        snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.director.phase,
            self.director.current_wave,
            self.director.wave_time_left,
            self.director.banner(),
            self.core_hp,
            self.coins,
            mem::take(&mut self.events),
        )
    }

    /// Apply all queued commands against the current state.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            match command {
                PlayerCommand::StartGame => self.start_game(),
                PlayerCommand::PlaceTower { kind, x, z } => self.place_tower(kind, x, z),
            }
        }
    }

    /// Begin a fresh session. Ignored unless the engine is idle.
    fn start_game(&mut self) {
        if self.director.phase != WavePhase::Idle {
            return;
        }

        world_setup::setup_session(&mut self.world, &mut self.next_tower_id);
        self.core_hp = CORE_START_HP;
        self.coins = 0;
        self.env.set_biome_for_wave(1);
        self.director.start_session(self.time.tick);
    }

    /// Place a tower at the grid cell containing (x, z), if the kind is
    /// placeable, affordable, and a session is running.
    fn place_tower(&mut self, kind: TowerKind, x: f64, z: f64) {
        if self.director.phase == WavePhase::Idle {
            return;
        }
        let Some(cost) = tower_cost(kind) else {
            return;
        };
        if self.coins < cost {
            return;
        }

        self.coins -= cost;
        let position = Position::new(snap_to_grid(x), snap_to_grid(z));
        let tower_id = world_setup::spawn_tower(&mut self.world, &mut self.next_tower_id, kind, position);
        self.events.push(GameEvent::TowerPlaced {
            tower_id,
            kind,
            cost,
        });
    }

    // --- Accessors ---

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> &SimTime {
        &self.time
    }

    pub fn phase(&self) -> WavePhase {
        self.director.phase
    }

    pub fn current_wave(&self) -> u32 {
        self.director.current_wave
    }

    pub fn core_hp(&self) -> i32 {
        self.core_hp
    }

    pub fn coins(&self) -> i32 {
        self.coins
    }

    #[cfg(test)]
    pub(crate) fn director_mut(&mut self) -> &mut WaveDirector {
        &mut self.director
    }

    #[cfg(test)]
    pub(crate) fn spawner(&self) -> &SpawnerState {
        &self.spawner
    }

    #[cfg(test)]
    pub(crate) fn set_coins(&mut self, coins: i32) {
        self.coins = coins;
    }

    #[cfg(test)]
    pub(crate) fn spawn_enemy_for_test(
        &mut self,
        role: coreguard_core::enums::EnemyRole,
        position: Position,
    ) -> u32 {
        world_setup::spawn_enemy_at(&mut self.world, role, position, &mut self.next_enemy_id)
    }
}

/// Snap a ground coordinate to the center of its placement cell.
fn snap_to_grid(v: f64) -> f64 {
    (v / GRID_SIZE).round() * GRID_SIZE
}
