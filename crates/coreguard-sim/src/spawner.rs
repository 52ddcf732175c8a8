//! Wave spawner — time-based enemy creation following the per-wave
//! difficulty curve.
//!
//! The spawn interval interpolates linearly from the wave's max interval
//! down to its min interval as wave progress goes 0 → 1. The accumulator
//! resets to zero on each spawn rather than subtracting the interval;
//! surplus time beyond the threshold is discarded, which skews the
//! average interval slightly under coarse steps (kept as-is).

use hecs::World;
use rand_chacha::ChaCha8Rng;

use coreguard_core::constants::*;

use crate::world_setup;

/// Spawn timing state, reset at the start of each wave.
#[derive(Debug, Clone)]
pub struct SpawnerState {
    /// Wave index the interval config is read for (1-based).
    pub current_wave: u32,
    /// Seconds accumulated since the last spawn.
    pub elapsed_since_spawn: f64,
    /// Whether this wave's single mid-wave mini-boss has been spawned.
    pub mini_boss_spawned: bool,
}

impl Default for SpawnerState {
    fn default() -> Self {
        Self {
            current_wave: 1,
            elapsed_since_spawn: 0.0,
            mini_boss_spawned: false,
        }
    }
}

impl SpawnerState {
    /// Point the spawner at a new wave and reset its timer and
    /// mini-boss flag.
    pub fn set_wave(&mut self, wave: u32) {
        self.current_wave = wave;
        self.reset_timer();
    }

    /// Reset the spawn accumulator and the per-wave mini-boss flag.
    pub fn reset_timer(&mut self) {
        self.elapsed_since_spawn = 0.0;
        self.mini_boss_spawned = false;
    }

    /// Current spawn interval for a progress fraction:
    /// `max − (max − min) × p`.
    pub fn interval_at(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        let (max_i, min_i) = wave_interval_config(self.current_wave);
        max_i - (max_i - min_i) * p
    }
}

/// Accumulate time and spawn when due. Gated entirely by
/// `spawning_enabled`; `progress` is supplied by the phase machine.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut SpawnerState,
    progress: f64,
    spawning_enabled: bool,
    next_enemy_id: &mut u32,
) {
    if !spawning_enabled {
        return;
    }

    let p = progress.clamp(0.0, 1.0);
    spawner.elapsed_since_spawn += DT;

    if spawner.elapsed_since_spawn >= spawner.interval_at(p) {
        if !spawner.mini_boss_spawned && p > MINI_BOSS_WINDOW_LOW && p < MINI_BOSS_WINDOW_HIGH {
            world_setup::spawn_mini_boss(world, rng, next_enemy_id);
            spawner.mini_boss_spawned = true;
        } else {
            world_setup::spawn_enemy(world, rng, next_enemy_id);
        }
        spawner.elapsed_since_spawn = 0.0;
    }
}
