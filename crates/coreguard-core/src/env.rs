//! Environment collaborator interface.
//!
//! The world/rendering layer owns biome selection and day-night visuals;
//! the simulation only signals it through this trait.

/// Hooks the simulation calls into the world/environment layer.
pub trait WorldEnv {
    /// Called once per wave advancement with the new wave index.
    fn set_biome_for_wave(&mut self, wave: u32);

    /// Called every tick with elapsed session time; `boss_phase` lets
    /// the environment hold its night state during the boss fight.
    fn update_day_night(&mut self, elapsed_secs: f64, boss_phase: bool);
}

/// No-op environment for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullEnv;

impl WorldEnv for NullEnv {
    fn set_biome_for_wave(&mut self, _wave: u32) {}
    fn update_day_night(&mut self, _elapsed_secs: f64, _boss_phase: bool) {}
}
