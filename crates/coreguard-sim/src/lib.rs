//! Simulation engine for coreguard.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the frontend.

pub mod director;
pub mod engine;
pub mod spawner;
pub mod systems;
pub mod world_setup;

pub use coreguard_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
