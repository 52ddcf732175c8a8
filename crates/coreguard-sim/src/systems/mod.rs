//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are functions that take `&mut World` (or `&World` for
//! read-only). They do not own state — all state lives in components or
//! on the engine.

pub mod combat;
pub mod damage;
pub mod effects;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod targeting;
pub mod tower_fire;
