//! Enemy decision logic for coreguard.
//!
//! Pure functions that pick an enemy's destination from its role and
//! the set of live towers. No ECS dependency — operates on plain data.

pub mod profiles;
pub mod targeting;
