//! Core types and definitions for the coreguard simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, and constants.
//! It has no dependency on any ECS or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod env;
pub mod events;
pub mod state;
pub mod types;
