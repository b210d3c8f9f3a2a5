//! # Skyjam Core
//!
//! Melee/aerial combat core simulation for Skyjam.
//!
//! This crate implements the kinetic physics/collision integrator and the
//! aerial-verb claim state machine for a 2.5D combat arena: launched enemies
//! can be float-selected, dunked into the ground, or spiked across the arena
//! as ballistic payloads. Rendering, audio, VFX, HUD, and input polling are
//! external collaborators — the core consumes a terrain query, the player
//! body, and an input snapshot each tick, and emits fire-and-forget event
//! records.
//!
//! ## Architecture
//!
//! Everything hangs off [`session::CombatSession`], which owns:
//!
//! - [`arena::Arena`] — entity storage with deterministic iteration
//! - [`tags::TagRegistry`] — hierarchical status tags for player and entities
//! - [`launch::LaunchRegistry`] — airborne entities and the single-owner
//!   claim slot
//! - [`field::CollisionField`] — cached AABB obstacle and pit geometry
//! - the physics stages in [`resolver`] and the verb state machines in
//!   [`verbs`]
//!
//! The simulation is single-threaded and fixed-tick; the claim slot is the
//! only concurrency-like construct (exactly one writer per entity per tick).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skyjam_core::{CombatSession, SessionConfig, StepInput};
//!
//! let mut session = CombatSession::new(SessionConfig::default())?;
//! // spawn entities, then once per tick:
//! session.step(StepInput { dt, real_dt_ms, player, input, terrain });
//! for event in session.take_events() { /* feed audio/VFX */ }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod config;
pub mod entity;
pub mod events;
pub mod field;
pub mod launch;
pub mod resolver;
pub mod session;
pub mod tags;
pub mod verbs;
pub mod world;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::Arena;
pub use config::{ConfigError, SessionConfig};
pub use entity::{Entity, EntityId};
pub use events::{CombatEvent, EventLog};
pub use field::{ArenaLayout, CollisionField};
pub use launch::{LaunchEntry, LaunchRegistry};
pub use session::{CombatSession, StepInput};
pub use tags::{ActorId, TagRegistry};
pub use verbs::{VerbKind, VerbStatus};
pub use world::{FlatTerrain, InputSnapshot, PlayerBody, TerrainQuery};
