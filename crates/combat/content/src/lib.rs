//! Data-driven combat content.
//!
//! Turns RON/TOML data files into `combat-core` value types:
//! - Combat configuration (TOML): input buffering, hitstop, friendly fire
//! - Archetypes (RON): faction, base stats and moveset of a combatant
//!
//! Every loaded table is validated before it is handed out. The core never
//! re-checks timing fractions or window nesting at runtime, so this crate is
//! the gate that keeps malformed tables out of a running simulation.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{Archetype, ArchetypeLoader, ConfigLoader, ContentFactory, LoadResult};
