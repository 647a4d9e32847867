//! Immutable value types shared by every combat subsystem.
//!
//! Tables (`AttackData`, `ActorStats`, `Moveset`) are produced by configuration
//! and consumed read-only. Requests and responses (`DamageInfo`,
//! `DamageResult`) are ephemeral and live for a single resolution.

mod attack;
mod curve;
mod damage;
mod faction;
mod ids;
mod moveset;
mod stats;

pub use attack::{AttackData, AttackPhase};
pub use curve::Curve;
pub use damage::{DamageFlags, DamageInfo, DamageKind, DamageResult, HitOutcome};
pub use faction::Faction;
pub use ids::{ActorId, HitboxId, HurtboxId};
pub use moveset::{
    BlockData, ChargeData, DodgeData, HeavyAttackData, Moveset, ParryData, StaggerData,
    StaggerTier,
};
pub use stats::{ActorStats, PoiseParams, StaminaParams};
