//! Real-time combat resolution for action games.
//!
//! `combat-core` decides what an actor may do next, detects when an attack
//! connects, and resolves the numeric outcome (damage, stagger, parry,
//! death) under frame-level timing and stamina/poise constraints. It has no
//! I/O and no threads: an external driver calls the sampling tick and the
//! simulation tick, and [`CombatWorld`] is the reference driver.
pub mod actor;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod fsm;
pub mod hit;
pub mod input;
pub mod observer;
pub mod resources;
pub mod types;
pub mod world;

pub use actor::{Actor, ActorTally, Actors};
pub use config::{CombatConfig, HitstopConfig, InputConfig};
pub use coordinator::{Clock, CombatCoordinator, Hitstop};
pub use error::{CombatError, ErrorSeverity, ValidationError};
pub use events::{ActorEvent, AnimationTrigger, CombatEvent};
pub use fsm::{
    ActionState, DeflectChain, Gait, GuardTiming, StateContext, StateKind, StateMachine,
    Transition,
};
pub use hit::{Hitbox, Hurtbox, OverlapOutcome};
pub use input::{
    AttackPressTracker, BufferedInput, CombatAction, HeldInput, InputBuffer, InputSampler,
    InputSnapshot,
};
pub use observer::{Observers, SubscriptionId};
pub use resources::{Poise, PoiseEvent, Stamina, StaminaEvent};
pub use types::{
    ActorId, ActorStats, AttackData, AttackPhase, BlockData, ChargeData, Curve, DamageFlags,
    DamageInfo, DamageKind, DamageResult, DodgeData, Faction, HeavyAttackData, HitOutcome,
    HitboxId, HurtboxId, Moveset, ParryData, PoiseParams, StaggerData, StaggerTier,
    StaminaParams,
};
pub use world::{ActorSpec, CombatWorld, StepReport};
