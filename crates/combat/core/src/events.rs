//! Notifications emitted to presentation layers.
//!
//! [`ActorEvent`]s are emitted by an actor's own [`Observers`] list,
//! [`CombatEvent`]s by the coordinator's. Both are delivered synchronously
//! during the tick that produced them.
//!
//! [`Observers`]: crate::observer::Observers

use glam::Vec3;
use smol_str::SmolStr;

use crate::fsm::{Gait, StateKind};
use crate::types::{ActorId, DamageResult, Faction, StaggerTier};

/// Fire-and-forget animation request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationTrigger {
    Idle,
    Locomotion(Gait),
    LightAttack { index: usize, name: SmolStr },
    HeavyCharge { name: SmolStr },
    /// `charge` is the charge fraction in `[0, 1]` the swing was released at.
    HeavyAttack { name: SmolStr, charge: f32 },
    Parry,
    Block,
    Dodge { direction: Vec3, backstep: bool },
    Stagger(StaggerTier),
    Death,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorEvent {
    StateChanged {
        actor: ActorId,
        from: StateKind,
        to: StateKind,
    },
    Animation {
        actor: ActorId,
        trigger: AnimationTrigger,
    },
    /// A hitbox activation closed after connecting with `hits` targets.
    AttackLanded {
        actor: ActorId,
        attack: SmolStr,
        hits: usize,
    },
    /// A light combo follow-up was accepted and will start next tick.
    ComboQueued { actor: ActorId, index: usize },
    Damaged {
        actor: ActorId,
        result: DamageResult,
    },
    /// A blocked hit emptied the stamina pool.
    GuardBroken { actor: ActorId },
    Died { actor: ActorId },
    Respawned { actor: ActorId },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    Registered {
        actor: ActorId,
        faction: Faction,
    },
    Unregistered {
        actor: ActorId,
    },
    DamageDealt {
        attacker: Option<ActorId>,
        target: ActorId,
        result: DamageResult,
    },
    ParryOccurred {
        defender: ActorId,
        attacker: Option<ActorId>,
        perfect: bool,
    },
    PoiseBreak {
        actor: ActorId,
    },
    GuardBreak {
        actor: ActorId,
    },
    Death {
        actor: ActorId,
        killer: Option<ActorId>,
    },
    /// Hitstop was requested; `until` is the real-clock end of the pulse
    /// after merging with any pulse already running.
    Hitstop {
        duration: f32,
        until: f64,
    },
}
