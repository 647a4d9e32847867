use glam::Vec3;

use crate::input::HeldInput;
use crate::types::{Moveset, StaggerTier};

/// Discriminant of [`ActionState`](super::ActionState), used by the
/// transition table, logs and events.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StateKind {
    Idle,
    Walk,
    Run,
    Sprint,
    LightAttack,
    HeavyAttack,
    Parry,
    Block,
    Dodge,
    Stagger,
    Death,
}

impl StateKind {
    pub const fn is_locomotion(&self) -> bool {
        matches!(self, Self::Walk | Self::Run | Self::Sprint)
    }

    pub const fn is_attack(&self) -> bool {
        matches!(self, Self::LightAttack | Self::HeavyAttack)
    }

    /// Idle or any locomotion gait.
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Idle) || self.is_locomotion()
    }

    /// States every living actor can be forced into.
    pub const fn is_forced(&self) -> bool {
        matches!(self, Self::Stagger | Self::Death)
    }
}

/// Locomotion variant.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Gait {
    Walk,
    #[default]
    Run,
    Sprint,
}

impl Gait {
    pub const fn kind(&self) -> StateKind {
        match self {
            Gait::Walk => StateKind::Walk,
            Gait::Run => StateKind::Run,
            Gait::Sprint => StateKind::Sprint,
        }
    }

    /// Gait selected by held modifiers. Sprint needs a non-exhausted pool.
    pub fn from_held(held: &HeldInput, exhausted: bool) -> Self {
        if held.walk {
            Gait::Walk
        } else if held.sprint && !exhausted {
            Gait::Sprint
        } else {
            Gait::Run
        }
    }
}

/// A requested state change, carrying whatever the target state needs on
/// entry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Idle,
    Locomotion(Gait),
    /// Starts the light combo from its first swing.
    LightAttack,
    HeavyAttack,
    Parry,
    Block,
    Dodge {
        /// Explicit direction; falls back to held movement, then a backstep.
        direction: Option<Vec3>,
    },
    Stagger {
        tier: StaggerTier,
        /// Overrides the tier's duration.
        duration: Option<f32>,
        /// Knockback direction; zero for none.
        direction: Vec3,
    },
    Death,
}

impl Transition {
    pub fn stagger(tier: StaggerTier, direction: Vec3) -> Self {
        Transition::Stagger {
            tier,
            duration: None,
            direction,
        }
    }

    pub const fn kind(&self) -> StateKind {
        match self {
            Transition::Idle => StateKind::Idle,
            Transition::Locomotion(gait) => gait.kind(),
            Transition::LightAttack => StateKind::LightAttack,
            Transition::HeavyAttack => StateKind::HeavyAttack,
            Transition::Parry => StateKind::Parry,
            Transition::Block => StateKind::Block,
            Transition::Dodge { .. } => StateKind::Dodge,
            Transition::Stagger { .. } => StateKind::Stagger,
            Transition::Death => StateKind::Death,
        }
    }

    /// Stamina charged when the transition commits.
    pub fn stamina_cost(&self, moveset: &Moveset) -> f32 {
        match self {
            Transition::LightAttack => moveset.light(0).map_or(0.0, |attack| attack.stamina_cost),
            Transition::HeavyAttack => moveset.heavy.attack.stamina_cost,
            Transition::Parry => moveset.parry.stamina_cost,
            Transition::Dodge { .. } => moveset.dodge.stamina_cost,
            _ => 0.0,
        }
    }

    /// Idle, locomotion or guard, whichever the held input asks for. An
    /// exhausted actor cannot raise a guard.
    pub fn neutral(held: &HeldInput, exhausted: bool) -> Self {
        if held.block && !exhausted {
            Transition::Block
        } else if held.is_moving() {
            Transition::Locomotion(Gait::from_held(held, exhausted))
        } else {
            Transition::Idle
        }
    }
}
