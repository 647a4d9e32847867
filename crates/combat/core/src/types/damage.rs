//! Damage requests and responses.

use bitflags::bitflags;
use glam::Vec3;

use super::{ActorId, StaggerTier};

/// Damage kind for mitigation rules.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageKind {
    /// Physical damage (weapons, fists, falling rocks).
    #[default]
    Physical,
    Fire,
    Frost,
    Lightning,
    Magic,
    /// Ignores block and parry entirely.
    True,
}

impl DamageKind {
    /// Whether a guard (block or parry) can interact with this damage at all.
    pub const fn is_guardable(&self) -> bool {
        !matches!(self, DamageKind::True)
    }
}

/// A request to damage one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageInfo {
    pub amount: f32,
    pub poise_damage: f32,
    pub kind: DamageKind,
    /// `None` for environmental damage.
    pub source: Option<ActorId>,
    /// World-space impact point.
    pub point: Vec3,
    /// Direction the hit travels (attacker → target), normalized or zero.
    pub direction: Vec3,
    pub parryable: bool,
    /// Stagger severity applied if this hit breaks poise.
    pub stagger: StaggerTier,
}

impl DamageInfo {
    pub fn new(amount: f32, poise_damage: f32, source: Option<ActorId>) -> Self {
        Self {
            amount,
            poise_damage,
            kind: DamageKind::Physical,
            source,
            point: Vec3::ZERO,
            direction: Vec3::ZERO,
            parryable: source.is_some(),
            stagger: StaggerTier::Medium,
        }
    }

    /// Sourceless damage (falls, hazards). Never parryable.
    pub fn environmental(amount: f32, kind: DamageKind, point: Vec3) -> Self {
        Self {
            kind,
            point,
            parryable: false,
            ..Self::new(amount, 0.0, None)
        }
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction.normalize_or_zero();
        self
    }

    pub fn with_point(mut self, point: Vec3) -> Self {
        self.point = point;
        self
    }

    pub fn with_kind(mut self, kind: DamageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parryable(mut self, parryable: bool) -> Self {
        self.parryable = parryable;
        self
    }

    pub fn with_stagger(mut self, stagger: StaggerTier) -> Self {
        self.stagger = stagger;
        self
    }
}

/// Which defensive interaction, if any, decided a resolution.
///
/// Exactly one outcome describes a resolution. [`HitOutcome::Ignored`] marks a
/// call that never reached resolution (stale target or attacker, dead target).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitOutcome {
    #[default]
    Normal,
    Parried,
    PartiallyParried,
    Blocked,
    Dodged,
    Ignored,
}

bitflags! {
    /// Consequences orthogonal to [`HitOutcome`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageFlags: u8 {
        const POISE_BREAK = 1 << 0;
        const DEATH       = 1 << 1;
        /// A blocked hit drained the last of the defender's stamina.
        const GUARD_BREAK = 1 << 2;
    }
}

/// Response to a [`DamageInfo`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub final_damage: f32,
    pub final_poise_damage: f32,
    pub outcome: HitOutcome,
    pub flags: DamageFlags,
}

impl DamageResult {
    /// Zero-effect result for calls that could not be resolved.
    pub const fn ignored() -> Self {
        Self {
            final_damage: 0.0,
            final_poise_damage: 0.0,
            outcome: HitOutcome::Ignored,
            flags: DamageFlags::empty(),
        }
    }

    pub const fn dodged() -> Self {
        Self {
            outcome: HitOutcome::Dodged,
            ..Self::ignored()
        }
    }

    pub fn is_parried(&self) -> bool {
        self.outcome == HitOutcome::Parried
    }

    pub fn is_partially_parried(&self) -> bool {
        self.outcome == HitOutcome::PartiallyParried
    }

    pub fn is_blocked(&self) -> bool {
        self.outcome == HitOutcome::Blocked
    }

    pub fn is_dodged(&self) -> bool {
        self.outcome == HitOutcome::Dodged
    }

    pub fn is_normal_hit(&self) -> bool {
        self.outcome == HitOutcome::Normal
    }

    pub fn is_ignored(&self) -> bool {
        self.outcome == HitOutcome::Ignored
    }

    pub fn caused_poise_break(&self) -> bool {
        self.flags.contains(DamageFlags::POISE_BREAK)
    }

    pub fn caused_death(&self) -> bool {
        self.flags.contains(DamageFlags::DEATH)
    }

    pub fn caused_guard_break(&self) -> bool {
        self.flags.contains(DamageFlags::GUARD_BREAK)
    }

    /// Whether the target was touched at all (anything but dodge or ignore).
    pub fn connected(&self) -> bool {
        !matches!(self.outcome, HitOutcome::Dodged | HitOutcome::Ignored)
    }
}
