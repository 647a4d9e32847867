//! Attack timing tables.
//!
//! All timing is expressed as normalized time `t = elapsed / duration`:
//!
//! ```text
//! 0 ──── startup_end ──── active_end ──── recovery_start ──── 1
//!   Startup          Active         FollowThrough       Recovery
//!   (no hitbox)      (hitbox on)    (combo accepted)    (cancels legal)
//! ```

use smol_str::SmolStr;

use super::{DamageKind, StaggerTier};
use crate::error::{ValidationError, non_negative};

/// Phase of an attack at a given normalized time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackPhase {
    Startup,
    Active,
    FollowThrough,
    Recovery,
    Finished,
}

/// Immutable description of one swing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackData {
    /// Animation name, also used in logs and animation triggers.
    pub name: SmolStr,
    pub damage: f32,
    pub poise_damage: f32,
    /// Total animation duration in seconds.
    pub duration: f32,
    pub startup_end: f32,
    pub active_end: f32,
    pub recovery_start: f32,
    pub parryable: bool,
    pub stamina_cost: f32,
    pub kind: DamageKind,
    /// Stagger severity inflicted when this swing breaks the target's poise.
    pub stagger: StaggerTier,
}

impl AttackData {
    pub fn new(name: impl Into<SmolStr>, damage: f32, poise_damage: f32, duration: f32) -> Self {
        Self {
            name: name.into(),
            damage,
            poise_damage,
            duration,
            ..Self::default()
        }
    }

    pub fn with_windows(mut self, startup_end: f32, active_end: f32, recovery_start: f32) -> Self {
        self.startup_end = startup_end;
        self.active_end = active_end;
        self.recovery_start = recovery_start;
        self
    }

    pub fn with_stamina_cost(mut self, cost: f32) -> Self {
        self.stamina_cost = cost;
        self
    }

    pub fn with_parryable(mut self, parryable: bool) -> Self {
        self.parryable = parryable;
        self
    }

    pub fn with_kind(mut self, kind: DamageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_stagger(mut self, stagger: StaggerTier) -> Self {
        self.stagger = stagger;
        self
    }

    /// Converts elapsed seconds into normalized time.
    pub fn normalized(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        elapsed / self.duration
    }

    pub fn phase_at(&self, t: f32) -> AttackPhase {
        if t < self.startup_end {
            AttackPhase::Startup
        } else if t < self.active_end {
            AttackPhase::Active
        } else if t < self.recovery_start {
            AttackPhase::FollowThrough
        } else if t < 1.0 {
            AttackPhase::Recovery
        } else {
            AttackPhase::Finished
        }
    }

    /// Hitbox is live in `[startup_end, active_end)`.
    pub fn hitbox_active_at(&self, t: f32) -> bool {
        self.phase_at(t) == AttackPhase::Active
    }

    /// Follow-up inputs are honored in `[active_end, recovery_start)`.
    pub fn accepts_combo_at(&self, t: f32) -> bool {
        self.phase_at(t) == AttackPhase::FollowThrough
    }

    /// Dodge, parry and attack-chain cancels are legal from `recovery_start` on.
    pub fn cancellable_at(&self, t: f32) -> bool {
        t >= self.recovery_start
    }

    /// Copy of this attack with damage and poise damage multiplied.
    pub fn scaled(&self, damage_multiplier: f32, poise_multiplier: f32) -> Self {
        Self {
            damage: self.damage * damage_multiplier,
            poise_damage: self.poise_damage * poise_multiplier,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration <= 0.0 {
            return Err(ValidationError::NonPositiveDuration {
                attack: self.name.clone(),
                duration: self.duration,
            });
        }
        let ordered = 0.0 <= self.startup_end
            && self.startup_end <= self.active_end
            && self.active_end <= self.recovery_start
            && self.recovery_start <= 1.0;
        if !ordered {
            return Err(ValidationError::UnorderedFractions {
                attack: self.name.clone(),
                startup: self.startup_end,
                active_end: self.active_end,
                recovery_start: self.recovery_start,
            });
        }
        let deals_damage = self.damage > 0.0 || self.poise_damage > 0.0;
        if deals_damage && self.active_end <= self.startup_end {
            return Err(ValidationError::EmptyActiveWindow {
                attack: self.name.clone(),
            });
        }
        non_negative("attack.damage", self.damage)?;
        non_negative("attack.poise_damage", self.poise_damage)?;
        non_negative("attack.stamina_cost", self.stamina_cost)
    }
}

impl Default for AttackData {
    fn default() -> Self {
        Self {
            name: SmolStr::new_static("attack"),
            damage: 0.0,
            poise_damage: 0.0,
            duration: 1.0,
            startup_end: 0.2,
            active_end: 0.5,
            recovery_start: 0.8,
            parryable: true,
            stamina_cost: 0.0,
            kind: DamageKind::Physical,
            stagger: StaggerTier::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swing() -> AttackData {
        AttackData::new("slash", 20.0, 10.0, 1.0).with_windows(0.2, 0.5, 0.8)
    }

    #[test]
    fn hitbox_is_live_only_inside_active_window() {
        let attack = swing();
        for t in [0.0, 0.1, 0.199] {
            assert!(!attack.hitbox_active_at(t), "t={t}");
        }
        for t in [0.2, 0.35, 0.499] {
            assert!(attack.hitbox_active_at(t), "t={t}");
        }
        for t in [0.5, 0.75, 0.9, 1.0] {
            assert!(!attack.hitbox_active_at(t), "t={t}");
        }
    }

    #[test]
    fn combo_window_is_between_active_end_and_recovery() {
        let attack = swing();
        assert!(!attack.accepts_combo_at(0.49));
        assert!(attack.accepts_combo_at(0.5));
        assert!(attack.accepts_combo_at(0.79));
        assert!(!attack.accepts_combo_at(0.8));
        assert!(attack.cancellable_at(0.8));
        assert!(!attack.cancellable_at(0.79));
    }

    #[test]
    fn validation_rejects_empty_active_window() {
        let attack = swing().with_windows(0.4, 0.4, 0.8);
        assert_eq!(
            attack.validate(),
            Err(ValidationError::EmptyActiveWindow {
                attack: "slash".into()
            })
        );
    }

    #[test]
    fn validation_rejects_unordered_fractions() {
        let attack = swing().with_windows(0.5, 0.3, 0.8);
        assert!(matches!(
            attack.validate(),
            Err(ValidationError::UnorderedFractions { .. })
        ));
        assert!(swing().validate().is_ok());
    }

    #[test]
    fn normalized_time_uses_duration() {
        let attack = AttackData::new("slow", 1.0, 1.0, 2.0);
        assert_eq!(attack.normalized(0.5), 0.25);
        assert_eq!(attack.phase_at(attack.normalized(2.0)), AttackPhase::Finished);
    }
}
