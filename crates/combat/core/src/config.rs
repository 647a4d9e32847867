use crate::error::ValidationError;
use crate::types::StaggerTier;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub input: InputConfig,
    pub hitstop: HitstopConfig,
    /// Allows hits between distinct actors of the same faction.
    /// Self-hits are never allowed.
    pub friendly_fire: bool,
    /// Stagger applied to an attacker whose swing was perfectly parried.
    pub parry_stagger: StaggerTier,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard upper bound for the per-actor input buffer.
    pub const MAX_BUFFERED_INPUTS: usize = 16;
    /// Maximum number of swings in a light-attack combo chain.
    pub const MAX_COMBO_LENGTH: usize = 8;
    /// Maximum number of hurtboxes attached to one actor.
    pub const MAX_HURTBOXES: usize = 8;
    /// Maximum number of distinct targets one hitbox activation can hit.
    pub const MAX_HITS_PER_ACTIVATION: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BUFFER_WINDOW: f32 = 0.15;
    pub const DEFAULT_BUFFER_CAPACITY: usize = 5;
    pub const DEFAULT_HEAVY_HOLD_THRESHOLD: f32 = 0.2;

    pub fn new() -> Self {
        Self {
            input: InputConfig::default(),
            hitstop: HitstopConfig::default(),
            friendly_fire: false,
            parry_stagger: StaggerTier::Heavy,
        }
    }

    pub fn with_buffer_window(mut self, seconds: f32) -> Self {
        self.input.buffer_window = seconds;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.input.buffer_capacity = capacity;
        self
    }

    pub fn with_friendly_fire(mut self, enabled: bool) -> Self {
        self.friendly_fire = enabled;
        self
    }

    pub fn with_hitstop(mut self, hitstop: HitstopConfig) -> Self {
        self.hitstop = hitstop;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.input.validate()?;
        self.hitstop.validate()
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Input buffering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// How long a buffered intent stays consumable, in seconds.
    pub buffer_window: f32,
    /// Entries retained before the oldest is evicted.
    pub buffer_capacity: usize,
    /// Hold duration separating a light attack from a heavy one.
    pub heavy_hold_threshold: f32,
}

impl InputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.buffer_window <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "input.buffer_window",
                value: self.buffer_window,
            });
        }
        if self.buffer_capacity == 0 || self.buffer_capacity > CombatConfig::MAX_BUFFERED_INPUTS {
            return Err(ValidationError::BufferCapacity {
                capacity: self.buffer_capacity,
                max: CombatConfig::MAX_BUFFERED_INPUTS,
            });
        }
        if self.heavy_hold_threshold <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "input.heavy_hold_threshold",
                value: self.heavy_hold_threshold,
            });
        }
        Ok(())
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            buffer_window: CombatConfig::DEFAULT_BUFFER_WINDOW,
            buffer_capacity: CombatConfig::DEFAULT_BUFFER_CAPACITY,
            heavy_hold_threshold: CombatConfig::DEFAULT_HEAVY_HOLD_THRESHOLD,
        }
    }
}

/// Hit-feedback time dilation parameters.
///
/// ```text
/// duration = min(base + final_damage * damage_scale, max)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitstopConfig {
    pub base: f32,
    pub damage_scale: f32,
    pub max: f32,
    /// Fixed pulse used for perfect parries, which deal no damage.
    pub perfect_parry: f32,
}

impl HitstopConfig {
    /// Disables hitstop entirely.
    pub const NONE: Self = Self {
        base: 0.0,
        damage_scale: 0.0,
        max: 0.0,
        perfect_parry: 0.0,
    };

    pub fn duration_for(&self, final_damage: f32) -> f32 {
        (self.base + final_damage.max(0.0) * self.damage_scale).min(self.max)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("hitstop.base", self.base),
            ("hitstop.damage_scale", self.damage_scale),
            ("hitstop.max", self.max),
            ("hitstop.perfect_parry", self.perfect_parry),
        ] {
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }
        Ok(())
    }
}

impl Default for HitstopConfig {
    fn default() -> Self {
        Self {
            base: 0.04,
            damage_scale: 0.002,
            max: 0.2,
            perfect_parry: 0.12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CombatConfig::default().validate().is_ok());
        assert_eq!(CombatConfig::default().input.buffer_window, 0.15);
        assert_eq!(CombatConfig::default().input.buffer_capacity, 5);
    }

    #[test]
    fn capacity_above_hard_limit_is_rejected() {
        let config = CombatConfig::new().with_buffer_capacity(CombatConfig::MAX_BUFFERED_INPUTS + 1);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::BufferCapacity { .. })
        ));
    }

    #[test]
    fn hitstop_scales_with_damage_and_caps() {
        let hitstop = HitstopConfig::default();
        assert!((hitstop.duration_for(0.0) - 0.04).abs() < 1e-6);
        assert!((hitstop.duration_for(50.0) - 0.14).abs() < 1e-6);
        assert_eq!(hitstop.duration_for(10_000.0), 0.2);
    }
}
