//! Per-actor base statistics.

use crate::error::{ValidationError, non_negative, positive, unit_range};

/// Stamina pool parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaminaParams {
    pub max: f32,
    /// Points regenerated per second once the delay has elapsed.
    pub regen_rate: f32,
    /// Seconds after the last consumption before regeneration starts.
    pub regen_delay: f32,
    /// Fraction of `max` that clears exhaustion once regenerated past.
    pub recovery_fraction: f32,
}

impl Default for StaminaParams {
    fn default() -> Self {
        Self {
            max: 100.0,
            regen_rate: 30.0,
            regen_delay: 0.8,
            recovery_fraction: 0.2,
        }
    }
}

/// Poise pool parameters. Poise accumulates upward toward a break.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoiseParams {
    pub max: f32,
    /// Points decayed per second once the delay has elapsed.
    pub regen_rate: f32,
    /// Seconds after the last hit before decay starts.
    pub regen_delay: f32,
}

impl Default for PoiseParams {
    fn default() -> Self {
        Self {
            max: 50.0,
            regen_rate: 15.0,
            regen_delay: 2.0,
        }
    }
}

/// Base statistics of a combatant. Immutable for the actor's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorStats {
    pub max_health: f32,
    pub stamina: StaminaParams,
    pub poise: PoiseParams,
    /// Stamina consumed per second while sprinting.
    pub sprint_drain: f32,
}

impl ActorStats {
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_stamina(mut self, stamina: StaminaParams) -> Self {
        self.stamina = stamina;
        self
    }

    pub fn with_poise(mut self, poise: PoiseParams) -> Self {
        self.poise = poise;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("stats.max_health", self.max_health)?;
        positive("stats.stamina.max", self.stamina.max)?;
        non_negative("stats.stamina.regen_rate", self.stamina.regen_rate)?;
        non_negative("stats.stamina.regen_delay", self.stamina.regen_delay)?;
        unit_range("stats.stamina.recovery_fraction", self.stamina.recovery_fraction)?;
        positive("stats.poise.max", self.poise.max)?;
        non_negative("stats.poise.regen_rate", self.poise.regen_rate)?;
        non_negative("stats.poise.regen_delay", self.poise.regen_delay)?;
        non_negative("stats.sprint_drain", self.sprint_drain)
    }
}

impl Default for ActorStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            stamina: StaminaParams::default(),
            poise: PoiseParams::default(),
            sprint_drain: 12.0,
        }
    }
}
