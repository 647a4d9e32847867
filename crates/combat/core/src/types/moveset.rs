//! Per-actor action tables: light combo chain, heavy attack, defensive
//! timings, dodge and stagger parameters.

use arrayvec::ArrayVec;

use super::{AttackData, Curve};
use crate::config::CombatConfig;
use crate::error::{ValidationError, non_negative, positive, unit_range};

/// Stagger severity tier. Ordered from mildest to most severe.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StaggerTier {
    Light,
    #[default]
    Medium,
    Heavy,
    Knockdown,
}

impl StaggerTier {
    /// Heavy and Knockdown staggers clear a broken poise on entry.
    pub fn resets_poise(&self) -> bool {
        *self >= StaggerTier::Heavy
    }
}

/// Charge sub-phase of a heavy attack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChargeData {
    /// Seconds of holding required for a full charge.
    pub max_charge_time: f32,
    pub max_damage_multiplier: f32,
    pub max_poise_multiplier: f32,
}

impl ChargeData {
    /// Damage and poise multipliers for a charge fraction in `[0, 1]`.
    pub fn multipliers(&self, fraction: f32) -> (f32, f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        (
            1.0 + (self.max_damage_multiplier - 1.0) * fraction,
            1.0 + (self.max_poise_multiplier - 1.0) * fraction,
        )
    }
}

impl Default for ChargeData {
    fn default() -> Self {
        Self {
            max_charge_time: 1.0,
            max_damage_multiplier: 1.8,
            max_poise_multiplier: 1.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeavyAttackData {
    pub attack: AttackData,
    /// `None` disables charging: the swing starts immediately.
    pub charge: Option<ChargeData>,
}

impl Default for HeavyAttackData {
    fn default() -> Self {
        Self {
            attack: AttackData::new("heavy_slash", 40.0, 35.0, 1.4)
                .with_windows(0.35, 0.55, 0.85)
                .with_stamina_cost(30.0)
                .with_stagger(StaggerTier::Heavy),
            charge: Some(ChargeData::default()),
        }
    }
}

/// Standalone parry action.
///
/// Both sub-windows start at the beginning of the action; the perfect window
/// is nested inside the parryable one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParryData {
    pub perfect_window: f32,
    pub parry_window: f32,
    /// Total length of the parry action including its trailing recovery.
    pub duration: f32,
    pub stamina_cost: f32,
    /// Damage multiplier applied by a partial parry, before chain bonuses.
    pub partial_damage_factor: f32,
    /// Poise multiplier applied by a partial parry.
    pub partial_poise_factor: f32,
    /// Seconds after a successful parry during which the next one chains.
    pub chain_window: f32,
    pub max_chain: u8,
    /// Partial damage factor reduction per chained deflect.
    pub chain_bonus: f32,
    /// Seconds after a perfect parry during which attacks cancel freely.
    pub riposte_window: f32,
}

impl ParryData {
    /// Partial damage factor after `chain` consecutive deflects.
    pub fn partial_factor(&self, chain: u8) -> f32 {
        (self.partial_damage_factor - self.chain_bonus * chain as f32).max(0.05)
    }
}

impl Default for ParryData {
    fn default() -> Self {
        Self {
            perfect_window: 0.08,
            parry_window: 0.15,
            duration: 0.5,
            stamina_cost: 10.0,
            partial_damage_factor: 0.5,
            partial_poise_factor: 0.5,
            chain_window: 1.0,
            max_chain: 3,
            chain_bonus: 0.1,
            riposte_window: 0.6,
        }
    }
}

/// Held guard. Opens with the same two sub-windows as a parry, then settles
/// into a passive, stamina-draining block.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlockData {
    pub perfect_window: f32,
    pub parry_window: f32,
    pub partial_damage_factor: f32,
    pub partial_poise_factor: f32,
    /// Fraction of damage removed by a passive block.
    pub damage_reduction: f32,
    /// Fraction of poise damage that still lands through a passive block.
    pub poise_factor: f32,
    /// Stamina consumed per point of incoming (pre-reduction) damage.
    pub stamina_per_damage: f32,
    /// Stamina consumed per second while the passive guard is held.
    pub drain_per_second: f32,
    /// Cosine of the half-angle in front of the defender that the guard covers.
    pub guard_arc_cos: f32,
}

impl Default for BlockData {
    fn default() -> Self {
        Self {
            perfect_window: 0.08,
            parry_window: 0.15,
            partial_damage_factor: 0.5,
            partial_poise_factor: 0.5,
            damage_reduction: 0.8,
            poise_factor: 0.25,
            stamina_per_damage: 1.0,
            drain_per_second: 2.0,
            guard_arc_cos: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DodgeData {
    pub duration: f32,
    pub distance: f32,
    /// Distance of the default backstep when no direction is held.
    pub backstep_distance: f32,
    pub iframe_start: f32,
    pub iframe_end: f32,
    pub recovery_start: f32,
    pub stamina_cost: f32,
    pub curve: Curve,
}

impl DodgeData {
    pub fn invulnerable_at(&self, t: f32) -> bool {
        (self.iframe_start..=self.iframe_end).contains(&t)
    }
}

impl Default for DodgeData {
    fn default() -> Self {
        Self {
            duration: 0.6,
            distance: 4.0,
            backstep_distance: 2.0,
            iframe_start: 0.1,
            iframe_end: 0.45,
            recovery_start: 0.7,
            stamina_cost: 20.0,
            curve: Curve::EaseOutQuad,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaggerData {
    /// Durations indexed by tier: light, medium, heavy, knockdown.
    pub durations: [f32; 4],
    /// Knockback distances indexed by tier.
    pub knockback: [f32; 4],
    /// Normalized time after which the trailing recovery window opens.
    pub recovery_start: f32,
    /// Whether a dodge may cancel the trailing recovery window.
    pub allow_dodge_cancel: bool,
    pub curve: Curve,
}

impl StaggerData {
    pub fn duration(&self, tier: StaggerTier) -> f32 {
        self.durations[tier as usize]
    }

    pub fn knockback(&self, tier: StaggerTier) -> f32 {
        self.knockback[tier as usize]
    }
}

impl Default for StaggerData {
    fn default() -> Self {
        Self {
            durations: [0.3, 0.6, 1.0, 2.0],
            knockback: [0.3, 0.8, 1.5, 3.0],
            recovery_start: 0.75,
            allow_dodge_cancel: true,
            curve: Curve::EaseOutCubic,
        }
    }
}

/// Complete action table of one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Moveset {
    pub light_combo: ArrayVec<AttackData, { CombatConfig::MAX_COMBO_LENGTH }>,
    pub heavy: HeavyAttackData,
    pub parry: ParryData,
    pub block: BlockData,
    pub dodge: DodgeData,
    pub stagger: StaggerData,
}

impl Moveset {
    /// Swing at `index` of the light combo, if it exists.
    pub fn light(&self, index: usize) -> Option<&AttackData> {
        self.light_combo.get(index)
    }

    /// Index of the final swing of the light combo.
    pub fn max_combo_index(&self) -> usize {
        self.light_combo.len().saturating_sub(1)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.light_combo.is_empty() {
            return Err(ValidationError::ComboLength {
                len: 0,
                max: CombatConfig::MAX_COMBO_LENGTH,
            });
        }
        for attack in &self.light_combo {
            attack.validate()?;
        }
        self.heavy.attack.validate()?;
        if let Some(charge) = &self.heavy.charge {
            positive("heavy.charge.max_charge_time", charge.max_charge_time)?;
            non_negative("heavy.charge.max_damage_multiplier", charge.max_damage_multiplier)?;
            non_negative("heavy.charge.max_poise_multiplier", charge.max_poise_multiplier)?;
        }

        let parry = &self.parry;
        nested("parry.perfect_window", parry.perfect_window, "parry.parry_window", parry.parry_window)?;
        nested("parry.parry_window", parry.parry_window, "parry.duration", parry.duration)?;
        partial_factor("parry.partial_damage_factor", parry.partial_damage_factor)?;
        unit_range("parry.partial_poise_factor", parry.partial_poise_factor)?;
        non_negative("parry.stamina_cost", parry.stamina_cost)?;
        non_negative("parry.chain_window", parry.chain_window)?;

        let block = &self.block;
        nested("block.perfect_window", block.perfect_window, "block.parry_window", block.parry_window)?;
        partial_factor("block.partial_damage_factor", block.partial_damage_factor)?;
        unit_range("block.damage_reduction", block.damage_reduction)?;
        unit_range("block.poise_factor", block.poise_factor)?;

        let dodge = &self.dodge;
        positive("dodge.duration", dodge.duration)?;
        unit_range("dodge.iframe_start", dodge.iframe_start)?;
        unit_range("dodge.iframe_end", dodge.iframe_end)?;
        nested("dodge.iframe_start", dodge.iframe_start, "dodge.iframe_end", dodge.iframe_end)?;
        unit_range("dodge.recovery_start", dodge.recovery_start)?;

        for duration in self.stagger.durations {
            positive("stagger.durations", duration)?;
        }
        unit_range("stagger.recovery_start", self.stagger.recovery_start)
    }
}

impl Default for Moveset {
    fn default() -> Self {
        let mut light_combo = ArrayVec::new();
        light_combo.push(
            AttackData::new("light_1", 18.0, 12.0, 0.6)
                .with_windows(0.25, 0.5, 0.8)
                .with_stamina_cost(15.0)
                .with_stagger(StaggerTier::Light),
        );
        light_combo.push(
            AttackData::new("light_2", 20.0, 14.0, 0.6)
                .with_windows(0.25, 0.5, 0.8)
                .with_stamina_cost(15.0)
                .with_stagger(StaggerTier::Light),
        );
        light_combo.push(
            AttackData::new("light_3", 26.0, 20.0, 0.8)
                .with_windows(0.3, 0.55, 0.85)
                .with_stamina_cost(20.0)
                .with_stagger(StaggerTier::Medium),
        );

        Self {
            light_combo,
            heavy: HeavyAttackData::default(),
            parry: ParryData::default(),
            block: BlockData::default(),
            dodge: DodgeData::default(),
            stagger: StaggerData::default(),
        }
    }
}

fn nested(
    inner: &'static str,
    inner_end: f32,
    outer: &'static str,
    outer_end: f32,
) -> Result<(), ValidationError> {
    if inner_end >= 0.0 && inner_end <= outer_end {
        Ok(())
    } else {
        Err(ValidationError::WindowNotNested {
            inner,
            inner_end,
            outer,
            outer_end,
        })
    }
}

/// A partial parry must reduce damage without negating it.
fn partial_factor(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfUnitRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_moveset_validates() {
        assert!(Moveset::default().validate().is_ok());
    }

    #[test]
    fn perfect_window_must_nest_inside_parry_window() {
        let mut moveset = Moveset::default();
        moveset.block.perfect_window = 0.2;
        assert!(matches!(
            moveset.validate(),
            Err(ValidationError::WindowNotNested { .. })
        ));
    }

    #[test]
    fn stagger_tiers_order_by_severity() {
        assert!(StaggerTier::Knockdown > StaggerTier::Heavy);
        assert!(StaggerTier::Heavy.resets_poise());
        assert!(!StaggerTier::Medium.resets_poise());
        let stagger = StaggerData::default();
        assert_eq!(stagger.duration(StaggerTier::Light), 0.3);
        assert_eq!(stagger.knockback(StaggerTier::Knockdown), 3.0);
    }

    #[test]
    fn charge_multipliers_interpolate() {
        let charge = ChargeData::default();
        assert_eq!(charge.multipliers(0.0), (1.0, 1.0));
        let (damage, poise) = charge.multipliers(1.0);
        assert!((damage - 1.8).abs() < 1e-6);
        assert!((poise - 1.5).abs() < 1e-6);
        assert_eq!(charge.multipliers(3.0), charge.multipliers(1.0));
    }

    #[test]
    fn chained_deflects_shrink_partial_factor() {
        let parry = ParryData::default();
        assert!(parry.partial_factor(2) < parry.partial_factor(0));
        assert!(parry.partial_factor(100) > 0.0);
    }
}
