//! Combatant archetype loader.

use std::path::Path;

use combat_core::{
    ActorSpec, ActorStats, CombatConfig, Faction, Moveset, ValidationError,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, invalid, read_file};

/// Everything a data file says about one kind of combatant.
///
/// ```ron
/// (
///     name: "fighter",
///     faction: Enemy,
///     stats: (max_health: 120.0),
///     moveset: (light_combo: [(name: "jab", damage: 12.0, duration: 0.5)]),
/// )
/// ```
///
/// Omitted fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub name: String,
    pub faction: Faction,
    pub stats: ActorStats,
    pub moveset: Moveset,
    pub weapon_multiplier: f32,
    /// Hurtbox damage multipliers. Empty means a single body hurtbox.
    pub hurtboxes: Vec<f32>,
}

impl Archetype {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.stats.validate()?;
        self.moveset.validate()?;
        if self.weapon_multiplier < 0.0 {
            return Err(ValidationError::Negative {
                field: "weapon_multiplier",
                value: self.weapon_multiplier,
            });
        }
        for multiplier in &self.hurtboxes {
            if *multiplier < 0.0 {
                return Err(ValidationError::Negative {
                    field: "hurtboxes",
                    value: *multiplier,
                });
            }
        }
        Ok(())
    }

    /// Spawn description for this archetype, overriding its faction.
    pub fn spec(&self, faction: Faction) -> ActorSpec {
        let spec = ActorSpec::new(faction)
            .with_stats(self.stats)
            .with_moveset(self.moveset.clone())
            .with_weapon_multiplier(self.weapon_multiplier);
        self.hurtboxes
            .iter()
            .fold(spec, |spec, multiplier| spec.with_hurtbox(*multiplier))
    }
}

impl Default for Archetype {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            faction: Faction::default(),
            stats: ActorStats::default(),
            moveset: Moveset::default(),
            weapon_multiplier: 1.0,
            hurtboxes: Vec::new(),
        }
    }
}

/// Loader for archetypes from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    /// Load and validate one archetype from a RON file.
    pub fn load(path: &Path) -> LoadResult<Archetype> {
        let content = read_file(path)?;
        let archetype = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype RON {}: {}", path.display(), e))?;
        archetype.validate().map_err(|e| invalid(path, e))?;
        anyhow::ensure!(
            archetype.hurtboxes.len() <= CombatConfig::MAX_HURTBOXES,
            "Archetype {} in {} declares {} hurtboxes (max {})",
            archetype.name,
            path.display(),
            archetype.hurtboxes.len(),
            CombatConfig::MAX_HURTBOXES
        );

        tracing::debug!(
            path = %path.display(),
            archetype = %archetype.name,
            combo = archetype.moveset.light_combo.len(),
            "archetype loaded"
        );
        Ok(archetype)
    }

    /// Parses RON text without validating it.
    pub fn parse(content: &str) -> Result<Archetype, ron::error::SpannedError> {
        ron::from_str(content)
    }
}
