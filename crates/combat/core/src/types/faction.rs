/// Actor faction (allegiance).
///
/// Two actors are hostile iff they are distinct and their factions differ;
/// the pairwise predicate lives on the coordinator, which knows identities.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// The player and their summons
    #[default]
    Player,
    /// Companions fighting alongside the player
    Ally,
    /// Regular enemies
    Enemy,
    /// Undead forces
    Undead,
    /// Wildlife (animals, beasts)
    Wildlife,
}

impl Faction {
    /// Whether members of `self` and `other` may damage each other at all.
    pub fn differs_from(&self, other: &Faction) -> bool {
        self != other
    }
}
