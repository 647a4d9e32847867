use glam::Vec3;

/// Discrete combat intent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatAction {
    LightAttack,
    HeavyAttack,
    Dodge,
    Parry,
    Block,
    /// Consumed by the targeting layer, never by the action state machine.
    LockOn,
}

/// One buffered intent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferedInput {
    pub action: CombatAction,
    /// Movement direction held when the input was issued, if any.
    pub direction: Option<Vec3>,
    /// Sampling-clock time the input was issued at, in seconds.
    pub timestamp: f64,
    pub consumed: bool,
}

impl BufferedInput {
    /// Validity predicate: `now - timestamp <= window && !consumed`.
    pub fn is_valid(&self, now: f64, window: f32) -> bool {
        !self.consumed && now - self.timestamp <= window as f64
    }
}
