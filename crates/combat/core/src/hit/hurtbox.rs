use crate::types::{ActorId, HurtboxId};

/// Defender-owned collision volume.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hurtbox {
    pub id: HurtboxId,
    pub owner: ActorId,
    /// Local damage multiplier (e.g. 1.5 for a head, 0.5 for a shield arm).
    pub multiplier: f32,
    enabled: bool,
}

impl Hurtbox {
    pub fn new(id: HurtboxId, owner: ActorId, multiplier: f32) -> Self {
        Self {
            id,
            owner,
            multiplier,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
