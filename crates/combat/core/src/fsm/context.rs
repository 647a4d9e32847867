use glam::Vec3;

use super::DeflectChain;
use crate::events::{ActorEvent, AnimationTrigger};
use crate::hit::Hitbox;
use crate::input::{HeldInput, InputBuffer};
use crate::observer::Observers;
use crate::resources::{Poise, Stamina};
use crate::types::{ActorId, Moveset};

/// Everything a state may read or mutate while it runs.
///
/// Built by the owning actor for the duration of one call by splitting its
/// fields, so a state never holds onto actor data between ticks.
pub struct StateContext<'a> {
    pub actor: ActorId,
    pub moveset: &'a Moveset,
    pub held: &'a HeldInput,
    /// Facing direction reported by physics.
    pub forward: Vec3,
    /// Stamina drained per second while sprinting.
    pub sprint_drain: f32,
    pub stamina: &'a mut Stamina,
    pub poise: &'a mut Poise,
    pub buffer: &'a mut InputBuffer,
    pub hitbox: &'a mut Hitbox,
    pub chain: &'a mut DeflectChain,
    pub events: &'a mut Observers<ActorEvent>,
    /// Position correction accumulated for physics to apply.
    pub motion: &'a mut Vec3,
    pub(crate) swings: &'a mut u32,
}

impl StateContext<'_> {
    pub fn animate(&mut self, trigger: AnimationTrigger) {
        let actor = self.actor;
        self.events.emit(&ActorEvent::Animation { actor, trigger });
    }

    pub fn displace(&mut self, delta: Vec3) {
        *self.motion += delta;
    }

    /// Identity of a new swing. Each swing gets a fresh hitbox activation.
    pub fn next_swing(&mut self) -> u32 {
        *self.swings = self.swings.wrapping_add(1);
        *self.swings
    }

    /// Closes the hitbox activation, if any, and reports the hits it landed.
    pub fn disarm_hitbox(&mut self) {
        if !self.hitbox.is_active() {
            return;
        }
        let attack = self
            .hitbox
            .attack()
            .map(|attack| attack.name.clone())
            .unwrap_or_default();
        let hits = self.hitbox.deactivate();
        if hits > 0 {
            let actor = self.actor;
            self.events.emit(&ActorEvent::AttackLanded { actor, attack, hits });
        }
    }
}
