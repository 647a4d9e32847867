use glam::Vec3;

use crate::events::AnimationTrigger;
use crate::fsm::{StateContext, Transition};
use crate::types::DodgeData;

/// Committed roll with an invulnerability sub-range.
///
/// Displacement is applied as a position correction, never as a velocity:
/// each tick pushes `distance * (curve(t) - curve(t_prev)) * direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dodge {
    data: DodgeData,
    direction: Vec3,
    distance: f32,
    elapsed: f32,
}

impl Dodge {
    pub fn enter(direction: Option<Vec3>, ctx: &mut StateContext<'_>) -> Self {
        let data = ctx.moveset.dodge;
        let chosen = direction
            .and_then(Vec3::try_normalize)
            .or_else(|| ctx.held.direction());

        let (direction, distance, backstep) = match chosen {
            Some(direction) => (direction, data.distance, false),
            None => {
                let back = (-ctx.forward).try_normalize().unwrap_or(Vec3::Z);
                (back, data.backstep_distance, true)
            }
        };
        ctx.animate(AnimationTrigger::Dodge { direction, backstep });
        Self {
            data,
            direction,
            distance,
            elapsed: 0.0,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Normalized time, clamped to 1.
    pub fn t(&self) -> f32 {
        if self.data.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.data.duration).min(1.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.data.invulnerable_at(self.t())
    }

    pub fn is_recovering(&self) -> bool {
        self.t() >= self.data.recovery_start
    }

    pub fn is_finished(&self) -> bool {
        self.t() >= 1.0
    }

    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        let previous = self.t();
        self.elapsed += dt;
        let progress = self.data.curve.delta(previous, self.t());
        ctx.displace(self.direction * self.distance * progress);
        self.is_finished().then_some(Transition::Idle)
    }
}
