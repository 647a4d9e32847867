use glam::Vec3;

use crate::events::AnimationTrigger;
use crate::fsm::{StateContext, Transition};
use crate::types::{Curve, StaggerData, StaggerTier};

/// Forced hit reaction.
///
/// Heavy and Knockdown tiers reset poise on entry. Lighter tiers leave a
/// broken poise broken for the stagger's duration and reset it when the
/// stagger runs out, so the actor never leaves Stagger with a broken pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    tier: StaggerTier,
    duration: f32,
    elapsed: f32,
    knockback: Vec3,
    curve: Curve,
    recovery_start: f32,
    allow_dodge_cancel: bool,
}

impl Stagger {
    pub fn enter(
        tier: StaggerTier,
        duration: Option<f32>,
        direction: Vec3,
        ctx: &mut StateContext<'_>,
    ) -> Self {
        let data: StaggerData = ctx.moveset.stagger;
        if tier.resets_poise() {
            ctx.poise.reset();
        }
        ctx.animate(AnimationTrigger::Stagger(tier));
        Self {
            tier,
            duration: duration.unwrap_or_else(|| data.duration(tier)),
            elapsed: 0.0,
            knockback: direction.normalize_or_zero() * data.knockback(tier),
            curve: data.curve,
            recovery_start: data.recovery_start,
            allow_dodge_cancel: data.allow_dodge_cancel,
        }
    }

    pub fn tier(&self) -> StaggerTier {
        self.tier
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn t(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    /// Inside the trailing recovery window with dodge cancels enabled.
    pub fn allows_dodge_cancel(&self) -> bool {
        self.allow_dodge_cancel && self.t() >= self.recovery_start
    }

    pub fn is_finished(&self) -> bool {
        self.t() >= 1.0
    }

    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        let previous = self.t();
        self.elapsed += dt;
        ctx.displace(self.knockback * self.curve.delta(previous, self.t()));

        if !self.is_finished() {
            return None;
        }
        if ctx.poise.is_broken() {
            ctx.poise.reset();
        }
        Some(Transition::Idle)
    }
}
