use super::GuardTiming;
use crate::events::AnimationTrigger;
use crate::fsm::{StateContext, Transition};
use crate::types::BlockData;

/// Held guard.
///
/// Opens with the perfect and parryable sub-windows, then settles into a
/// passive block that drains stamina every tick. Releasing the button or
/// running out of stamina drops the guard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    data: BlockData,
    elapsed: f32,
}

impl Block {
    pub fn enter(ctx: &mut StateContext<'_>) -> Self {
        ctx.animate(AnimationTrigger::Block);
        Self {
            data: ctx.moveset.block,
            elapsed: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn timing(&self) -> Option<GuardTiming> {
        GuardTiming::classify(self.elapsed, self.data.perfect_window, self.data.parry_window)
    }

    pub fn is_passive(&self) -> bool {
        self.elapsed >= self.data.parry_window
    }

    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        self.elapsed += dt;
        if !ctx.held.block {
            return Some(Transition::Idle);
        }
        if self.is_passive() {
            ctx.stamina.consume(self.data.drain_per_second * dt);
            if ctx.stamina.is_exhausted() {
                return Some(Transition::Idle);
            }
        }
        None
    }
}
