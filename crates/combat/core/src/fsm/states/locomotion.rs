use crate::events::AnimationTrigger;
use crate::fsm::{Gait, StateContext, StateKind, Transition};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Locomotion {
    gait: Gait,
}

impl Locomotion {
    pub fn enter(gait: Gait, ctx: &mut StateContext<'_>) -> Self {
        ctx.animate(AnimationTrigger::Locomotion(gait));
        Self { gait }
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn kind(&self) -> StateKind {
        self.gait.kind()
    }

    /// Drains sprint stamina, then follows the held input to another gait,
    /// the guard, or Idle.
    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        if self.gait == Gait::Sprint {
            ctx.stamina.consume(ctx.sprint_drain * dt);
        }
        let desired = Transition::neutral(ctx.held, ctx.stamina.is_exhausted());
        (desired.kind() != self.kind()).then_some(desired)
    }
}
