use super::Swing;
use crate::events::{ActorEvent, AnimationTrigger};
use crate::fsm::{StateContext, Transition};
use crate::input::CombatAction;

/// Light combo chain.
///
/// A follow-up is only accepted inside the current swing's combo window. It
/// is queued, then started at the next tick boundary: the combo index
/// advances, the next swing's stamina is charged and its timing table
/// replaces the current one.
#[derive(Clone, Debug, PartialEq)]
pub struct LightAttack {
    index: usize,
    swing: Swing,
    queued: bool,
}

impl LightAttack {
    pub fn enter(ctx: &mut StateContext<'_>) -> Self {
        let attack = ctx.moveset.light(0).cloned().unwrap_or_default();
        ctx.animate(AnimationTrigger::LightAttack {
            index: 0,
            name: attack.name.clone(),
        });
        let id = ctx.next_swing();
        Self {
            index: 0,
            swing: Swing::new(attack, id),
            queued: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn swing(&self) -> &Swing {
        &self.swing
    }

    pub fn is_queued(&self) -> bool {
        self.queued
    }

    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        if std::mem::take(&mut self.queued) {
            self.start_follow_up(ctx);
        }
        self.swing.advance(dt);
        self.swing.is_finished().then_some(Transition::Idle)
    }

    pub fn handle_input(&mut self, ctx: &mut StateContext<'_>) {
        if self.can_queue(ctx) && ctx.buffer.try_consume(CombatAction::LightAttack).is_some() {
            self.queue(ctx);
        }
    }

    /// Direct request for the next swing, bypassing the buffer.
    pub fn try_queue(&mut self, ctx: &mut StateContext<'_>) -> bool {
        if !self.can_queue(ctx) {
            return false;
        }
        self.queue(ctx);
        true
    }

    fn can_queue(&self, ctx: &StateContext<'_>) -> bool {
        if self.queued || !self.swing.accepts_combo() || self.index >= ctx.moveset.max_combo_index() {
            return false;
        }
        ctx.moveset
            .light(self.index + 1)
            .is_some_and(|next| ctx.stamina.can_afford(next.stamina_cost))
    }

    fn queue(&mut self, ctx: &mut StateContext<'_>) {
        self.queued = true;
        let (actor, index) = (ctx.actor, self.index + 1);
        tracing::debug!(%actor, index, "combo follow-up queued");
        ctx.events.emit(&ActorEvent::ComboQueued { actor, index });
    }

    fn start_follow_up(&mut self, ctx: &mut StateContext<'_>) {
        let Some(next) = ctx.moveset.light(self.index + 1) else {
            return;
        };
        if !ctx.stamina.try_consume(next.stamina_cost) {
            return;
        }
        let next = next.clone();
        self.index += 1;
        ctx.animate(AnimationTrigger::LightAttack {
            index: self.index,
            name: next.name.clone(),
        });
        let id = ctx.next_swing();
        self.swing = Swing::new(next, id);
    }
}
