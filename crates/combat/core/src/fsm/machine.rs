use super::guard;
use super::{ActionState, StateContext, StateKind, Transition};
use crate::events::ActorEvent;
use crate::input::CombatAction;

/// Buffered intents polled every tick, highest priority first.
const POLL_ORDER: [CombatAction; 5] = [
    CombatAction::Dodge,
    CombatAction::Parry,
    CombatAction::Block,
    CombatAction::HeavyAttack,
    CombatAction::LightAttack,
];

/// Per-actor action state machine.
///
/// # Tick order
///
/// 1. [`ActionState::execute`] advances timers and may ask for a transition
/// 2. [`ActionState::handle_input`] runs state-internal input logic
/// 3. buffered intents are polled against the transition table; a buffered
///    request wins over the one from step 1
/// 4. the request goes through [`StateMachine::request`]
/// 5. the hitbox is synchronized with the active swing
///
/// # Commit order
///
/// guard → stamina → `exit()` of the old state → entry of the new one →
/// `StateChanged` event. A request that fails the guard or cannot be paid
/// for leaves the machine untouched.
#[derive(Clone, Debug, Default)]
pub struct StateMachine {
    state: ActionState,
    /// Swing the hitbox was last activated for.
    armed: Option<u32>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    pub fn can_transition_to(&self, target: StateKind) -> bool {
        guard::can_transition_to(&self.state, target)
    }

    pub fn tick(&mut self, dt: f32, ctx: &mut StateContext<'_>) {
        let natural = self.state.execute(dt, ctx);
        self.state.handle_input(ctx);
        if let Some(transition) = self.poll_buffered(ctx).or(natural) {
            self.request(transition, ctx);
        }
        self.sync_hitbox(ctx);
    }

    /// Guarded, paid transition. Returns whether it committed.
    pub fn request(&mut self, transition: Transition, ctx: &mut StateContext<'_>) -> bool {
        let (from, to) = (self.kind(), transition.kind());
        if !self.can_transition_to(to) {
            tracing::trace!(actor = %ctx.actor, %from, %to, "transition rejected by guard");
            return false;
        }
        if !affordable(&transition, ctx) {
            tracing::trace!(actor = %ctx.actor, %from, %to, "transition rejected, not enough stamina");
            return false;
        }
        let cost = transition.stamina_cost(ctx.moveset);
        if cost > 0.0 && !ctx.stamina.try_consume(cost) {
            return false;
        }
        self.commit(transition, ctx);
        true
    }

    /// Commits without consulting the guard. Respawn is the only caller.
    pub fn force(&mut self, transition: Transition, ctx: &mut StateContext<'_>) {
        self.commit(transition, ctx);
    }

    /// Queues the next light swing when the current one is in its combo window.
    pub fn queue_combo(&mut self, ctx: &mut StateContext<'_>) -> bool {
        match &mut self.state {
            ActionState::LightAttack(attack) => attack.try_queue(ctx),
            _ => false,
        }
    }

    /// Opens the riposte window after a perfect parry.
    pub fn open_riposte(&mut self) -> bool {
        match &mut self.state {
            ActionState::Parry(parry) => {
                parry.open_riposte();
                true
            }
            _ => false,
        }
    }

    /// Activates the hitbox for a live swing, closes it otherwise. A swing
    /// is armed at most once, so each combo step gets its own activation.
    pub fn sync_hitbox(&mut self, ctx: &mut StateContext<'_>) {
        match self.state.live_swing() {
            Some(swing) if self.armed == Some(swing.id()) => {}
            Some(swing) => {
                ctx.disarm_hitbox();
                ctx.hitbox.activate(swing.attack());
                self.armed = Some(swing.id());
            }
            None => ctx.disarm_hitbox(),
        }
    }

    fn poll_buffered(&self, ctx: &mut StateContext<'_>) -> Option<Transition> {
        for action in POLL_ORDER {
            if !ctx.buffer.has_buffered(action) {
                continue;
            }
            let candidate = match action {
                CombatAction::Dodge => Transition::Dodge { direction: None },
                CombatAction::Parry => Transition::Parry,
                CombatAction::Block => Transition::Block,
                CombatAction::HeavyAttack => Transition::HeavyAttack,
                CombatAction::LightAttack => Transition::LightAttack,
                CombatAction::LockOn => continue,
            };
            if !self.can_transition_to(candidate.kind()) || !affordable(&candidate, ctx) {
                continue;
            }
            let Some(entry) = ctx.buffer.try_consume(action) else {
                continue;
            };
            return Some(match candidate {
                Transition::Dodge { .. } => Transition::Dodge {
                    direction: entry.direction,
                },
                other => other,
            });
        }
        None
    }

    fn commit(&mut self, transition: Transition, ctx: &mut StateContext<'_>) {
        let (from, to) = (self.kind(), transition.kind());
        self.state.exit(to, ctx);
        self.state = ActionState::enter(transition, ctx);

        let actor = ctx.actor;
        tracing::debug!(%actor, %from, %to, "state transition");
        ctx.events.emit(&ActorEvent::StateChanged { actor, from, to });
    }
}

fn affordable(transition: &Transition, ctx: &StateContext<'_>) -> bool {
    match transition {
        Transition::Locomotion(super::Gait::Sprint) | Transition::Block => {
            !ctx.stamina.is_exhausted()
        }
        other => {
            let cost = other.stamina_cost(ctx.moveset);
            cost <= 0.0 || ctx.stamina.can_afford(cost)
        }
    }
}
