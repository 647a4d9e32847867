use super::states::{Block, Dodge, GuardTiming, HeavyAttack, LightAttack, Locomotion, Parry, Stagger, Swing};
use super::{StateContext, StateKind, Transition};
use crate::events::AnimationTrigger;

/// Closed set of action states, each variant carrying its own data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ActionState {
    #[default]
    Idle,
    Locomotion(Locomotion),
    LightAttack(LightAttack),
    HeavyAttack(HeavyAttack),
    Parry(Parry),
    Block(Block),
    Dodge(Dodge),
    Stagger(Stagger),
    /// Terminal. Left only through an explicit respawn.
    Death,
}

impl ActionState {
    pub fn kind(&self) -> StateKind {
        match self {
            ActionState::Idle => StateKind::Idle,
            ActionState::Locomotion(locomotion) => locomotion.kind(),
            ActionState::LightAttack(_) => StateKind::LightAttack,
            ActionState::HeavyAttack(_) => StateKind::HeavyAttack,
            ActionState::Parry(_) => StateKind::Parry,
            ActionState::Block(_) => StateKind::Block,
            ActionState::Dodge(_) => StateKind::Dodge,
            ActionState::Stagger(_) => StateKind::Stagger,
            ActionState::Death => StateKind::Death,
        }
    }

    /// Builds the target state of `transition`, running its entry logic.
    pub fn enter(transition: Transition, ctx: &mut StateContext<'_>) -> Self {
        match transition {
            Transition::Idle => {
                ctx.animate(AnimationTrigger::Idle);
                ActionState::Idle
            }
            Transition::Locomotion(gait) => ActionState::Locomotion(Locomotion::enter(gait, ctx)),
            Transition::LightAttack => ActionState::LightAttack(LightAttack::enter(ctx)),
            Transition::HeavyAttack => ActionState::HeavyAttack(HeavyAttack::enter(ctx)),
            Transition::Parry => ActionState::Parry(Parry::enter(ctx)),
            Transition::Block => ActionState::Block(Block::enter(ctx)),
            Transition::Dodge { direction } => ActionState::Dodge(Dodge::enter(direction, ctx)),
            Transition::Stagger {
                tier,
                duration,
                direction,
            } => ActionState::Stagger(Stagger::enter(tier, duration, direction, ctx)),
            Transition::Death => {
                ctx.animate(AnimationTrigger::Death);
                ActionState::Death
            }
        }
    }

    /// Per-tick body. Returns the transition the state asks for on its own
    /// (window expiry, held input changes).
    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        match self {
            ActionState::Idle => {
                let desired = Transition::neutral(ctx.held, ctx.stamina.is_exhausted());
                (desired != Transition::Idle).then_some(desired)
            }
            ActionState::Locomotion(locomotion) => locomotion.execute(dt, ctx),
            ActionState::LightAttack(attack) => attack.execute(dt, ctx),
            ActionState::HeavyAttack(attack) => attack.execute(dt, ctx),
            ActionState::Parry(parry) => parry.execute(dt),
            ActionState::Block(block) => block.execute(dt, ctx),
            ActionState::Dodge(dodge) => dodge.execute(dt, ctx),
            ActionState::Stagger(stagger) => stagger.execute(dt, ctx),
            ActionState::Death => None,
        }
    }

    /// State-internal input handling. Generic buffered cancels are polled by
    /// the machine afterwards, against the transition table.
    pub fn handle_input(&mut self, ctx: &mut StateContext<'_>) {
        if let ActionState::LightAttack(attack) = self {
            attack.handle_input(ctx);
        }
    }

    /// Cleanup run on every exit path.
    pub fn exit(&mut self, to: StateKind, ctx: &mut StateContext<'_>) {
        ctx.disarm_hitbox();
        if matches!(self, ActionState::Parry(_)) && to.is_forced() {
            ctx.chain.reset();
        }
    }

    /// Swing whose hitbox should be live right now.
    pub fn live_swing(&self) -> Option<&Swing> {
        let swing = match self {
            ActionState::LightAttack(attack) => attack.swing(),
            ActionState::HeavyAttack(attack) if !attack.is_charging() => attack.swing(),
            _ => return None,
        };
        swing.hitbox_live().then_some(swing)
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self, ActionState::Dodge(dodge) if dodge.is_invulnerable())
    }

    /// Parry or block sub-window currently open, if any.
    pub fn guard_timing(&self) -> Option<GuardTiming> {
        match self {
            ActionState::Parry(parry) => parry.timing(),
            ActionState::Block(block) => block.timing(),
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, ActionState::Block(_))
    }

    pub fn is_passive_block(&self) -> bool {
        matches!(self, ActionState::Block(block) if block.is_passive())
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, ActionState::Death)
    }
}
