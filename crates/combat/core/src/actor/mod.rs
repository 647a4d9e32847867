//! Combatants.
//!
//! An [`Actor`] owns everything that belongs to one combatant: resources,
//! input buffer, action state machine, hitbox and hurtboxes. It is mutated
//! only by its own state machine and by damage resolution
//! ([`Actor::handle_damage`]).

mod damage;
mod table;

pub use table::Actors;

use arrayvec::ArrayVec;
use glam::Vec3;

use crate::config::CombatConfig;
use crate::events::ActorEvent;
use crate::fsm::{
    ActionState, DeflectChain, GuardTiming, StateContext, StateKind, StateMachine, Transition,
};
use crate::hit::{Hitbox, Hurtbox};
use crate::input::{HeldInput, InputBuffer, InputSampler, InputSnapshot};
use crate::observer::Observers;
use crate::resources::{Poise, Stamina};
use crate::types::{
    ActorId, ActorStats, Faction, HitboxId, HurtboxId, Moveset, StaggerTier,
};

type Hurtboxes = ArrayVec<Hurtbox, { CombatConfig::MAX_HURTBOXES }>;

/// Running counters, mostly for summaries and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTally {
    pub hits_landed: u32,
    pub hits_taken: u32,
    pub perfect_parries: u32,
    pub partial_parries: u32,
    pub blocks: u32,
    pub dodges: u32,
    pub deaths: u32,
}

#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    faction: Faction,
    position: Vec3,
    forward: Vec3,
    stats: ActorStats,
    moveset: Moveset,
    health: f32,
    stamina: Stamina,
    poise: Poise,
    buffer: InputBuffer,
    sampler: InputSampler,
    machine: StateMachine,
    hitbox: Hitbox,
    hurtboxes: Hurtboxes,
    chain: DeflectChain,
    /// Position correction not yet drained by physics.
    motion: Vec3,
    swings: u32,
    tally: ActorTally,
    events: Observers<ActorEvent>,
}

impl Actor {
    /// Creates a living actor in Idle with full health and stamina.
    ///
    /// The hitbox takes the actor's numeric id. Hurtboxes are added with
    /// [`Actor::with_hurtbox`].
    pub fn new(
        id: ActorId,
        faction: Faction,
        stats: ActorStats,
        moveset: Moveset,
        config: &CombatConfig,
    ) -> Self {
        Self {
            id,
            faction,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            health: stats.max_health,
            stamina: Stamina::new(stats.stamina),
            poise: Poise::new(stats.poise),
            buffer: InputBuffer::new(&config.input),
            sampler: InputSampler::new(&config.input),
            machine: StateMachine::new(),
            hitbox: Hitbox::new(HitboxId(id.0), id, 1.0),
            hurtboxes: ArrayVec::new(),
            chain: DeflectChain::new(&moveset.parry),
            motion: Vec3::ZERO,
            swings: 0,
            tally: ActorTally::default(),
            events: Observers::new(),
            stats,
            moveset,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.set_forward(forward);
        self
    }

    pub fn with_weapon_multiplier(mut self, multiplier: f32) -> Self {
        self.hitbox.multiplier = multiplier;
        self
    }

    /// Attaches a hurtbox. Ignored once `MAX_HURTBOXES` are attached.
    pub fn with_hurtbox(mut self, id: HurtboxId, multiplier: f32) -> Self {
        if self
            .hurtboxes
            .try_push(Hurtbox::new(id, self.id, multiplier))
            .is_err()
        {
            tracing::warn!(actor = %self.id, hurtbox = %id, "hurtbox limit reached");
        }
        self
    }

    // ===== identity and transform =====

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Zero vectors are ignored.
    pub fn set_forward(&mut self, forward: Vec3) {
        if let Some(forward) = forward.try_normalize() {
            self.forward = forward;
        }
    }

    /// Drains the dodge and knockback displacement accumulated since the
    /// last call.
    pub fn take_motion_correction(&mut self) -> Vec3 {
        std::mem::take(&mut self.motion)
    }

    pub fn stats(&self) -> &ActorStats {
        &self.stats
    }

    pub fn moveset(&self) -> &Moveset {
        &self.moveset
    }

    // ===== queries =====

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && !self.machine.state().is_dead()
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn health_normalized(&self) -> f32 {
        if self.stats.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.stats.max_health
    }

    pub fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    pub fn stamina_mut(&mut self) -> &mut Stamina {
        &mut self.stamina
    }

    pub fn poise(&self) -> &Poise {
        &self.poise
    }

    pub fn poise_mut(&mut self) -> &mut Poise {
        &mut self.poise
    }

    pub fn state(&self) -> &ActionState {
        self.machine.state()
    }

    pub fn state_kind(&self) -> StateKind {
        self.machine.kind()
    }

    pub fn can_transition_to(&self, target: StateKind) -> bool {
        self.machine.can_transition_to(target)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.machine.state().is_invulnerable()
    }

    /// Parry sub-window currently open, if the actor is parrying.
    pub fn is_parrying(&self) -> Option<GuardTiming> {
        match self.machine.state() {
            ActionState::Parry(parry) => parry.timing(),
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.machine.state().is_blocking()
    }

    pub fn deflect_chain(&self) -> u8 {
        self.chain.count()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn held(&self) -> &HeldInput {
        self.sampler.held()
    }

    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn hitbox_mut(&mut self) -> &mut Hitbox {
        &mut self.hitbox
    }

    pub fn hurtboxes(&self) -> &[Hurtbox] {
        &self.hurtboxes
    }

    pub fn hurtbox(&self, id: HurtboxId) -> Option<&Hurtbox> {
        self.hurtboxes.iter().find(|hurtbox| hurtbox.id == id)
    }

    pub fn tally(&self) -> &ActorTally {
        &self.tally
    }

    pub fn events_mut(&mut self) -> &mut Observers<ActorEvent> {
        &mut self.events
    }

    // ===== ticks =====

    /// Sampling tick: turns a device snapshot into buffered intents.
    pub fn sample_input(&mut self, snapshot: &InputSnapshot, now: f64) {
        self.sampler.sample(snapshot, now, &mut self.buffer);
    }

    /// Simulation tick: state execution, transition commit, hitbox update.
    pub fn simulate(&mut self, dt: f32) {
        let (machine, mut ctx) = self.split();
        machine.tick(dt, &mut ctx);
    }

    /// Resource tick, run after damage resolution.
    pub fn tick_resources(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.stamina.tick(dt);
        self.poise.tick(dt);
        self.chain.tick(dt);
    }

    // ===== mutators =====

    /// Guarded, paid transition request.
    pub fn request(&mut self, transition: Transition) -> bool {
        let (machine, mut ctx) = self.split();
        machine.request(transition, &mut ctx)
    }

    /// Starts the light combo, or queues the next swing while inside the
    /// current swing's combo window.
    pub fn try_light_attack(&mut self) -> bool {
        let (machine, mut ctx) = self.split();
        if matches!(machine.state(), ActionState::LightAttack(_)) {
            return machine.queue_combo(&mut ctx);
        }
        machine.request(Transition::LightAttack, &mut ctx)
    }

    pub fn try_heavy_attack(&mut self) -> bool {
        self.request(Transition::HeavyAttack)
    }

    pub fn try_parry(&mut self) -> bool {
        self.request(Transition::Parry)
    }

    pub fn try_block(&mut self) -> bool {
        self.request(Transition::Block)
    }

    /// Dodges along `direction`; a zero vector falls back to the held
    /// movement direction, then to a backstep.
    pub fn try_dodge(&mut self, direction: Vec3) -> bool {
        self.request(Transition::Dodge {
            direction: direction.try_normalize(),
        })
    }

    /// Forces a medium stagger lasting `duration` seconds.
    pub fn apply_stagger(&mut self, duration: f32) -> bool {
        self.request(Transition::Stagger {
            tier: StaggerTier::Medium,
            duration: Some(duration),
            direction: Vec3::ZERO,
        })
    }

    /// Forces a stagger of `tier` with knockback along `direction`.
    pub fn stagger(&mut self, tier: StaggerTier, direction: Vec3) -> bool {
        self.request(Transition::stagger(tier, direction))
    }

    /// Brings a dead actor back: full resources, cleared input, hurtboxes
    /// re-enabled, forced into Idle.
    pub fn respawn(&mut self, position: Vec3) {
        self.health = self.stats.max_health;
        self.position = position;
        self.motion = Vec3::ZERO;
        self.stamina.reset();
        self.poise.reset();
        self.chain.reset();
        self.buffer.clear();
        self.sampler.reset();
        for hurtbox in self.hurtboxes.iter_mut() {
            hurtbox.set_enabled(true);
        }

        let (machine, mut ctx) = self.split();
        machine.force(Transition::Idle, &mut ctx);

        tracing::debug!(actor = %self.id, "respawned");
        self.events.emit(&ActorEvent::Respawned { actor: self.id });
    }

    pub(crate) fn record_hit_landed(&mut self) {
        self.tally.hits_landed += 1;
    }

    /// Splits the actor into its state machine and the context its states run
    /// against.
    fn split(&mut self) -> (&mut StateMachine, StateContext<'_>) {
        let ctx = StateContext {
            actor: self.id,
            moveset: &self.moveset,
            held: self.sampler.held(),
            forward: self.forward,
            sprint_drain: self.stats.sprint_drain,
            stamina: &mut self.stamina,
            poise: &mut self.poise,
            buffer: &mut self.buffer,
            hitbox: &mut self.hitbox,
            chain: &mut self.chain,
            events: &mut self.events,
            motion: &mut self.motion,
            swings: &mut self.swings,
        };
        (&mut self.machine, ctx)
    }
}
