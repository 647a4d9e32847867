use crate::events::AnimationTrigger;
use crate::fsm::{StateContext, Transition};
use crate::types::ParryData;

/// Which defensive sub-window an incoming hit landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GuardTiming {
    /// Inside `[0, perfect_window)`.
    Perfect,
    /// Inside `[perfect_window, parry_window)`.
    Partial,
}

impl GuardTiming {
    /// Classifies `elapsed` seconds against the two nested windows.
    pub fn classify(elapsed: f32, perfect_window: f32, parry_window: f32) -> Option<Self> {
        if elapsed < perfect_window {
            Some(GuardTiming::Perfect)
        } else if elapsed < parry_window {
            Some(GuardTiming::Partial)
        } else {
            None
        }
    }
}

/// Consecutive partial deflects.
///
/// Each partial parry landing within `chain_window` of the previous one
/// increments the counter up to `max_chain`. A perfect parry, an
/// interrupted parry, or a lapse longer than the window resets it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeflectChain {
    count: u8,
    since_last: f32,
    window: f32,
    max: u8,
}

impl DeflectChain {
    pub fn new(parry: &ParryData) -> Self {
        Self {
            count: 0,
            since_last: 0.0,
            window: parry.chain_window,
            max: parry.max_chain,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn register(&mut self) -> u8 {
        self.count = self.count.saturating_add(1).min(self.max);
        self.since_last = 0.0;
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.since_last = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.count == 0 {
            return;
        }
        self.since_last += dt;
        if self.since_last > self.window {
            self.reset();
        }
    }
}

/// Standalone parry.
///
/// The state lasts `duration`, or until the riposte window opened by a
/// perfect parry closes, whichever is later.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parry {
    data: ParryData,
    elapsed: f32,
    riposte: f32,
}

impl Parry {
    pub fn enter(ctx: &mut StateContext<'_>) -> Self {
        ctx.animate(AnimationTrigger::Parry);
        Self {
            data: ctx.moveset.parry,
            elapsed: 0.0,
            riposte: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn timing(&self) -> Option<GuardTiming> {
        GuardTiming::classify(self.elapsed, self.data.perfect_window, self.data.parry_window)
    }

    /// Past the parryable window.
    pub fn is_recovering(&self) -> bool {
        self.elapsed >= self.data.parry_window
    }

    pub fn riposte_open(&self) -> bool {
        self.riposte > 0.0
    }

    pub fn open_riposte(&mut self) {
        self.riposte = self.data.riposte_window;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.data.duration && !self.riposte_open()
    }

    pub fn execute(&mut self, dt: f32) -> Option<Transition> {
        self.elapsed += dt;
        self.riposte = (self.riposte - dt).max(0.0);
        self.is_finished().then_some(Transition::Idle)
    }
}
