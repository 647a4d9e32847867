use crate::observer::Observers;
use crate::types::PoiseParams;

/// Notifications emitted by [`Poise`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoiseEvent {
    Broken,
    /// A broken poise was reset.
    Reset,
}

/// Accumulating stagger-resistance counter.
///
/// Unlike [`Stamina`](super::Stamina), breaking is a hard edge: once
/// `current >= max` the pool is broken until [`Poise::reset`] is called,
/// and decay is suspended while broken.
#[derive(Debug)]
pub struct Poise {
    params: PoiseParams,
    current: f32,
    broken: bool,
    /// Seconds since the last poise damage.
    since_hit: f32,
    events: Observers<PoiseEvent>,
}

impl Poise {
    pub fn new(params: PoiseParams) -> Self {
        Self {
            params,
            current: 0.0,
            broken: false,
            since_hit: 0.0,
            events: Observers::new(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.params.max
    }

    pub fn normalized(&self) -> f32 {
        if self.params.max <= 0.0 {
            return 1.0;
        }
        self.current / self.params.max
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn events_mut(&mut self) -> &mut Observers<PoiseEvent> {
        &mut self.events
    }

    /// Accumulates `amount`. Returns `true` only on the hit that breaks poise.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        self.current = (self.current + amount.max(0.0)).min(self.params.max);
        self.since_hit = 0.0;

        if !self.broken && self.current >= self.params.max {
            self.broken = true;
            self.events.emit(&PoiseEvent::Broken);
            return true;
        }
        false
    }

    /// Decays toward zero once `regen_delay` has passed since the last hit.
    pub fn tick(&mut self, dt: f32) {
        self.since_hit += dt;
        if self.broken || self.since_hit < self.params.regen_delay {
            return;
        }
        self.current = (self.current - self.params.regen_rate * dt).max(0.0);
    }

    /// Zeroes the pool and clears the broken flag.
    pub fn reset(&mut self) {
        let was_broken = self.broken;
        self.current = 0.0;
        self.broken = false;
        self.since_hit = 0.0;
        if was_broken {
            self.events.emit(&PoiseEvent::Reset);
        }
    }

    /// Breaks poise unconditionally, for execution-style mechanics.
    pub fn force_break(&mut self) {
        self.current = self.params.max;
        self.broken = true;
        self.events.emit(&PoiseEvent::Broken);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn poise() -> Poise {
        Poise::new(PoiseParams {
            max: 50.0,
            regen_rate: 10.0,
            regen_delay: 1.0,
        })
    }

    #[test]
    fn break_fires_exactly_once_per_cycle() {
        let mut poise = poise();
        let results: Vec<bool> = (0..6).map(|_| poise.apply_damage(20.0)).collect();
        assert_eq!(results, vec![false, false, true, false, false, false]);
        assert!(poise.is_broken());
        assert_eq!(poise.current(), 50.0);

        poise.reset();
        let results: Vec<bool> = (0..3).map(|_| poise.apply_damage(20.0)).collect();
        assert_eq!(results, vec![false, false, true]);
    }

    #[test]
    fn decay_waits_for_delay_and_stops_while_broken() {
        let mut poise = poise();
        poise.apply_damage(30.0);
        poise.tick(0.9);
        assert_eq!(poise.current(), 30.0);
        poise.tick(0.5);
        assert!((poise.current() - 25.0).abs() < 1e-4);

        poise.apply_damage(40.0);
        poise.tick(5.0);
        assert!(poise.is_broken());
        assert_eq!(poise.current(), 50.0);
    }

    #[test]
    fn reset_event_only_when_previously_broken() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut poise = poise();
        let sink = Rc::clone(&events);
        poise.events_mut().subscribe(move |e| sink.borrow_mut().push(*e));

        poise.apply_damage(10.0);
        poise.reset();
        assert!(events.borrow().is_empty());

        poise.force_break();
        poise.force_break();
        poise.reset();
        assert_eq!(
            *events.borrow(),
            vec![PoiseEvent::Broken, PoiseEvent::Broken, PoiseEvent::Reset]
        );
        assert_eq!(poise.current(), 0.0);
    }
}
