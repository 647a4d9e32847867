use crate::observer::Observers;
use crate::types::StaminaParams;

/// Notifications emitted by [`Stamina`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StaminaEvent {
    /// The pool reached zero.
    Exhausted,
    /// Exhaustion cleared after regenerating past the recovery fraction.
    Recovered,
}

/// Depletable stamina pool.
///
/// # Invariants
///
/// - `0 <= current <= max` after every call
/// - `exhausted` is set when `current` reaches zero and cleared only once
///   regeneration carries `current` to `recovery_fraction * max`, or by
///   [`Stamina::reset`]
#[derive(Debug)]
pub struct Stamina {
    params: StaminaParams,
    current: f32,
    exhausted: bool,
    /// Seconds since the last consumption.
    since_use: f32,
    events: Observers<StaminaEvent>,
}

impl Stamina {
    /// Creates a full pool.
    pub fn new(params: StaminaParams) -> Self {
        Self {
            params,
            current: params.max,
            exhausted: false,
            since_use: params.regen_delay,
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
            return 0.0;
        }
        self.current / self.params.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn events_mut(&mut self) -> &mut Observers<StaminaEvent> {
        &mut self.events
    }

    /// Whether [`Stamina::try_consume`] would succeed for `amount`.
    pub fn can_afford(&self, amount: f32) -> bool {
        !self.exhausted && self.current >= amount
    }

    /// Consumes `amount` if not exhausted and enough remains. No mutation on failure.
    pub fn try_consume(&mut self, amount: f32) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.consume(amount);
        true
    }

    /// Unconditionally subtracts `amount`, clamped at zero.
    pub fn consume(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).max(0.0);
        self.since_use = 0.0;
        if self.current <= 0.0 && !self.exhausted {
            self.exhausted = true;
            self.events.emit(&StaminaEvent::Exhausted);
        }
    }

    /// Regenerates once `regen_delay` has passed since the last consumption.
    pub fn tick(&mut self, dt: f32) {
        self.since_use += dt;
        if self.since_use < self.params.regen_delay || self.current >= self.params.max {
            return;
        }

        self.current = (self.current + self.params.regen_rate * dt).min(self.params.max);

        let threshold = self.params.max * self.params.recovery_fraction;
        if self.exhausted && self.current >= threshold && self.current > 0.0 {
            self.exhausted = false;
            self.events.emit(&StaminaEvent::Recovered);
        }
    }

    /// Refills the pool and clears exhaustion.
    pub fn reset(&mut self) {
        let was_exhausted = self.exhausted;
        self.current = self.params.max;
        self.exhausted = false;
        self.since_use = self.params.regen_delay;
        if was_exhausted {
            self.events.emit(&StaminaEvent::Recovered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn params() -> StaminaParams {
        StaminaParams {
            max: 100.0,
            regen_rate: 50.0,
            regen_delay: 0.5,
            recovery_fraction: 0.2,
        }
    }

    #[test]
    fn try_consume_fails_without_mutation() {
        let mut stamina = Stamina::new(params());
        assert!(stamina.try_consume(70.0));
        assert!(!stamina.try_consume(40.0));
        assert_eq!(stamina.current(), 30.0);
    }

    #[test]
    fn current_stays_within_bounds_for_any_sequence() {
        let mut stamina = Stamina::new(params());
        let amounts = [10.0, 95.0, 30.0, 0.5, 200.0, 5.0, 60.0, 1.0];
        for (i, amount) in amounts.iter().cycle().take(64).enumerate() {
            stamina.try_consume(*amount);
            if i % 3 == 0 {
                stamina.consume(*amount);
            }
            stamina.tick(0.37);
            assert!(stamina.current() >= 0.0);
            assert!(stamina.current() <= stamina.max());
        }
    }

    #[test]
    fn consume_to_zero_exhausts_and_blocks_actions() {
        let mut stamina = Stamina::new(params());
        stamina.consume(150.0);
        assert_eq!(stamina.current(), 0.0);
        assert!(stamina.is_exhausted());
        assert!(!stamina.try_consume(0.0));
    }

    #[test]
    fn regen_waits_for_delay() {
        let mut stamina = Stamina::new(params());
        stamina.consume(50.0);
        stamina.tick(0.4);
        assert_eq!(stamina.current(), 50.0);
        stamina.tick(0.2);
        assert!(stamina.current() > 50.0);
    }

    #[test]
    fn exhaustion_clears_only_past_recovery_fraction() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut stamina = Stamina::new(params());
        let sink = Rc::clone(&events);
        stamina.events_mut().subscribe(move |e| sink.borrow_mut().push(*e));

        stamina.consume(100.0);
        stamina.tick(0.5); // delay elapsed, +25
        assert!(stamina.current() > 0.0);
        assert!(stamina.current() >= 20.0);
        assert!(!stamina.is_exhausted());

        let mut slow = Stamina::new(StaminaParams {
            regen_rate: 10.0,
            ..params()
        });
        slow.consume(100.0);
        slow.tick(0.5); // +5
        assert!(slow.is_exhausted());
        slow.tick(1.0); // 15
        assert!(slow.is_exhausted());
        slow.tick(0.5); // 20
        assert!(!slow.is_exhausted());

        assert_eq!(
            *events.borrow(),
            vec![StaminaEvent::Exhausted, StaminaEvent::Recovered]
        );
    }

    #[test]
    fn reset_refills_and_clears_exhaustion() {
        let mut stamina = Stamina::new(params());
        stamina.consume(100.0);
        stamina.reset();
        assert_eq!(stamina.current(), 100.0);
        assert!(!stamina.is_exhausted());
        assert_eq!(stamina.normalized(), 1.0);
    }
}
