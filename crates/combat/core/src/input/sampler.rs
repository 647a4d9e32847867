use glam::Vec3;

use super::{CombatAction, InputBuffer};
use crate::config::InputConfig;

/// Raw per-frame device state, as sampled by the display-rate loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputSnapshot {
    /// World-space movement intent. Zero when no direction is held.
    pub movement: Vec3,
    pub walk: bool,
    pub sprint: bool,
    /// Shared light/heavy attack button.
    pub attack: bool,
    /// Dedicated heavy button, if the control scheme has one.
    pub heavy: bool,
    pub dodge: bool,
    pub parry: bool,
    pub block: bool,
    pub lock_on: bool,
}

/// Continuous input consulted by locomotion, block and heavy charge logic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeldInput {
    pub movement: Vec3,
    pub walk: bool,
    pub sprint: bool,
    pub attack: bool,
    pub block: bool,
}

impl HeldInput {
    pub fn is_moving(&self) -> bool {
        self.movement.length_squared() > f32::EPSILON
    }

    /// Normalized movement direction, if any.
    pub fn direction(&self) -> Option<Vec3> {
        self.movement.try_normalize()
    }
}

/// Disambiguates the shared attack button into light and heavy intents.
///
/// - Released before `threshold`: LightAttack
/// - Held past `threshold`: HeavyAttack, emitted once, as soon as the
///   threshold is crossed (or on release if no sample landed in between)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackPressTracker {
    threshold: f32,
    pressed_at: Option<f64>,
    heavy_triggered: bool,
}

impl AttackPressTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            pressed_at: None,
            heavy_triggered: false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn update(&mut self, held: bool, now: f64) -> Option<CombatAction> {
        match (self.pressed_at, held) {
            (None, true) => {
                self.pressed_at = Some(now);
                self.heavy_triggered = false;
                None
            }
            (Some(start), true) => {
                if !self.heavy_triggered && now - start >= self.threshold as f64 {
                    self.heavy_triggered = true;
                    return Some(CombatAction::HeavyAttack);
                }
                None
            }
            (Some(start), false) => {
                self.pressed_at = None;
                if self.heavy_triggered {
                    None
                } else if now - start < self.threshold as f64 {
                    Some(CombatAction::LightAttack)
                } else {
                    Some(CombatAction::HeavyAttack)
                }
            }
            (None, false) => None,
        }
    }
}

/// Turns snapshots into buffered intents and held state.
#[derive(Clone, Debug)]
pub struct InputSampler {
    previous: InputSnapshot,
    attack: AttackPressTracker,
    held: HeldInput,
}

impl InputSampler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            previous: InputSnapshot::default(),
            attack: AttackPressTracker::new(config.heavy_hold_threshold),
            held: HeldInput::default(),
        }
    }

    pub fn held(&self) -> &HeldInput {
        &self.held
    }

    /// Runs one sampling tick: advances the buffer clock, pushes the intents
    /// for every rising edge, and records the held state.
    pub fn sample(&mut self, snapshot: &InputSnapshot, now: f64, buffer: &mut InputBuffer) {
        buffer.advance(now);

        let previous = self.previous;
        let direction = snapshot.movement.try_normalize();
        let rising = |current: bool, before: bool| current && !before;

        if rising(snapshot.dodge, previous.dodge) {
            buffer.push(CombatAction::Dodge, direction);
        }
        if rising(snapshot.parry, previous.parry) {
            buffer.push(CombatAction::Parry, direction);
        }
        if rising(snapshot.block, previous.block) {
            buffer.push(CombatAction::Block, direction);
        }
        if rising(snapshot.heavy, previous.heavy) {
            buffer.push(CombatAction::HeavyAttack, direction);
        }
        if rising(snapshot.lock_on, previous.lock_on) {
            buffer.push(CombatAction::LockOn, None);
        }
        if let Some(action) = self.attack.update(snapshot.attack, now) {
            buffer.push(action, direction);
        }

        self.held = HeldInput {
            movement: snapshot.movement,
            walk: snapshot.walk,
            sprint: snapshot.sprint,
            attack: snapshot.attack || snapshot.heavy,
            block: snapshot.block,
        };
        self.previous = *snapshot;
    }

    /// Forgets edge history, e.g. after respawn.
    pub fn reset(&mut self) {
        self.previous = InputSnapshot::default();
        self.attack = AttackPressTracker::new(self.attack.threshold);
        self.held = HeldInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_press_is_light_attack() {
        let mut tracker = AttackPressTracker::new(0.2);
        assert_eq!(tracker.update(true, 0.0), None);
        assert_eq!(tracker.update(true, 0.1), None);
        assert_eq!(tracker.update(false, 0.15), Some(CombatAction::LightAttack));
    }

    #[test]
    fn long_hold_emits_heavy_exactly_once() {
        let mut tracker = AttackPressTracker::new(0.2);
        tracker.update(true, 0.0);
        assert_eq!(tracker.update(true, 0.1), None);
        assert_eq!(tracker.update(true, 0.21), Some(CombatAction::HeavyAttack));
        assert_eq!(tracker.update(true, 0.5), None);
        assert_eq!(tracker.update(false, 0.9), None);

        // Flag resets on the next press.
        tracker.update(true, 1.0);
        assert_eq!(tracker.update(false, 1.05), Some(CombatAction::LightAttack));
    }

    #[test]
    fn release_past_threshold_without_intermediate_sample_is_heavy() {
        let mut tracker = AttackPressTracker::new(0.2);
        tracker.update(true, 0.0);
        assert_eq!(tracker.update(false, 0.3), Some(CombatAction::HeavyAttack));
    }

    #[test]
    fn sampler_buffers_rising_edges_only() {
        let config = InputConfig::default();
        let mut sampler = InputSampler::new(&config);
        let mut buffer = InputBuffer::new(&config);

        let pressed = InputSnapshot {
            dodge: true,
            movement: Vec3::new(0.0, 0.0, 2.0),
            ..InputSnapshot::default()
        };
        sampler.sample(&pressed, 0.0, &mut buffer);
        sampler.sample(&pressed, 0.016, &mut buffer);
        sampler.sample(&pressed, 0.032, &mut buffer);
        assert_eq!(buffer.len(), 1);

        let dodge = buffer.try_consume(CombatAction::Dodge).unwrap();
        assert_eq!(dodge.direction, Some(Vec3::Z));
        assert!(sampler.held().is_moving());
    }
}
