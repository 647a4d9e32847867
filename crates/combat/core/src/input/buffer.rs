use arrayvec::ArrayVec;
use glam::Vec3;

use super::{BufferedInput, CombatAction};
use crate::config::{CombatConfig, InputConfig};

type Entries = ArrayVec<BufferedInput, { CombatConfig::MAX_BUFFERED_INPUTS }>;

/// Short-lived FIFO of combat intents.
///
/// Entries are stamped with the buffer's clock, which the sampling tick
/// advances through [`InputBuffer::advance`]. Consumed and expired entries
/// are dropped lazily on every consuming access and eagerly on `advance`.
/// Compaction goes through a fixed-capacity scratch array, so no query
/// allocates.
#[derive(Clone, Debug)]
pub struct InputBuffer {
    entries: Entries,
    scratch: Entries,
    capacity: usize,
    window: f32,
    now: f64,
}

impl InputBuffer {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            entries: ArrayVec::new(),
            scratch: ArrayVec::new(),
            capacity: config
                .buffer_capacity
                .clamp(1, CombatConfig::MAX_BUFFERED_INPUTS),
            window: config.buffer_window,
            now: 0.0,
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn window(&self) -> f32 {
        self.window
    }

    /// Number of retained entries, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves the clock forward and sweeps expired entries.
    pub fn advance(&mut self, now: f64) {
        self.now = now;
        self.compact();
    }

    /// Appends an intent stamped with the current time, evicting the oldest
    /// entry when full.
    pub fn push(&mut self, action: CombatAction, direction: Option<Vec3>) {
        if self.entries.len() >= self.capacity {
            let evicted = self.entries.remove(0);
            tracing::trace!(action = %evicted.action, "input buffer full, evicted oldest");
        }
        self.entries.push(BufferedInput {
            action,
            direction,
            timestamp: self.now,
            consumed: false,
        });
    }

    /// Whether a valid entry for `action` is waiting. Never mutates.
    pub fn has_buffered(&self, action: CombatAction) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.action == action && entry.is_valid(self.now, self.window))
    }

    /// Consumes the oldest valid entry for `action`.
    pub fn try_consume(&mut self, action: CombatAction) -> Option<BufferedInput> {
        self.consume_where(|entry| entry.action == action)
    }

    /// Consumes the oldest valid entry regardless of its action.
    pub fn try_consume_any(&mut self) -> Option<BufferedInput> {
        self.consume_where(|_| true)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn consume_where(&mut self, predicate: impl Fn(&BufferedInput) -> bool) -> Option<BufferedInput> {
        let (now, window) = (self.now, self.window);
        let found = self
            .entries
            .iter_mut()
            .find(|entry| entry.is_valid(now, window) && predicate(entry))
            .map(|entry| {
                entry.consumed = true;
                *entry
            });
        self.compact();
        found
    }

    fn compact(&mut self) {
        let (now, window) = (self.now, self.window);
        self.scratch.clear();
        self.scratch.extend(
            self.entries
                .iter()
                .filter(|entry| entry.is_valid(now, window))
                .copied(),
        );
        core::mem::swap(&mut self.entries, &mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> InputBuffer {
        InputBuffer::new(&InputConfig::default())
    }

    #[test]
    fn consumable_just_inside_window_but_not_just_outside() {
        let epsilon = 1e-3;

        let mut inside = buffer();
        inside.advance(1.0);
        inside.push(CombatAction::Dodge, None);
        inside.advance(1.0 + 0.15 - epsilon);
        assert!(inside.try_consume(CombatAction::Dodge).is_some());

        let mut outside = buffer();
        outside.advance(1.0);
        outside.push(CombatAction::Dodge, None);
        outside.advance(1.0 + 0.15 + epsilon);
        assert!(!outside.has_buffered(CombatAction::Dodge));
        assert!(outside.try_consume(CombatAction::Dodge).is_none());
        assert!(outside.is_empty());
    }

    #[test]
    fn consume_returns_first_match_once() {
        let mut buffer = buffer();
        buffer.push(CombatAction::LightAttack, None);
        buffer.push(CombatAction::Dodge, Some(Vec3::X));
        buffer.push(CombatAction::Dodge, Some(Vec3::Z));

        let dodge = buffer.try_consume(CombatAction::Dodge).unwrap();
        assert_eq!(dodge.direction, Some(Vec3::X));
        assert!(dodge.consumed);
        assert_eq!(buffer.len(), 2);

        let dodge = buffer.try_consume(CombatAction::Dodge).unwrap();
        assert_eq!(dodge.direction, Some(Vec3::Z));
        assert!(buffer.try_consume(CombatAction::Dodge).is_none());
        assert!(buffer.has_buffered(CombatAction::LightAttack));
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buffer = buffer();
        buffer.push(CombatAction::Parry, None);
        for _ in 0..5 {
            buffer.push(CombatAction::LightAttack, None);
        }
        assert_eq!(buffer.len(), 5);
        assert!(!buffer.has_buffered(CombatAction::Parry));
    }

    #[test]
    fn consume_any_takes_oldest_valid() {
        let mut buffer = buffer();
        buffer.push(CombatAction::Block, None);
        buffer.advance(0.1);
        buffer.push(CombatAction::HeavyAttack, None);
        buffer.advance(0.2);

        // Block expired at 0.15; heavy is still valid.
        let entry = buffer.try_consume_any().unwrap();
        assert_eq!(entry.action, CombatAction::HeavyAttack);
        assert!(buffer.try_consume_any().is_none());
    }

    #[test]
    fn has_buffered_does_not_mutate() {
        let mut buffer = buffer();
        buffer.push(CombatAction::Parry, None);
        assert!(buffer.has_buffered(CombatAction::Parry));
        assert!(buffer.has_buffered(CombatAction::Parry));
        assert_eq!(buffer.len(), 1);
    }
}
