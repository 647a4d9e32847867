/// Global hit-feedback pulse, tracked on the real clock.
///
/// Overlapping requests extend the pulse instead of restarting it:
/// `until = max(until, now + duration)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hitstop {
    until: f64,
}

impl Hitstop {
    /// Requests a pulse starting at `now`. Returns the resulting end time.
    pub fn request(&mut self, now: f64, duration: f32) -> f64 {
        let end = now + duration.max(0.0) as f64;
        if end > self.until {
            self.until = end;
        }
        self.until
    }

    pub fn until(&self) -> f64 {
        self.until
    }

    pub fn is_active(&self, now: f64) -> bool {
        now < self.until
    }

    pub fn remaining(&self, now: f64) -> f32 {
        (self.until - now).max(0.0) as f32
    }

    /// Simulation time scale: zero while the pulse runs.
    pub fn time_scale(&self, now: f64) -> f32 {
        if self.is_active(now) { 0.0 } else { 1.0 }
    }

    pub fn clear(&mut self) {
        self.until = 0.0;
    }
}
