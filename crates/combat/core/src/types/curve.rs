/// Normalized easing curve mapping `t ∈ [0, 1]` to progress `∈ [0, 1]`.
///
/// Dodge and knockback displacement per tick is
/// `distance * (curve(t) - curve(t_prev))`, so the total travelled distance
/// over a full run is always exactly `distance`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Curve {
    Linear,
    /// Fast start, gentle stop. Feels like a committed roll.
    #[default]
    EaseOutQuad,
    EaseOutCubic,
    SmoothStep,
}

impl Curve {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Curve::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Progress gained between two normalized times.
    pub fn delta(&self, from: f32, to: f32) -> f32 {
        self.evaluate(to) - self.evaluate(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for curve in [
            Curve::Linear,
            Curve::EaseOutQuad,
            Curve::EaseOutCubic,
            Curve::SmoothStep,
        ] {
            assert_eq!(curve.evaluate(0.0), 0.0);
            assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6);
            assert_eq!(curve.evaluate(2.0), curve.evaluate(1.0));
        }
    }

    #[test]
    fn deltas_sum_to_full_progress() {
        let curve = Curve::EaseOutQuad;
        let steps = 13;
        let total: f32 = (0..steps)
            .map(|i| curve.delta(i as f32 / steps as f32, (i + 1) as f32 / steps as f32))
            .sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ease_out_front_loads_progress() {
        assert!(Curve::EaseOutQuad.evaluate(0.5) > Curve::Linear.evaluate(0.5));
    }
}
