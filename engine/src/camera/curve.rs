//! Easing curves
//!
//! Map normalized transition progress `t` in `[0, 1]` to an interpolation
//! factor. Used by [`CameraTransition`](super::CameraTransition).

use serde::{Deserialize, Serialize};

/// Shapes transition progress.
pub trait EasingCurve {
    /// Interpolation factor for progress `t` (clamped to `[0, 1]`).
    fn sample(&self, t: f32) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Linear;

impl EasingCurve for Linear {
    fn sample(&self, t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }
}

/// Hermite smoothstep, `3t² - 2t³`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothStep;

impl EasingCurve for SmoothStep {
    fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Quadratic ease-in-out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EaseInOut;

impl EasingCurve for EaseInOut {
    fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            2.0 * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear curve through authored keys.
///
/// Keys are kept sorted by time. Before the first key the first value holds,
/// after the last key the last value holds. An empty curve behaves linearly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyedCurve {
    keys: Vec<CurveKey>,
}

impl KeyedCurve {
    pub fn new(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut curve = Self::default();
        for (time, value) in keys {
            curve.add_key(time, value);
        }
        curve
    }

    pub fn add_key(&mut self, time: f32, value: f32) {
        let at = self.keys.partition_point(|k| k.time <= time);
        self.keys.insert(at, CurveKey { time, value });
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

impl EasingCurve for KeyedCurve {
    fn sample(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return Linear.sample(t);
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        let upper = self.keys.partition_point(|k| k.time <= t);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * (t - a.time) / span
    }
}

/// Serializable choice of curve, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    EaseInOut,
    Keyed(KeyedCurve),
}

impl EasingCurve for Easing {
    fn sample(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => Linear.sample(t),
            Easing::SmoothStep => SmoothStep.sample(t),
            Easing::EaseInOut => EaseInOut.sample(t),
            Easing::Keyed(curve) => curve.sample(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_curves_hit_endpoints() {
        for curve in [Easing::Linear, Easing::SmoothStep, Easing::EaseInOut] {
            assert_relative_eq!(curve.sample(0.0), 0.0);
            assert_relative_eq!(curve.sample(1.0), 1.0);
            assert_relative_eq!(curve.sample(0.5), 0.5, epsilon = 1e-6);
            assert_relative_eq!(curve.sample(2.0), 1.0);
        }
    }

    #[test]
    fn test_smoothstep_is_slow_at_the_ends() {
        assert!(SmoothStep.sample(0.1) < Linear.sample(0.1));
        assert!(SmoothStep.sample(0.9) > Linear.sample(0.9));
    }

    #[test]
    fn test_keyed_curve_interpolates_between_keys() {
        let curve = KeyedCurve::new([(1.0, 1.0), (0.0, 0.0), (0.5, 0.8)]);
        assert_eq!(curve.keys()[1].time, 0.5);
        assert_relative_eq!(curve.sample(0.25), 0.4, epsilon = 1e-6);
        assert_relative_eq!(curve.sample(0.75), 0.9, epsilon = 1e-6);
        assert_relative_eq!(curve.sample(-1.0), 0.0);
    }

    #[test]
    fn test_empty_keyed_curve_is_linear() {
        assert_relative_eq!(KeyedCurve::default().sample(0.3), 0.3);
    }

    #[test]
    fn test_easing_deserializes_keyed() {
        let json = r#"{"kind":"keyed","keys":[{"time":0.0,"value":0.0},{"time":1.0,"value":1.0}]}"#;
        let easing: Easing = serde_json::from_str(json).unwrap();
        assert_relative_eq!(easing.sample(0.5), 0.5);
    }
}
