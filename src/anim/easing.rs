//! Easing curves for tweens.

/// Easing functions controlling the acceleration curve of a tween.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    EaseInOut,
    /// Pull back past the start before accelerating to the end.
    /// The parameter is the overshoot strength.
    BackIn(f32),
    /// Overshoot the end, then settle back onto it.
    BackOut(f32),
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    ///
    /// The input is clamped; the back curves may return values outside `[0, 1]`
    /// between the endpoints but always map 0 to 0 and 1 to 1.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::BackIn(s) => t * t * ((s + 1.0) * t - s),
            Easing::BackOut(s) => {
                let u = t - 1.0;
                u * u * ((s + 1.0) * u + s) + 1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::BackIn(2.0),
            Easing::BackOut(2.0),
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn back_curves_overshoot() {
        assert!(Easing::BackIn(2.0).apply(0.2) < 0.0);
        assert!(Easing::BackOut(2.0).apply(0.8) > 1.0);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::EaseOut.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(2.0), 1.0);
    }
}
