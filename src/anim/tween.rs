//! Interpolated values over a fixed duration.

use glam::Vec2;

use super::Easing;

/// Values a [`Tween`] can interpolate.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::lerp(self, to, t)
    }
}

/// Whether a tween still has time left after an advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenState {
    Running,
    Finished,
}

/// A value animated from `from` to `to` over `duration` seconds.
#[derive(Clone, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    overrun: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            overrun: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Set the easing function for this tween.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Move the tween forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> TweenState {
        let total = self.elapsed + dt.max(0.0);
        self.overrun = (total - self.duration).max(0.0);
        self.elapsed = total.min(self.duration);
        self.state()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Part of the last advance that fell past the end.
    pub fn overrun(&self) -> f32 {
        self.overrun
    }

    pub fn state(&self) -> TweenState {
        if self.elapsed >= self.duration {
            TweenState::Finished
        } else {
            TweenState::Running
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TweenState::Finished
    }

    /// Linear progress in `[0, 1]`, before easing.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// Current interpolated value. Exactly `to` once finished.
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }
}
