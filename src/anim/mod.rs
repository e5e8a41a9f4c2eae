//! Time-driven animation primitives.
//!
//! Scenes never block on an animation. They own [`Tween`]s for values in flight and a
//! [`Timeline`] for delayed or repeating work, and advance both from their `update`
//! hook with the frame delta. Dropping a tween or cancelling a timeline task is the
//! whole cancellation story: nothing is ever scheduled outside the owning scene.

mod easing;
mod timeline;
mod tween;

pub use easing::Easing;
pub use timeline::{Fired, TaskId, Timeline};
pub use tween::{Lerp, Tween, TweenState};
