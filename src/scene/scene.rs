//! Scene capability surface and identifier types.

use glam::Vec2;

use crate::assets::SpriteStore;
use crate::canvas::Canvas;
use crate::orientation::{self, Orientation};

/// Unique identifier for a scene.
///
/// Scene IDs are strings that uniquely identify scenes within a
/// [`SceneHost`](super::SceneHost). They're used when switching between scenes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(pub(crate) String);

impl SceneId {
    /// Create a new scene ID from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the scene ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What a scene may touch while it runs: the shared sprite registry and the
/// current viewport size in physical pixels.
pub struct SceneContext<'a> {
    pub sprites: &'a mut SpriteStore,
    pub viewport: Vec2,
}

impl SceneContext<'_> {
    /// Orientation of the current viewport, recomputed on every call.
    pub fn orientation(&self) -> Orientation {
        orientation::resolve(self.viewport.x, self.viewport.y)
    }
}

/// Result of [`Scene::create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Creation {
    /// The scene is usable right away.
    Ready,
    /// The scene finishes creating in the background; the host polls
    /// [`Scene::is_ready`] from its update loop.
    Pending,
}

/// A self-contained animated presentation attached to the host's scene slot.
///
/// Every capability has a no-op default, so a scene implements only what it needs.
/// The host calls `create` each time the scene is attached and `dispose` each time
/// it is detached; `dispose` must cancel every timer and animation the scene owns
/// before returning, and `create` must fully re-initialise the scene.
pub trait Scene {
    /// Start the scene. Called after it is attached to the slot.
    fn create(&mut self, _ctx: &mut SceneContext) -> Creation {
        Creation::Ready
    }

    /// Whether a [`Creation::Pending`] creation has completed.
    fn is_ready(&self) -> bool {
        true
    }

    /// Release transient resources. Called before the scene is detached.
    fn dispose(&mut self) {}

    /// Re-lay-out for a new orientation. In-flight animations keep running.
    fn on_resize(&mut self, _orientation: Orientation) {}

    /// A pointer went down at `point`, in stage coordinates.
    fn pointer_down(&mut self, _ctx: &mut SceneContext, _point: Vec2) {}

    /// Advance the scene's own clock by `dt` seconds.
    fn update(&mut self, _ctx: &mut SceneContext, _dt: f32) {}

    /// Describe the scene for this frame.
    fn draw(&self, _canvas: &mut Canvas) {}
}
