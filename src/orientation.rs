//! Viewport orientation and the logical stage resolution tied to it.

use crate::config::{LANDSCAPE_RESOLUTION, PORTRAIT_RESOLUTION};

/// Which way the viewport is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Logical stage size in stage units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

impl Resolution {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Orientation {
    /// The logical resolution the stage is laid out in for this orientation.
    pub fn resolution(self) -> Resolution {
        match self {
            Orientation::Landscape => LANDSCAPE_RESOLUTION,
            Orientation::Portrait => PORTRAIT_RESOLUTION,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
        }
    }
}

/// Resolve the orientation of a viewport.
///
/// Landscape iff the viewport is strictly wider than it is tall; a square viewport
/// counts as portrait. Callers recompute this on every resize instead of caching it.
pub fn resolve(viewport_width: f32, viewport_height: f32) -> Orientation {
    if viewport_width > viewport_height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wider_than_tall_is_landscape() {
        assert_eq!(resolve(1920.0, 1080.0), Orientation::Landscape);
        assert_eq!(resolve(1080.0, 1920.0), Orientation::Portrait);
    }

    #[test]
    fn square_is_portrait() {
        assert_eq!(resolve(800.0, 800.0), Orientation::Portrait);
    }

    #[test]
    fn resolution_follows_orientation() {
        assert_eq!(Orientation::Landscape.resolution(), Resolution::new(1280.0, 720.0));
        assert_eq!(Orientation::Portrait.resolution(), Resolution::new(720.0, 1280.0));
    }
}
