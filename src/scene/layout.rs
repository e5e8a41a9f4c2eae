//! Letterboxing of the logical stage inside the physical viewport.

use glam::Vec2;

use crate::orientation::{self, Orientation};

/// Placement of the stage inside a viewport of a given physical size.
///
/// The stage keeps the aspect ratio of the orientation's logical resolution and is
/// scaled uniformly to fit, leaving equal margins on the two slack sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub orientation: Orientation,
    pub scale: f32,
    /// Displayed stage size in physical pixels, floored to whole pixels.
    pub size: Vec2,
    /// Physical offset of the stage's top-left corner.
    pub margin: Vec2,
}

impl Letterbox {
    pub fn fit(viewport: Vec2) -> Self {
        let orientation = orientation::resolve(viewport.x, viewport.y);
        let stage = stage_size(orientation);
        let scale = (viewport.x / stage.x).min(viewport.y / stage.y).max(0.0);
        let size = (stage * scale).floor();
        Self {
            orientation,
            scale,
            size,
            margin: (viewport - size) / 2.0,
        }
    }

    /// Logical stage size for this letterbox's orientation.
    pub fn stage(&self) -> Vec2 {
        stage_size(self.orientation)
    }

    /// Map a physical viewport position to stage coordinates.
    ///
    /// Returns `None` for points in the margins.
    pub fn to_stage(&self, physical: Vec2) -> Option<Vec2> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        let local = physical - self.margin;
        if local.x < 0.0 || local.y < 0.0 || local.x > self.size.x || local.y > self.size.y {
            return None;
        }
        Some(local * (self.stage() / self.size))
    }
}

pub fn stage_size(orientation: Orientation) -> Vec2 {
    let resolution = orientation.resolution();
    Vec2::new(resolution.width, resolution.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_has_no_margin() {
        let letterbox = Letterbox::fit(Vec2::new(1280.0, 720.0));
        assert_eq!(letterbox.orientation, Orientation::Landscape);
        assert_eq!(letterbox.scale, 1.0);
        assert_eq!(letterbox.size, Vec2::new(1280.0, 720.0));
        assert_eq!(letterbox.margin, Vec2::ZERO);
    }

    #[test]
    fn wide_viewport_gets_side_margins() {
        let letterbox = Letterbox::fit(Vec2::new(2000.0, 720.0));
        assert_eq!(letterbox.size, Vec2::new(1280.0, 720.0));
        assert_eq!(letterbox.margin, Vec2::new(360.0, 0.0));
    }

    #[test]
    fn portrait_uses_portrait_stage() {
        let letterbox = Letterbox::fit(Vec2::new(360.0, 1000.0));
        assert_eq!(letterbox.orientation, Orientation::Portrait);
        assert_eq!(letterbox.scale, 0.5);
        assert_eq!(letterbox.size, Vec2::new(360.0, 640.0));
        assert_eq!(letterbox.margin, Vec2::new(0.0, 180.0));
    }

    #[test]
    fn displayed_size_is_floored() {
        let letterbox = Letterbox::fit(Vec2::new(1000.0, 999.0));
        let expected = (Vec2::new(1280.0, 720.0) * (1000.0 / 1280.0)).floor();
        assert_eq!(letterbox.size, expected);
        assert_eq!(letterbox.margin.x, 0.0);
        assert!(letterbox.margin.y > 0.0);
    }

    #[test]
    fn square_viewport_is_portrait() {
        assert_eq!(
            Letterbox::fit(Vec2::new(800.0, 800.0)).orientation,
            Orientation::Portrait
        );
    }

    #[test]
    fn physical_points_map_to_stage() {
        let letterbox = Letterbox::fit(Vec2::new(2560.0, 1440.0));
        assert_eq!(
            letterbox.to_stage(Vec2::new(1280.0, 720.0)),
            Some(Vec2::new(640.0, 360.0))
        );
        let boxed = Letterbox::fit(Vec2::new(2000.0, 720.0));
        assert_eq!(boxed.to_stage(Vec2::new(100.0, 100.0)), None);
        assert_eq!(
            boxed.to_stage(Vec2::new(360.0, 0.0)),
            Some(Vec2::ZERO)
        );
    }

    #[test]
    fn unscaled_points_map_exactly() {
        let letterbox = Letterbox::fit(Vec2::new(1280.0, 720.0));
        for point in [
            Vec2::new(640.0, 400.0),
            Vec2::new(1.0, 719.0),
            Vec2::new(333.0, 77.0),
        ] {
            assert_eq!(letterbox.to_stage(point), Some(point));
        }
        let doubled = Letterbox::fit(Vec2::new(2560.0, 1440.0));
        assert_eq!(
            doubled.to_stage(Vec2::new(1280.0, 800.0)),
            Some(Vec2::new(640.0, 400.0))
        );
    }

    #[test]
    fn empty_viewport_maps_nothing() {
        let letterbox = Letterbox::fit(Vec2::ZERO);
        assert_eq!(letterbox.to_stage(Vec2::ZERO), None);
    }
}
