//! Stage backdrop drawn beneath every scene.

use std::f32::consts::FRAC_PI_2;

use glam::{Affine2, Vec2};

use super::layout::stage_size;
use crate::assets::SpriteId;
use crate::canvas::{Canvas, Color};
use crate::config::{LANDSCAPE_RESOLUTION, STAGE_CLEAR_COLOR};
use crate::orientation::Orientation;

/// Fills the stage with the clear colour and the background picture.
///
/// The picture is authored for landscape; in portrait it is turned a quarter and
/// re-centred so it still covers the tall stage.
#[derive(Debug)]
pub struct Background {
    sprite: Option<SpriteId>,
    orientation: Orientation,
}

impl Background {
    pub fn new(sprite: Option<SpriteId>) -> Self {
        Self {
            sprite,
            orientation: Orientation::Landscape,
        }
    }

    pub fn on_resize(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Placement of the picture's center on the stage.
    pub fn placement(&self) -> Affine2 {
        let (angle, center) = match self.orientation {
            Orientation::Landscape => (0.0, Vec2::new(640.0, 360.0)),
            Orientation::Portrait => (FRAC_PI_2, Vec2::new(360.0, 640.0)),
        };
        Affine2::from_angle_translation(angle, center)
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let stage = stage_size(self.orientation);
        canvas.rect(0.0, 0.0, stage.x, stage.y, Color::hex(STAGE_CLEAR_COLOR));
        if let Some(sprite) = self.sprite {
            let size = Vec2::new(LANDSCAPE_RESOLUTION.width, LANDSCAPE_RESOLUTION.height);
            canvas.sprite(sprite, self.placement(), Some(size), Color::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_turns_the_picture_a_quarter() {
        let mut background = Background::new(None);
        assert_eq!(background.placement().translation, Vec2::new(640.0, 360.0));

        background.on_resize(Orientation::Portrait);
        let placement = background.placement();
        assert_eq!(placement.translation, Vec2::new(360.0, 640.0));
        // The landscape width now runs down the stage.
        let corner = placement.transform_vector2(Vec2::new(640.0, 0.0));
        assert!(corner.x.abs() < 1e-3);
        assert!((corner.y - 640.0).abs() < 1e-3);
    }

    #[test]
    fn draws_clear_colour_even_without_picture() {
        let mut canvas = Canvas::new();
        Background::new(None).draw(&mut canvas);
        assert_eq!(canvas.commands().len(), 1);
    }
}
