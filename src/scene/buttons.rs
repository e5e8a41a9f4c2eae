//! The row of scene-switch buttons along the top of the stage.

use glam::Vec2;

use super::SceneId;
use crate::canvas::{Canvas, Color, Rect, TextStyle};
use crate::config::{BUTTON_COLOR, BUTTON_SIZE, BUTTON_SPACING, button_row_origin};
use crate::orientation::Orientation;

const LABEL_SIZE: f32 = 13.0;
const WAITING_ALPHA: f32 = 0.5;

/// A labelled button that requests a switch to `target`.
#[derive(Clone, Debug)]
pub struct Button {
    pub label: String,
    pub target: SceneId,
    pub rect: Rect,
}

/// Horizontal button row, re-laid-out for each orientation.
#[derive(Clone, Debug)]
pub struct ButtonBar {
    buttons: Vec<Button>,
    orientation: Orientation,
}

impl ButtonBar {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
            orientation: Orientation::Landscape,
        }
    }

    /// Append a button to the end of the row.
    pub fn push(&mut self, label: impl Into<String>, target: impl Into<SceneId>) {
        self.buttons.push(Button {
            label: label.into(),
            target: target.into(),
            rect: Rect::new(0.0, 0.0, BUTTON_SIZE.x, BUTTON_SIZE.y),
        });
        self.layout(self.orientation);
    }

    pub fn layout(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        let origin = button_row_origin(orientation);
        for (index, button) in self.buttons.iter_mut().enumerate() {
            button.rect.x = origin.x + index as f32 * BUTTON_SPACING;
            button.rect.y = origin.y;
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Target of the button under `point`, if any.
    pub fn hit(&self, point: Vec2) -> Option<&SceneId> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(point))
            .map(|button| &button.target)
    }

    /// Draw the row. The button for `waiting`, a switch still held back, is dimmed.
    pub fn draw(&self, canvas: &mut Canvas, waiting: Option<&SceneId>) {
        for button in &self.buttons {
            let rect = button.rect;
            let alpha = if waiting == Some(&button.target) {
                WAITING_ALPHA
            } else {
                1.0
            };
            canvas.rect(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                Color::hex(BUTTON_COLOR).with_alpha(alpha),
            );
            canvas.text(
                button.label.as_str(),
                rect.center(),
                TextStyle::new(LABEL_SIZE, Color::WHITE),
            );
        }
    }
}

impl Default for ButtonBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> ButtonBar {
        let mut bar = ButtonBar::new();
        bar.push("Ace of Shadows", "shuffle");
        bar.push("Magic Words", "dialogue");
        bar.push("Phoenix Flame", "flames");
        bar
    }

    #[test]
    fn landscape_row_is_evenly_spaced() {
        let bar = bar();
        let xs: Vec<f32> = bar.buttons().iter().map(|b| b.rect.x).collect();
        assert_eq!(xs, vec![460.0, 590.0, 720.0]);
        assert!(bar.buttons().iter().all(|b| b.rect.y == 30.0));
    }

    #[test]
    fn portrait_row_is_centred() {
        let mut bar = bar();
        bar.layout(Orientation::Portrait);
        let first = bar.buttons()[0].rect;
        let last = bar.buttons()[2].rect;
        assert_eq!(first.x, 720.0 - (last.x + last.width));
    }

    #[test]
    fn hit_finds_the_button_under_the_point() {
        let bar = bar();
        assert_eq!(
            bar.hit(Vec2::new(640.0, 55.0)).map(SceneId::as_str),
            Some("dialogue")
        );
        assert_eq!(bar.hit(Vec2::new(640.0, 300.0)), None);
        assert_eq!(bar.hit(Vec2::new(575.0, 55.0)), None);
    }
}
