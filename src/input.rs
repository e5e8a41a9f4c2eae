use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// Collects pointer-down events between frames.
///
/// Mouse presses and touch starts are both reported as a single pointer-down at a
/// physical window position; the host maps them onto the stage.
#[derive(Debug, Default)]
pub struct Input {
    cursor: Vec2,
    pointer_downs: Vec<Vec2>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::Touch(touch) => {
                let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch(touch.phase, location);
            }
            _ => {}
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = position;
    }

    fn mouse_input(&mut self, state: ElementState, button: MouseButton) {
        if state == ElementState::Pressed && button == MouseButton::Left {
            self.pointer_downs.push(self.cursor);
        }
    }

    fn touch(&mut self, phase: TouchPhase, location: Vec2) {
        self.cursor = location;
        if phase == TouchPhase::Started {
            self.pointer_downs.push(location);
        }
    }

    /// Current cursor position in window coordinates.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Pointer-downs since the last call, oldest first.
    pub fn take_pointer_downs(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.pointer_downs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_press_reports_the_cursor_position() {
        let mut input = Input::new();
        input.cursor_moved(Vec2::new(10.0, 20.0));
        input.mouse_input(ElementState::Pressed, MouseButton::Left);
        input.mouse_input(ElementState::Released, MouseButton::Left);
        input.mouse_input(ElementState::Pressed, MouseButton::Right);
        assert_eq!(input.take_pointer_downs(), vec![Vec2::new(10.0, 20.0)]);
        assert!(input.take_pointer_downs().is_empty());
    }

    #[test]
    fn touch_start_is_a_pointer_down() {
        let mut input = Input::new();
        input.touch(TouchPhase::Started, Vec2::new(5.0, 6.0));
        input.touch(TouchPhase::Moved, Vec2::new(7.0, 8.0));
        input.touch(TouchPhase::Ended, Vec2::new(7.0, 8.0));
        assert_eq!(input.take_pointer_downs(), vec![Vec2::new(5.0, 6.0)]);
        assert_eq!(input.cursor(), Vec2::new(7.0, 8.0));
    }
}
