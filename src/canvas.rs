//! CPU-side display list.
//!
//! Scenes describe what they look like by writing into a [`Canvas`] each frame. The
//! canvas knows nothing about the GPU; [`Draw2d`](crate::draw2d::Draw2d) turns it into
//! vertex batches. Keeping the two apart lets every scene run headless.

use glam::{Affine2, Vec2};

use crate::assets::SpriteId;

/// A rectangle in stage coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
}

/// Horizontal alignment of wrapped text lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Center,
}

/// How a text block is rendered. Text is always anchored at its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub align: Align,
    pub wrap_width: Option<f32>,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            align: Align::Center,
            wrap_width: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn wrap(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }
}

/// One recorded draw call. Transforms map local coordinates to stage coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Axis-aligned in local space; `transform` places it on the stage.
    Quad {
        rect: Rect,
        transform: Affine2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        transform: Affine2,
        color: Color,
    },
    /// Centered on the transform origin, `size` in local units.
    Sprite {
        sprite: SpriteId,
        size: Option<Vec2>,
        transform: Affine2,
        tint: Color,
    },
    /// Centered on the transform origin.
    Text {
        text: String,
        transform: Affine2,
        style: TextStyle,
    },
}

/// Immediate-mode display list with a transform stack.
#[derive(Debug, Default)]
pub struct Canvas {
    commands: Vec<DrawCmd>,
    stack: Vec<Affine2>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all draw calls for the new frame.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// The transform currently applied to new draw calls.
    pub fn current(&self) -> Affine2 {
        self.stack.last().copied().unwrap_or(Affine2::IDENTITY)
    }

    /// Compose `transform` onto the stack until the matching [`pop`](Self::pop).
    pub fn push(&mut self, transform: Affine2) {
        let combined = self.current() * transform;
        self.stack.push(combined);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Run `draw` with `transform` pushed.
    pub fn with_transform(&mut self, transform: Affine2, draw: impl FnOnce(&mut Canvas)) {
        self.push(transform);
        draw(self);
        self.pop();
    }

    /// Draw a colored rectangle.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCmd::Quad {
            rect: Rect::new(x, y, w, h),
            transform: self.current(),
            color,
        });
    }

    /// Draw a filled circle.
    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            transform: self.current(),
            color,
        });
    }

    /// Draw a sprite centered on `local`. `size` of `None` uses the sprite's own size.
    pub fn sprite(&mut self, sprite: SpriteId, local: Affine2, size: Option<Vec2>, tint: Color) {
        self.commands.push(DrawCmd::Sprite {
            sprite,
            size,
            transform: self.current() * local,
            tint,
        });
    }

    /// Draw a text block centered on `at`.
    pub fn text(&mut self, text: impl Into<String>, at: Vec2, style: TextStyle) {
        self.commands.push(DrawCmd::Text {
            text: text.into(),
            transform: self.current() * Affine2::from_translation(at),
            style,
        });
    }
}
