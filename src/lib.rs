//! # Tableau
//!
//! A small interactive demo host: three scenes behind a row of buttons, drawn
//! on a fixed logical stage that is letterboxed into the window.
//!
//! - **Ace of Shadows**: a deck of cards shuffled from one stack to another.
//! - **Magic Words**: a dialogue loaded over HTTP, with avatars and inline emoji.
//! - **Phoenix Flame**: a particle fire.
//!
//! ```no_run
//! fn main() -> tableau::Result<()> {
//!     tableau::run(tableau::AppConfig::from_env())
//! }
//! ```
//!
//! Scenes never touch the GPU. They draw into a [`Canvas`], which the renderer
//! tessellates once per frame, so everything except the window shell runs in tests.

pub mod anim;
mod app;
pub mod assets;
pub mod canvas;
pub mod config;
pub mod draw2d;
mod error;
mod gpu;
mod input;
pub mod net;
pub mod orientation;
pub mod scene;
pub mod scenes;
mod texture;

pub use app::{FpsCounter, run};
pub use assets::{Fonts, SpriteId, SpriteStore};
pub use canvas::{Canvas, Color, Rect, TextStyle};
pub use config::AppConfig;
pub use error::{Result, TableauError};
pub use gpu::GpuContext;
pub use input::Input;
pub use orientation::Orientation;
pub use scene::{Scene, SceneContext, SceneHost};

pub use glam::Vec2;
