//! Application configuration and the shared layout constants.

use std::path::PathBuf;

use glam::Vec2;

use crate::orientation::{Orientation, Resolution};

/// Stage size while the viewport is wider than tall.
pub const LANDSCAPE_RESOLUTION: Resolution = Resolution::new(1280.0, 720.0);

/// Stage size while the viewport is taller than wide.
pub const PORTRAIT_RESOLUTION: Resolution = Resolution::new(720.0, 1280.0);

/// Number of cards in the shuffle deck.
pub const CARD_COUNT: usize = 144;

/// Clear colour behind the background sprite.
pub const STAGE_CLEAR_COLOR: u32 = 0x1e1e37;

/// Where the dialogue script is fetched from.
pub const DIALOGUE_URL: &str =
    "https://private-624120-softgamesassignment.apiary-mock.com/v2/magicwords";

/// `{name}` tokens recognised in dialogue text and the symbol each one becomes.
pub const EMOJI_TABLE: &[(&str, &str)] = &[
    ("sad", "\u{1F61F}"),
    ("intrigued", "\u{1F9D0}"),
    ("neutral", "\u{1F610}"),
    ("satisfied", "\u{1F60A}"),
    ("laughing", "\u{1F604}"),
    ("win", "\u{1F973}"),
    ("affirmative", "\u{1F44D}"),
];

/// Asset aliases and their paths relative to the asset directory.
pub const ASSET_MANIFEST: &[(&str, &str)] = &[
    ("cards", "textures/cards.json"),
    ("background", "environment/background.jpg"),
    ("bubble", "environment/bubble.png"),
    ("logo", "environment/logo.png"),
];

/// Size of one scene button.
pub const BUTTON_SIZE: Vec2 = Vec2::new(100.0, 50.0);

/// Fill colour of the scene buttons.
pub const BUTTON_COLOR: u32 = 0x3498db;

/// Horizontal distance between neighbouring buttons.
pub const BUTTON_SPACING: f32 = 130.0;

/// Top-left corner of the first button for each orientation.
pub fn button_row_origin(orientation: Orientation) -> Vec2 {
    match orientation {
        Orientation::Landscape => Vec2::new(460.0, 30.0),
        Orientation::Portrait => Vec2::new(180.0, 30.0),
    }
}

/// Scene-container offsets applied in portrait to fit landscape-authored scenes
/// onto the 720-wide stage.
pub const SHUFFLE_PORTRAIT_OFFSET: Vec2 = Vec2::new(-280.0, 200.0);
pub const DIALOGUE_PORTRAIT_OFFSET: Vec2 = Vec2::new(-280.0, 300.0);
pub const FLAMES_PORTRAIT_OFFSET: Vec2 = Vec2::new(-280.0, 290.0);

/// Configuration for the application window and its external resources.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_dir: PathBuf,
    pub font_path: PathBuf,
    pub dialogue_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Tableau".to_string(),
            width: LANDSCAPE_RESOLUTION.width as u32,
            height: LANDSCAPE_RESOLUTION.height as u32,
            asset_dir: PathBuf::from("assets"),
            font_path: PathBuf::from("assets/fonts/Sniglet-Regular.ttf"),
            dialogue_url: DIALOGUE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TABLEAU_ASSETS`, `TABLEAU_FONT` and
    /// `TABLEAU_DIALOGUE_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("TABLEAU_ASSETS") {
            config.asset_dir = PathBuf::from(dir);
        }
        if let Ok(font) = std::env::var("TABLEAU_FONT") {
            config.font_path = PathBuf::from(font);
        }
        if let Ok(url) = std::env::var("TABLEAU_DIALOGUE_URL") {
            config.dialogue_url = url;
        }
        config
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    pub fn dialogue_url(mut self, url: impl Into<String>) -> Self {
        self.dialogue_url = url.into();
        self
    }
}
