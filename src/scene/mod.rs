//! Scene hosting.
//!
//! A [`Scene`] is a self-contained animated presentation. The [`SceneHost`] owns
//! every registered scene, attaches one at a time to its slot, and lays the stage
//! out for the current orientation.
//!
//! # Example
//!
//! ```ignore
//! use tableau::scene::SceneHost;
//! use tableau::scenes::{FlamesScene, ShuffleScene};
//!
//! let mut host = SceneHost::new(Vec2::new(1280.0, 720.0));
//! host.register("shuffle", "Ace of Shadows", Box::new(ShuffleScene::new()));
//! host.register("flames", "Phoenix Flame", Box::new(FlamesScene::new()));
//! host.switch_to(&mut sprites, "shuffle");
//!
//! // every frame
//! host.update(&mut sprites, dt);
//! host.draw(&mut canvas);
//! ```

mod background;
mod buttons;
mod host;
mod layout;
pub mod scene;

pub use background::Background;
pub use buttons::{Button, ButtonBar};
pub use host::{SceneHost, SwitchOutcome};
pub use layout::{Letterbox, stage_size};
pub use scene::{Creation, Scene, SceneContext, SceneId};
