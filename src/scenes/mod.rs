//! The three demo scenes hosted by [`SceneHost`](crate::scene::SceneHost).

pub mod dialogue;
pub mod flames;
pub mod shuffle;

pub use dialogue::DialogueScene;
pub use flames::FlamesScene;
pub use shuffle::ShuffleScene;
