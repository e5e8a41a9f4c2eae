//! Looping character dialogue.
//!
//! The script is fetched on a worker while the scene reports itself pending. Once
//! loaded, the first tap shows the opening line and every further tap collapses the
//! speech bubble, swaps in the next line, and pops it back open.

mod script;

pub use script::{
    Avatar, DialogueEntry, DialogueError, Script, ScriptCursor, Side, load_script,
    substitute_tokens,
};

use std::sync::Arc;

use glam::{Affine2, Vec2};

use crate::anim::{Easing, Tween};
use crate::assets::{SpriteId, SpriteStore};
use crate::canvas::{Align, Canvas, Color, TextStyle};
use crate::config::{DIALOGUE_PORTRAIT_OFFSET, EMOJI_TABLE};
use crate::net::{Fetch, Job, Poll};
use crate::orientation::Orientation;
use crate::scene::{Creation, Scene, SceneContext};

const BUBBLE_ALIAS: &str = "bubble";
const BUBBLE_POS: Vec2 = Vec2::new(640.0, 240.0);

const AVATAR_LEFT_X: f32 = 520.0;
const AVATAR_RIGHT_X: f32 = 760.0;
const AVATAR_Y: f32 = 390.0;

/// Each half of the bubble swap.
const HALF_SWAP_SECS: f32 = 0.25;
const OVERSHOOT: f32 = 2.0;

const LINE_SIZE: f32 = 27.0;
const LINE_WRAP: f32 = 300.0;
const PROMPT_SIZE: f32 = 30.0;
const PROMPT_WRAP: f32 = 320.0;

pub const START_PROMPT: &str = "Click to start the dialogue!";
pub const NO_DIALOGUE: &str = "No dialogue found!";
pub const LOAD_FAILED: &str = "Failed to load chat data.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialoguePhase {
    /// The script request is in flight.
    Loading,
    AwaitingStart,
    Presenting,
    /// The bubble is collapsing or reopening; taps are ignored.
    Transitioning,
    /// Loading failed or the script was empty. Terminal until re-created.
    Unavailable,
}

enum BubbleSwap {
    Collapsing(Tween<f32>),
    Revealing(Tween<f32>),
}

pub struct DialogueScene {
    fetch: Arc<dyn Fetch>,
    url: String,
    load: Option<Job<Result<Script, DialogueError>>>,
    script: Script,
    cursor: Option<ScriptCursor>,
    phase: DialoguePhase,
    message: Option<&'static str>,
    line: String,
    bubble: Option<SpriteId>,
    bubble_scale: f32,
    swap: Option<BubbleSwap>,
    avatar: Option<SpriteId>,
    /// Requested avatar that has not finished loading yet.
    avatar_pending: Option<SpriteId>,
    avatar_side: Side,
    offset: Vec2,
}

impl DialogueScene {
    pub fn new(fetch: Arc<dyn Fetch>, url: impl Into<String>) -> Self {
        Self {
            fetch,
            url: url.into(),
            load: None,
            script: Script::default(),
            cursor: None,
            phase: DialoguePhase::Loading,
            message: None,
            line: String::new(),
            bubble: None,
            bubble_scale: 1.0,
            swap: None,
            avatar: None,
            avatar_pending: None,
            avatar_side: Side::Left,
            offset: Vec2::ZERO,
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    /// Text shown in place of the dialogue: the start prompt or an error.
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// The dialogue line currently on display, with tokens substituted.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn cursor(&self) -> Option<ScriptCursor> {
        self.cursor
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn avatar(&self) -> Option<SpriteId> {
        self.avatar
    }

    pub fn avatar_side(&self) -> Side {
        self.avatar_side
    }

    pub fn bubble_scale(&self) -> f32 {
        self.bubble_scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    fn poll_load(&mut self) {
        let Some(job) = &self.load else {
            return;
        };
        let result = match job.poll() {
            Poll::Pending => return,
            Poll::Ready(result) => result,
            Poll::Abandoned => Err(DialogueError::Transport("loader exited".into())),
        };
        self.load = None;

        match result {
            Ok(script) => {
                self.cursor = script.cursor();
                self.script = script;
                if self.cursor.is_some() {
                    tracing::info!(lines = self.script.len(), "dialogue loaded");
                    self.phase = DialoguePhase::AwaitingStart;
                    self.message = Some(START_PROMPT);
                } else {
                    tracing::warn!(url = %self.url, "dialogue is empty");
                    self.phase = DialoguePhase::Unavailable;
                    self.message = Some(NO_DIALOGUE);
                }
            }
            Err(err) => {
                tracing::error!(url = %self.url, error = %err, "failed to load dialogue");
                self.phase = DialoguePhase::Unavailable;
                self.message = Some(LOAD_FAILED);
            }
        }
    }

    /// Put the entry under the cursor on screen and request its speaker's avatar.
    fn show_entry(&mut self, sprites: &mut SpriteStore) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let Some(entry) = self.script.entry(cursor.index()) else {
            return;
        };
        self.line = substitute_tokens(&entry.text, EMOJI_TABLE);

        // Speakers without an avatar keep whatever is already shown.
        if let Some(avatar) = self.script.avatar(&entry.speaker) {
            let sprite = sprites.request_url(&avatar.url);
            self.avatar_side = avatar.side;
            if sprites.is_ready(sprite) {
                self.avatar = Some(sprite);
                self.avatar_pending = None;
            } else {
                self.avatar_pending = Some(sprite);
            }
        }
    }

    fn settle_avatar(&mut self, sprites: &SpriteStore) {
        let Some(sprite) = self.avatar_pending else {
            return;
        };
        if sprites.is_ready(sprite) {
            self.avatar = Some(sprite);
            self.avatar_pending = None;
        } else if sprites.is_failed(sprite) {
            self.avatar_pending = None;
        }
    }

    fn advance_swap(&mut self, sprites: &mut SpriteStore, dt: f32) {
        let finished = match &mut self.swap {
            Some(BubbleSwap::Collapsing(tween)) | Some(BubbleSwap::Revealing(tween)) => {
                tween.advance(dt);
                self.bubble_scale = tween.value();
                tween.is_finished()
            }
            None => false,
        };
        if !finished {
            return;
        }
        match self.swap.take() {
            Some(BubbleSwap::Collapsing(_)) => {
                if let Some(cursor) = &mut self.cursor {
                    cursor.advance();
                }
                self.show_entry(sprites);
                let reveal = Tween::new(0.0, 1.0, HALF_SWAP_SECS).easing(Easing::BackOut(OVERSHOOT));
                self.swap = Some(BubbleSwap::Revealing(reveal));
            }
            Some(BubbleSwap::Revealing(_)) => {
                self.phase = DialoguePhase::Presenting;
            }
            None => {}
        }
    }

    fn avatar_position(&self) -> Vec2 {
        match self.avatar_side {
            Side::Left => Vec2::new(AVATAR_LEFT_X, AVATAR_Y),
            Side::Right => Vec2::new(AVATAR_RIGHT_X, AVATAR_Y),
        }
    }
}

impl Scene for DialogueScene {
    fn create(&mut self, ctx: &mut SceneContext) -> Creation {
        self.dispose();
        self.phase = DialoguePhase::Loading;
        self.bubble = ctx.sprites.get(BUBBLE_ALIAS);
        self.bubble_scale = 1.0;
        self.avatar_side = Side::Left;
        self.on_resize(ctx.orientation());

        let fetch = Arc::clone(&self.fetch);
        let url = self.url.clone();
        self.load = Some(Job::spawn(move || load_script(fetch.as_ref(), &url)));
        tracing::debug!(url = %self.url, "dialogue requested");
        Creation::Pending
    }

    fn is_ready(&self) -> bool {
        self.phase != DialoguePhase::Loading
    }

    fn dispose(&mut self) {
        // Dropping the job detaches the worker; its result is discarded.
        self.load = None;
        self.swap = None;
        self.script = Script::default();
        self.cursor = None;
        self.line.clear();
        self.message = None;
        self.avatar = None;
        self.avatar_pending = None;
        self.phase = DialoguePhase::Unavailable;
    }

    fn on_resize(&mut self, orientation: Orientation) {
        self.offset = match orientation {
            Orientation::Landscape => Vec2::ZERO,
            Orientation::Portrait => DIALOGUE_PORTRAIT_OFFSET,
        };
    }

    fn pointer_down(&mut self, ctx: &mut SceneContext, _point: Vec2) {
        match self.phase {
            DialoguePhase::AwaitingStart => {
                self.message = None;
                self.show_entry(ctx.sprites);
                self.phase = DialoguePhase::Presenting;
            }
            DialoguePhase::Presenting => {
                let collapse = Tween::new(1.0, 0.0, HALF_SWAP_SECS).easing(Easing::BackIn(OVERSHOOT));
                self.swap = Some(BubbleSwap::Collapsing(collapse));
                self.phase = DialoguePhase::Transitioning;
            }
            DialoguePhase::Loading | DialoguePhase::Transitioning | DialoguePhase::Unavailable => {}
        }
    }

    fn update(&mut self, ctx: &mut SceneContext, dt: f32) {
        if self.phase == DialoguePhase::Loading {
            self.poll_load();
            return;
        }
        self.settle_avatar(ctx.sprites);
        self.advance_swap(ctx.sprites, dt);
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.with_transform(Affine2::from_translation(self.offset), |canvas| {
            let bubble = Affine2::from_translation(BUBBLE_POS)
                * Affine2::from_scale(Vec2::splat(self.bubble_scale));
            canvas.with_transform(bubble, |canvas| {
                if let Some(sprite) = self.bubble {
                    canvas.sprite(sprite, Affine2::IDENTITY, None, Color::WHITE);
                }
                if !self.line.is_empty() {
                    canvas.text(
                        self.line.as_str(),
                        Vec2::ZERO,
                        TextStyle::new(LINE_SIZE, Color::BLACK)
                            .align(Align::Left)
                            .wrap(LINE_WRAP),
                    );
                }
                if let Some(message) = self.message {
                    canvas.text(
                        message,
                        Vec2::ZERO,
                        TextStyle::new(PROMPT_SIZE, Color::BLACK).wrap(PROMPT_WRAP),
                    );
                }
            });

            // The avatar sits in front of the bubble.
            if let Some(avatar) = self.avatar {
                canvas.sprite(
                    avatar,
                    Affine2::from_translation(self.avatar_position()),
                    None,
                    Color::WHITE,
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    use image::RgbaImage;

    use super::*;
    use crate::canvas::DrawCmd;
    use crate::net::testing::StubFetch;

    const URL: &str = "http://dialogue/script";

    const SCRIPT: &str = r#"{
        "dialogue": [
            { "name": "Sheldon", "text": "Hello {satisfied}" },
            { "name": "Penny", "text": "Hi {unknown}" },
            { "name": "Narrator", "text": "Meanwhile..." }
        ],
        "avatars": [
            { "name": "Sheldon", "url": "http://img/sheldon.png", "position": "left" },
            { "name": "Penny", "url": "http://img/penny.png", "position": "right" }
        ]
    }"#;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::new(4, 4)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn fixture(fetch: StubFetch) -> (DialogueScene, SpriteStore) {
        let fetch: Arc<dyn Fetch> = Arc::new(fetch);
        let mut store = SpriteStore::new(Arc::clone(&fetch));
        store.insert_image(BUBBLE_ALIAS, RgbaImage::new(8, 8));
        (DialogueScene::new(fetch, URL), store)
    }

    fn full_script() -> StubFetch {
        StubFetch::new()
            .body(URL, SCRIPT)
            .body("http://img/sheldon.png", png_bytes())
            .body("http://img/penny.png", png_bytes())
    }

    fn create(scene: &mut DialogueScene, store: &mut SpriteStore) -> Creation {
        let mut ctx = SceneContext {
            sprites: store,
            viewport: Vec2::new(1280.0, 720.0),
        };
        scene.create(&mut ctx)
    }

    fn step(scene: &mut DialogueScene, store: &mut SpriteStore, dt: f32) {
        store.pump();
        let mut ctx = SceneContext {
            sprites: store,
            viewport: Vec2::new(1280.0, 720.0),
        };
        scene.update(&mut ctx, dt);
    }

    fn tap(scene: &mut DialogueScene, store: &mut SpriteStore) {
        let mut ctx = SceneContext {
            sprites: store,
            viewport: Vec2::new(1280.0, 720.0),
        };
        scene.pointer_down(&mut ctx, BUBBLE_POS);
    }

    fn wait_ready(scene: &mut DialogueScene, store: &mut SpriteStore) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !scene.is_ready() && Instant::now() < deadline {
            step(scene, store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(scene.is_ready(), "script never loaded");
    }

    fn started(fetch: StubFetch) -> (DialogueScene, SpriteStore) {
        let (mut scene, mut store) = fixture(fetch);
        assert_eq!(create(&mut scene, &mut store), Creation::Pending);
        wait_ready(&mut scene, &mut store);
        tap(&mut scene, &mut store);
        (scene, store)
    }

    fn swap_once(scene: &mut DialogueScene, store: &mut SpriteStore) {
        tap(scene, store);
        step(scene, store, HALF_SWAP_SECS);
        step(scene, store, HALF_SWAP_SECS);
    }

    #[test]
    fn loads_then_waits_for_the_first_tap() {
        let (mut scene, mut store) = fixture(full_script());
        assert_eq!(create(&mut scene, &mut store), Creation::Pending);
        assert!(!scene.is_ready());
        assert_eq!(scene.message(), None);

        wait_ready(&mut scene, &mut store);
        assert_eq!(scene.phase(), DialoguePhase::AwaitingStart);
        assert_eq!(scene.message(), Some(START_PROMPT));
        assert!(scene.line().is_empty());
    }

    #[test]
    fn first_tap_shows_the_opening_line_at_once() {
        let (scene, _store) = started(full_script());
        assert_eq!(scene.phase(), DialoguePhase::Presenting);
        assert_eq!(scene.message(), None);
        assert_eq!(scene.cursor().map(|c| c.index()), Some(0));
        assert_eq!(scene.line(), "Hello \u{1F60A}");
        assert_eq!(scene.avatar_side(), Side::Left);
    }

    #[test]
    fn taps_during_a_swap_are_ignored() {
        let (mut scene, mut store) = started(full_script());
        tap(&mut scene, &mut store);
        assert_eq!(scene.phase(), DialoguePhase::Transitioning);

        step(&mut scene, &mut store, 0.1);
        tap(&mut scene, &mut store);
        tap(&mut scene, &mut store);
        step(&mut scene, &mut store, HALF_SWAP_SECS);
        // Collapse finished: exactly one advance, text swapped while hidden.
        assert_eq!(scene.cursor().map(|c| c.index()), Some(1));
        assert_eq!(scene.line(), "Hi {unknown}");
        assert_eq!(scene.phase(), DialoguePhase::Transitioning);

        step(&mut scene, &mut store, HALF_SWAP_SECS);
        assert_eq!(scene.phase(), DialoguePhase::Presenting);
        assert_eq!(scene.bubble_scale(), 1.0);
        assert_eq!(scene.cursor().map(|c| c.index()), Some(1));
    }

    #[test]
    fn playback_cycles_through_the_script() {
        let (mut scene, mut store) = started(full_script());
        let len = scene.script().len();
        for k in 1..=7 {
            swap_once(&mut scene, &mut store);
            assert_eq!(scene.cursor().map(|c| c.index()), Some(k % len));
        }
    }

    #[test]
    fn bubble_collapses_to_nothing_mid_swap() {
        let (mut scene, mut store) = started(full_script());
        tap(&mut scene, &mut store);
        step(&mut scene, &mut store, HALF_SWAP_SECS);
        assert_eq!(scene.bubble_scale(), 0.0);
        step(&mut scene, &mut store, HALF_SWAP_SECS / 2.0);
        assert!(scene.bubble_scale() > 0.0);
    }

    #[test]
    fn avatar_follows_the_speaker_and_survives_unknown_speakers() {
        let (mut scene, mut store) = started(full_script());
        let deadline = Instant::now() + Duration::from_secs(5);
        while scene.avatar().is_none() && Instant::now() < deadline {
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        let sheldon = scene.avatar().expect("avatar never loaded");

        swap_once(&mut scene, &mut store);
        assert_eq!(scene.avatar_side(), Side::Right);
        let deadline = Instant::now() + Duration::from_secs(5);
        while scene.avatar() == Some(sheldon) && Instant::now() < deadline {
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        let penny = scene.avatar().unwrap();
        assert_ne!(penny, sheldon);

        // The narrator has no avatar entry.
        swap_once(&mut scene, &mut store);
        assert_eq!(scene.line(), "Meanwhile...");
        assert_eq!(scene.avatar(), Some(penny));
        assert_eq!(scene.avatar_side(), Side::Right);
    }

    #[test]
    fn failed_avatar_keeps_the_previous_one() {
        let fetch = StubFetch::new().body(URL, SCRIPT).body("http://img/sheldon.png", png_bytes());
        let (mut scene, mut store) = started(fetch);
        let deadline = Instant::now() + Duration::from_secs(5);
        while scene.avatar().is_none() && Instant::now() < deadline {
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        let sheldon = scene.avatar().unwrap();

        swap_once(&mut scene, &mut store);
        let penny = store.request_url("http://img/penny.png");
        let deadline = Instant::now() + Duration::from_secs(5);
        while !store.is_failed(penny) && Instant::now() < deadline {
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        step(&mut scene, &mut store, 0.0);
        assert_eq!(scene.avatar(), Some(sheldon));
    }

    #[test]
    fn empty_script_reports_no_dialogue() {
        let (mut scene, mut store) = fixture(StubFetch::new().body(URL, r#"{ "dialogue": [] }"#));
        create(&mut scene, &mut store);
        while !scene.is_ready() {
            // The start prompt is never shown for an empty script.
            assert_ne!(scene.message(), Some(START_PROMPT));
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(scene.phase(), DialoguePhase::Unavailable);
        assert_eq!(scene.message(), Some(NO_DIALOGUE));

        tap(&mut scene, &mut store);
        assert_eq!(scene.phase(), DialoguePhase::Unavailable);
        assert!(scene.line().is_empty());
    }

    #[test]
    fn server_errors_report_a_load_failure() {
        let (mut scene, mut store) = fixture(StubFetch::new().status(URL, 500));
        create(&mut scene, &mut store);
        wait_ready(&mut scene, &mut store);
        assert_eq!(scene.phase(), DialoguePhase::Unavailable);
        assert_eq!(scene.message(), Some(LOAD_FAILED));
    }

    #[test]
    fn malformed_payload_reports_a_load_failure() {
        let (mut scene, mut store) = fixture(StubFetch::new().body(URL, "<html>"));
        create(&mut scene, &mut store);
        wait_ready(&mut scene, &mut store);
        assert_eq!(scene.message(), Some(LOAD_FAILED));
    }

    #[test]
    fn dispose_stops_the_swap_and_recreate_starts_over() {
        let (mut scene, mut store) = started(full_script());
        swap_once(&mut scene, &mut store);
        tap(&mut scene, &mut store);
        scene.dispose();
        assert!(scene.cursor().is_none());
        step(&mut scene, &mut store, 1.0);
        assert!(scene.line().is_empty());

        assert_eq!(create(&mut scene, &mut store), Creation::Pending);
        wait_ready(&mut scene, &mut store);
        tap(&mut scene, &mut store);
        assert_eq!(scene.cursor().map(|c| c.index()), Some(0));
    }

    #[test]
    fn draw_scales_the_bubble_text_with_it() {
        let (mut scene, mut store) = started(full_script());
        tap(&mut scene, &mut store);
        step(&mut scene, &mut store, HALF_SWAP_SECS);
        let mut canvas = Canvas::new();
        scene.draw(&mut canvas);
        let text = canvas
            .commands()
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::Text { transform, .. } => Some(*transform),
                _ => None,
            })
            .unwrap();
        assert_eq!(text.matrix2.x_axis.x, 0.0);
    }

    #[test]
    fn avatar_is_drawn_over_the_bubble() {
        let (mut scene, mut store) = started(full_script());
        let deadline = Instant::now() + Duration::from_secs(5);
        while scene.avatar().is_none() && Instant::now() < deadline {
            step(&mut scene, &mut store, 0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
        let avatar = scene.avatar().expect("avatar never loaded");
        let bubble = store.get(BUBBLE_ALIAS).unwrap();

        let mut canvas = Canvas::new();
        scene.draw(&mut canvas);
        let sprites: Vec<SpriteId> = canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Sprite { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect();
        assert_eq!(sprites, vec![bubble, avatar]);
    }

    #[test]
    fn portrait_shifts_the_layout() {
        let (mut scene, _store) = fixture(full_script());
        scene.on_resize(Orientation::Portrait);
        assert_eq!(scene.offset(), DIALOGUE_PORTRAIT_OFFSET);
        scene.on_resize(Orientation::Landscape);
        assert_eq!(scene.offset(), Vec2::ZERO);
    }
}
