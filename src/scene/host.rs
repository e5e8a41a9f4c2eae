//! The scene host: one scene slot, the button row, the backdrop and the letterbox.

use glam::Vec2;

use super::background::Background;
use super::buttons::ButtonBar;
use super::layout::Letterbox;
use super::scene::{Creation, Scene, SceneContext, SceneId};
use crate::assets::{SpriteId, SpriteStore};
use crate::canvas::Canvas;
use crate::orientation::Orientation;

/// What a [`SceneHost::switch_to`] request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The old scene was disposed and the new one created.
    Switched,
    /// The requested scene already occupies the slot.
    Unchanged,
    /// A creation is still pending; the request runs once it completes.
    Deferred,
    /// No scene is registered under that id.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Empty,
    Creating(usize),
    Ready(usize),
}

/// Owns every registered scene and attaches at most one of them at a time.
///
/// Switching disposes the attached scene before the next one is created. While a
/// scene is still creating, further switch requests are held back and only the
/// most recent one is issued when the creation completes. Scenes stay in memory
/// while detached; attaching one again repeats its `create`.
pub struct SceneHost {
    scenes: Vec<(SceneId, Box<dyn Scene>)>,
    slot: Slot,
    deferred: Option<SceneId>,
    buttons: ButtonBar,
    background: Background,
    viewport: Vec2,
    letterbox: Letterbox,
}

impl SceneHost {
    pub fn new(viewport: Vec2) -> Self {
        let letterbox = Letterbox::fit(viewport);
        let mut buttons = ButtonBar::new();
        buttons.layout(letterbox.orientation);
        let mut background = Background::new(None);
        background.on_resize(letterbox.orientation);
        Self {
            scenes: Vec::new(),
            slot: Slot::Empty,
            deferred: None,
            buttons,
            background,
            viewport,
            letterbox,
        }
    }

    pub fn set_background(&mut self, sprite: Option<SpriteId>) {
        self.background = Background::new(sprite);
        self.background.on_resize(self.letterbox.orientation);
    }

    /// Register a scene and give it a button labelled `label`.
    ///
    /// Registering an id twice replaces the earlier scene and keeps its button.
    pub fn register(&mut self, id: impl Into<SceneId>, label: &str, scene: Box<dyn Scene>) {
        let id = id.into();
        if let Some(index) = self.index_of(&id) {
            tracing::warn!(scene = %id, "scene registered twice; replacing");
            if self.attached() == Some(index) {
                self.scenes[index].1.dispose();
                self.slot = Slot::Empty;
                self.deferred = None;
            }
            self.scenes[index].1 = scene;
            return;
        }
        self.buttons.push(label, id.clone());
        self.scenes.push((id, scene));
    }

    /// The scene in the slot, whether or not its creation has finished.
    pub fn active(&self) -> Option<&SceneId> {
        self.attached().map(|index| &self.scenes[index].0)
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.slot, Slot::Creating(_))
    }

    pub fn deferred(&self) -> Option<&SceneId> {
        self.deferred.as_ref()
    }

    pub fn letterbox(&self) -> &Letterbox {
        &self.letterbox
    }

    pub fn orientation(&self) -> Orientation {
        self.letterbox.orientation
    }

    pub fn buttons(&self) -> &ButtonBar {
        &self.buttons
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    fn index_of(&self, id: &SceneId) -> Option<usize> {
        self.scenes.iter().position(|(scene_id, _)| scene_id == id)
    }

    fn attached(&self) -> Option<usize> {
        match self.slot {
            Slot::Empty => None,
            Slot::Creating(index) | Slot::Ready(index) => Some(index),
        }
    }

    /// Put `id` in the scene slot.
    pub fn switch_to(&mut self, sprites: &mut SpriteStore, id: impl Into<SceneId>) -> SwitchOutcome {
        let id = id.into();
        let Some(index) = self.index_of(&id) else {
            tracing::warn!(scene = %id, "unknown scene");
            return SwitchOutcome::Unknown;
        };

        match self.slot {
            Slot::Creating(current) if current == index => {
                self.deferred = None;
                return SwitchOutcome::Unchanged;
            }
            Slot::Creating(current) => {
                tracing::info!(
                    scene = %id,
                    creating = %self.scenes[current].0,
                    "switch deferred until creation completes"
                );
                self.deferred = Some(id);
                return SwitchOutcome::Deferred;
            }
            Slot::Ready(current) if current == index => return SwitchOutcome::Unchanged,
            Slot::Ready(current) => {
                self.scenes[current].1.dispose();
                tracing::info!(scene = %self.scenes[current].0, "scene disposed");
            }
            Slot::Empty => {}
        }

        let mut ctx = SceneContext {
            sprites,
            viewport: self.viewport,
        };
        let creation = self.scenes[index].1.create(&mut ctx);
        self.slot = match creation {
            Creation::Ready => {
                tracing::info!(scene = %id, "scene created");
                Slot::Ready(index)
            }
            Creation::Pending => {
                tracing::info!(scene = %id, "scene creating");
                Slot::Creating(index)
            }
        };
        SwitchOutcome::Switched
    }

    /// The viewport changed size. Every attached element is re-laid-out for the
    /// resulting orientation; running animations are left alone.
    pub fn on_resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.letterbox = Letterbox::fit(viewport);
        let orientation = self.letterbox.orientation;
        tracing::debug!(%orientation, width = viewport.x, height = viewport.y, "resize");

        self.buttons.layout(orientation);
        self.background.on_resize(orientation);
        if let Some(index) = self.attached() {
            self.scenes[index].1.on_resize(orientation);
        }
    }

    /// Route a pointer-down at a physical viewport position.
    ///
    /// Buttons take precedence. Otherwise the point goes to the attached scene in
    /// stage coordinates, once its creation has completed.
    pub fn pointer_down(&mut self, sprites: &mut SpriteStore, physical: Vec2) {
        let Some(point) = self.letterbox.to_stage(physical) else {
            return;
        };
        if let Some(target) = self.buttons.hit(point).cloned() {
            self.switch_to(sprites, target);
            return;
        }
        if let Slot::Ready(index) = self.slot {
            let mut ctx = SceneContext {
                sprites,
                viewport: self.viewport,
            };
            self.scenes[index].1.pointer_down(&mut ctx, point);
        }
    }

    /// Tick the attached scene, then complete a pending creation and issue any
    /// deferred switch.
    pub fn update(&mut self, sprites: &mut SpriteStore, dt: f32) {
        if let Some(index) = self.attached() {
            let mut ctx = SceneContext {
                sprites: &mut *sprites,
                viewport: self.viewport,
            };
            self.scenes[index].1.update(&mut ctx, dt);
        }

        if let Slot::Creating(index) = self.slot {
            if self.scenes[index].1.is_ready() {
                tracing::info!(scene = %self.scenes[index].0, "scene created");
                self.slot = Slot::Ready(index);
                if let Some(next) = self.deferred.take() {
                    self.switch_to(sprites, next);
                }
            }
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        self.background.draw(canvas);
        if let Some(index) = self.attached() {
            self.scenes[index].1.draw(canvas);
        }
        self.buttons.draw(canvas, self.deferred.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::canvas::DrawCmd;
    use crate::net::testing::StubFetch;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        pending: bool,
        ready: Rc<Cell<bool>>,
        ticks: Rc<Cell<u32>>,
    }

    impl Scene for Probe {
        fn create(&mut self, _ctx: &mut SceneContext) -> Creation {
            self.log.borrow_mut().push(format!("{}:create", self.name));
            if self.pending {
                self.ready.set(false);
                Creation::Pending
            } else {
                Creation::Ready
            }
        }

        fn is_ready(&self) -> bool {
            self.ready.get()
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().push(format!("{}:dispose", self.name));
        }

        fn on_resize(&mut self, orientation: Orientation) {
            self.log
                .borrow_mut()
                .push(format!("{}:resize:{}", self.name, orientation));
        }

        fn pointer_down(&mut self, _ctx: &mut SceneContext, point: Vec2) {
            self.log
                .borrow_mut()
                .push(format!("{}:tap:{}:{}", self.name, point.x, point.y));
        }

        fn update(&mut self, _ctx: &mut SceneContext, _dt: f32) {
            self.ticks.set(self.ticks.get() + 1);
        }
    }

    struct Fixture {
        host: SceneHost,
        sprites: SpriteStore,
        log: Log,
        ready: Vec<Rc<Cell<bool>>>,
        ticks: Vec<Rc<Cell<u32>>>,
    }

    impl Fixture {
        /// Scenes "a", "b" and "c"; the ones listed in `pending` create asynchronously.
        fn new(pending: &[&str]) -> Self {
            let log: Log = Rc::default();
            let mut host = SceneHost::new(Vec2::new(1280.0, 720.0));
            let mut ready = Vec::new();
            let mut ticks = Vec::new();
            for name in ["a", "b", "c"] {
                let flag = Rc::new(Cell::new(true));
                let count = Rc::new(Cell::new(0));
                host.register(
                    name,
                    name,
                    Box::new(Probe {
                        name,
                        log: Rc::clone(&log),
                        pending: pending.contains(&name),
                        ready: Rc::clone(&flag),
                        ticks: Rc::clone(&count),
                    }),
                );
                ready.push(flag);
                ticks.push(count);
            }
            Self {
                host,
                sprites: SpriteStore::new(Arc::new(StubFetch::new())),
                log,
                ready,
                ticks,
            }
        }

        fn switch(&mut self, id: &str) -> SwitchOutcome {
            self.host.switch_to(&mut self.sprites, id)
        }

        fn update(&mut self) {
            self.host.update(&mut self.sprites, 0.016);
        }

        fn events(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    #[test]
    fn switching_disposes_before_creating() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.switch("a"), SwitchOutcome::Switched);
        assert_eq!(f.switch("b"), SwitchOutcome::Switched);
        assert_eq!(f.events(), vec!["a:create", "a:dispose", "b:create"]);
        assert_eq!(f.host.active().map(SceneId::as_str), Some("b"));
    }

    #[test]
    fn switching_to_the_attached_scene_is_a_no_op() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        assert_eq!(f.switch("a"), SwitchOutcome::Unchanged);
        assert_eq!(f.events(), vec!["a:create"]);
    }

    #[test]
    fn unknown_scenes_are_rejected() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.switch("nope"), SwitchOutcome::Unknown);
        assert_eq!(f.host.active(), None);
    }

    #[test]
    fn requests_during_creation_are_deferred_and_latest_wins() {
        let mut f = Fixture::new(&["a"]);
        assert_eq!(f.switch("a"), SwitchOutcome::Switched);
        assert!(f.host.is_creating());
        assert_eq!(f.switch("b"), SwitchOutcome::Deferred);
        assert_eq!(f.switch("c"), SwitchOutcome::Deferred);
        assert_eq!(f.host.deferred().map(SceneId::as_str), Some("c"));

        f.update();
        assert_eq!(f.events(), vec!["a:create"]);

        f.ready[0].set(true);
        f.update();
        assert_eq!(f.events(), vec!["a:create", "a:dispose", "c:create"]);
        assert_eq!(f.host.active().map(SceneId::as_str), Some("c"));
        assert_eq!(f.host.deferred(), None);
    }

    #[test]
    fn a_deferred_button_is_dimmed_until_it_is_issued() {
        let mut f = Fixture::new(&["a"]);
        f.switch("a");
        f.switch("c");

        let button_alphas = |host: &SceneHost| {
            let mut canvas = Canvas::new();
            host.draw(&mut canvas);
            canvas
                .commands()
                .iter()
                .skip(1)
                .filter_map(|cmd| match cmd {
                    DrawCmd::Quad { color, .. } => Some(color.a),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(button_alphas(&f.host), vec![1.0, 1.0, 0.5]);

        f.ready[0].set(true);
        f.update();
        assert_eq!(button_alphas(&f.host), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn replacing_the_creating_scene_forgets_the_deferral() {
        let mut f = Fixture::new(&["a"]);
        f.switch("a");
        assert_eq!(f.switch("b"), SwitchOutcome::Deferred);

        let ready = Rc::new(Cell::new(false));
        f.host.register(
            "a",
            "a",
            Box::new(Probe {
                name: "a2",
                log: Rc::clone(&f.log),
                pending: true,
                ready: Rc::clone(&ready),
                ticks: Rc::default(),
            }),
        );
        assert_eq!(f.host.active(), None);
        assert_eq!(f.host.deferred(), None);

        assert_eq!(f.switch("a"), SwitchOutcome::Switched);
        ready.set(true);
        f.update();
        assert_eq!(f.events(), vec!["a:create", "a:dispose", "a2:create"]);
        assert_eq!(f.host.active().map(SceneId::as_str), Some("a"));
    }

    #[test]
    fn asking_for_the_scene_being_created_drops_the_deferral() {
        let mut f = Fixture::new(&["a"]);
        f.switch("a");
        f.switch("b");
        assert_eq!(f.switch("a"), SwitchOutcome::Unchanged);
        f.ready[0].set(true);
        f.update();
        assert_eq!(f.events(), vec!["a:create"]);
        assert!(!f.host.is_creating());
    }

    #[test]
    fn pending_scenes_tick_but_get_no_pointer() {
        let mut f = Fixture::new(&["a"]);
        f.switch("a");
        f.update();
        f.update();
        assert_eq!(f.ticks[0].get(), 2);

        f.host.pointer_down(&mut f.sprites, Vec2::new(640.0, 400.0));
        assert_eq!(f.events(), vec!["a:create"]);

        f.ready[0].set(true);
        f.update();
        f.host.pointer_down(&mut f.sprites, Vec2::new(640.0, 400.0));
        assert_eq!(f.events().last().map(String::as_str), Some("a:tap:640:400"));
    }

    #[test]
    fn buttons_take_precedence_over_the_scene() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        // Second button, landscape row.
        f.host.pointer_down(&mut f.sprites, Vec2::new(600.0, 50.0));
        assert_eq!(f.host.active().map(SceneId::as_str), Some("b"));
        assert!(!f.events().iter().any(|e| e.contains(":tap:")));
    }

    #[test]
    fn pointer_is_mapped_through_the_letterbox() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        f.host.on_resize(Vec2::new(2560.0, 2000.0));
        let margin = f.host.letterbox().margin;
        assert_eq!(margin, Vec2::new(0.0, 280.0));

        // Margins are dead space.
        f.host.pointer_down(&mut f.sprites, Vec2::new(100.0, 100.0));
        assert!(!f.events().iter().any(|e| e.contains(":tap:")));

        f.host.pointer_down(&mut f.sprites, Vec2::new(1280.0, 280.0 + 720.0));
        assert_eq!(f.events().last().map(String::as_str), Some("a:tap:640:360"));
    }

    #[test]
    fn resize_reaches_the_attached_scene_without_recreating_it() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        f.update();
        f.host.on_resize(Vec2::new(720.0, 1280.0));
        f.update();
        assert_eq!(f.host.orientation(), Orientation::Portrait);
        assert_eq!(f.events(), vec!["a:create", "a:resize:portrait"]);
        assert_eq!(f.ticks[0].get(), 2);
        assert_eq!(f.host.buttons().buttons()[0].rect.x, 180.0);
    }

    #[test]
    fn detached_scenes_can_be_attached_again() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        f.switch("b");
        f.switch("a");
        assert_eq!(
            f.events(),
            vec!["a:create", "a:dispose", "b:create", "b:dispose", "a:create"]
        );
    }

    #[test]
    fn draw_layers_background_scene_and_buttons() {
        let mut f = Fixture::new(&[]);
        f.switch("a");
        let mut canvas = Canvas::new();
        f.host.draw(&mut canvas);
        // Clear quad, then three button quads with their labels.
        assert_eq!(canvas.commands().len(), 1 + 3 * 2);
    }
}
