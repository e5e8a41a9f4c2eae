//! Phoenix flame particle emitter.
//!
//! Particles live as `hecs` entities. A repeating timeline task spawns one every
//! [`SPAWN_SECS`]; each rises, fades, shrinks and reddens over its own lifetime and
//! is despawned when its flight ends.

use glam::{Affine2, Vec2};
use hecs::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::anim::{Easing, TaskId, Timeline, Tween, TweenState};
use crate::canvas::{Canvas, Color, Rect, TextStyle};
use crate::config::FLAMES_PORTRAIT_OFFSET;
use crate::orientation::Orientation;
use crate::scene::{Creation, Scene, SceneContext};

const EMITTER: Vec2 = Vec2::new(640.0, 480.0);
pub const SPAWN_SECS: f32 = 0.05;

const JITTER_X: f32 = 100.0;
const DRIFT_X: f32 = 50.0;
const RISE: f32 = 200.0;
const RISE_SPREAD: f32 = 50.0;

pub const START_COLOR: u32 = 0xFFA500;
pub const END_COLOR: u32 = 0xFF0000;

const PROMPT: &str = "Click to start flames!";
const PROMPT_POS: Vec2 = Vec2::new(640.0, 360.0);
const PROMPT_HIT: Vec2 = Vec2::new(320.0, 44.0);

/// Interpolate two `0xRRGGBB` colours channel by channel.
///
/// `t` is clamped to `[0, 1]`; the endpoints are reproduced exactly.
pub fn lerp_color(start: u32, end: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    [16, 8, 0].into_iter().fold(0, |color, shift| {
        let a = ((start >> shift) & 0xff) as f32;
        let b = ((end >> shift) & 0xff) as f32;
        let channel = (a + (b - a) * t).round().clamp(0.0, 255.0) as u32;
        color | (channel << shift)
    })
}

/// Rendered state of one flame, refreshed every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub radius: f32,
    pub scale: f32,
    pub alpha: f32,
    pub color: u32,
}

/// Where a flame is heading and how far along it is.
#[derive(Clone, Debug)]
struct Trajectory {
    from: Vec2,
    to: Vec2,
    clock: Tween<f32>,
}

impl Trajectory {
    /// Age the flame by `dt` and refresh how it looks.
    fn step(&mut self, particle: &mut Particle, dt: f32) -> TweenState {
        let state = self.clock.advance(dt);
        let progress = self.clock.value();
        particle.position = self.from.lerp(self.to, progress);
        particle.alpha = 1.0 - progress;
        particle.scale = 1.0 - 0.5 * progress;
        particle.color = lerp_color(START_COLOR, END_COLOR, 1.0 - particle.alpha);
        state
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterPhase {
    Idle,
    Emitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlameEvent {
    Spawn,
}

pub struct FlamesScene {
    rng: StdRng,
    phase: EmitterPhase,
    world: World,
    timeline: Timeline<FlameEvent>,
    spawner: Option<TaskId>,
    spawned: u64,
    offset: Vec2,
}

impl FlamesScene {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            phase: EmitterPhase::Idle,
            world: World::new(),
            timeline: Timeline::new(),
            spawner: None,
            spawned: 0,
            offset: Vec2::ZERO,
        }
    }

    pub fn phase(&self) -> EmitterPhase {
        self.phase
    }

    /// Number of flames currently alive.
    pub fn live(&self) -> u32 {
        self.world.len()
    }

    /// Flames spawned since the scene was created.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn particles(&self) -> Vec<Particle> {
        self.world
            .query::<&Particle>()
            .iter()
            .map(|(_, particle)| *particle)
            .collect()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    fn prompt_rect() -> Rect {
        let corner = PROMPT_POS - PROMPT_HIT / 2.0;
        Rect::new(corner.x, corner.y, PROMPT_HIT.x, PROMPT_HIT.y)
    }

    /// Emit one flame, already `age` seconds into its flight.
    fn spawn(&mut self, age: f32) {
        let rng = &mut self.rng;
        let radius = rng.random_range(8.0..14.0);
        let from = EMITTER + Vec2::new((rng.random::<f32>() - 0.5) * JITTER_X, 0.0);
        let duration = rng.random_range(1.5..2.0);
        let to = from
            + Vec2::new(
                (rng.random::<f32>() - 0.5) * DRIFT_X,
                -RISE - rng.random::<f32>() * RISE_SPREAD,
            );

        let mut particle = Particle {
            position: from,
            radius,
            scale: 1.0,
            alpha: 1.0,
            color: START_COLOR,
        };
        let mut trajectory = Trajectory {
            from,
            to,
            clock: Tween::new(0.0, 1.0, duration).easing(Easing::EaseOut),
        };
        trajectory.step(&mut particle, age);
        self.world.spawn((particle, trajectory));
        self.spawned += 1;
    }
}

impl Default for FlamesScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for FlamesScene {
    fn create(&mut self, ctx: &mut SceneContext) -> Creation {
        self.dispose();
        self.phase = EmitterPhase::Idle;
        self.spawned = 0;
        self.on_resize(ctx.orientation());
        Creation::Ready
    }

    fn dispose(&mut self) {
        if let Some(task) = self.spawner.take() {
            self.timeline.cancel(task);
        }
        self.timeline.clear();
        self.world.clear();
    }

    fn on_resize(&mut self, orientation: Orientation) {
        self.offset = match orientation {
            Orientation::Landscape => Vec2::ZERO,
            Orientation::Portrait => FLAMES_PORTRAIT_OFFSET,
        };
    }

    fn pointer_down(&mut self, _ctx: &mut SceneContext, point: Vec2) {
        if self.phase != EmitterPhase::Idle {
            return;
        }
        if Self::prompt_rect().contains(point - self.offset) {
            self.phase = EmitterPhase::Emitting;
            self.spawner = Some(self.timeline.every(SPAWN_SECS, FlameEvent::Spawn));
            tracing::info!("flames started");
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext, dt: f32) {
        let fired = self.timeline.advance(dt);

        let mut retired = Vec::new();
        for (entity, (particle, trajectory)) in
            self.world.query_mut::<(&mut Particle, &mut Trajectory)>()
        {
            if trajectory.step(particle, dt) == TweenState::Finished {
                retired.push(entity);
            }
        }
        for entity in retired {
            let _ = self.world.despawn(entity);
        }

        // Flames due mid-frame have only lived since their deadline.
        for fired in fired {
            match fired.event {
                FlameEvent::Spawn => self.spawn(fired.late),
            }
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.with_transform(Affine2::from_translation(self.offset), |canvas| {
            for (_, particle) in self.world.query::<&Particle>().iter() {
                canvas.circle(
                    particle.position,
                    particle.radius * particle.scale,
                    Color::hex(particle.color).with_alpha(particle.alpha),
                );
            }
            if self.phase == EmitterPhase::Idle {
                canvas.text(PROMPT, PROMPT_POS, TextStyle::new(30.0, Color::WHITE));
            }
        });
    }
}
