//! The windowed shell: winit event loop, GPU setup and the per-frame pump.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::{Fonts, SpriteStore, load_manifest};
use crate::canvas::{Canvas, Color, TextStyle};
use crate::config::{ASSET_MANIFEST, AppConfig, EMOJI_TABLE};
use crate::draw2d::{Draw2d, tessellate};
use crate::error::{Result, TableauError};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::net::{Fetch, HttpFetch};
use crate::scene::SceneHost;
use crate::scenes::{DialogueScene, FlamesScene, ShuffleScene};

/// Longest step fed to the scenes; a stalled frame resumes rather than racing ahead.
const MAX_FRAME_SECS: f32 = 0.25;

const FPS_WINDOW_SECS: f32 = 0.5;
const FPS_TEXT_SIZE: f32 = 16.0;

/// Frame-rate average over a short sliding window.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn tick(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= FPS_WINDOW_SECS {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    draw_2d: Draw2d,
    sprites: SpriteStore,
    fonts: Fonts,
    host: SceneHost,
    input: Input,
    canvas: Canvas,
    fps: FpsCounter,
    last_frame: Instant,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|err| TableauError::Window(err.to_string()))?,
        );

        let gpu = GpuContext::new(Arc::clone(&window))?;
        let draw_2d = Draw2d::new(&gpu);

        let fetch: Arc<dyn Fetch> = Arc::new(HttpFetch::new());
        let mut sprites = SpriteStore::new(Arc::clone(&fetch));
        let loaded = load_manifest(&mut sprites, &config.asset_dir, ASSET_MANIFEST);
        tracing::info!(loaded, total = ASSET_MANIFEST.len(), dir = %config.asset_dir.display(), "assets loaded");

        let symbols: Vec<char> = EMOJI_TABLE
            .iter()
            .flat_map(|(_, symbol)| symbol.chars())
            .collect();
        let fonts = Fonts::load(&config.font_path, symbols).unwrap_or_else(|err| {
            tracing::warn!(path = %config.font_path.display(), error = %err, "font unavailable; text is hidden");
            Fonts::none()
        });

        let size = window.inner_size();
        let mut host = SceneHost::new(Vec2::new(size.width as f32, size.height as f32));
        host.set_background(sprites.get("background"));
        host.register("shuffle", "Ace of Shadows", Box::new(ShuffleScene::new()));
        host.register(
            "dialogue",
            "Magic Words",
            Box::new(DialogueScene::new(fetch, config.dialogue_url.clone())),
        );
        host.register("flames", "Phoenix Flame", Box::new(FlamesScene::new()));

        window.request_redraw();
        Ok(Self {
            window,
            gpu,
            draw_2d,
            sprites,
            fonts,
            host,
            input: Input::new(),
            canvas: Canvas::new(),
            fps: FpsCounter::default(),
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.host.on_resize(Vec2::new(width as f32, height as f32));
    }

    fn frame(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_frame)
            .as_secs_f32()
            .min(MAX_FRAME_SECS);
        self.last_frame = now;

        self.sprites.pump();
        for point in self.input.take_pointer_downs() {
            self.host.pointer_down(&mut self.sprites, point);
        }
        self.host.update(&mut self.sprites, dt);
        self.fps.tick(dt);

        self.canvas.clear();
        self.host.draw(&mut self.canvas);
        let stage = self.host.letterbox().stage();
        self.canvas.text(
            format!("{:.0} FPS", self.fps.fps()),
            Vec2::new(stage.x - 50.0, 20.0),
            TextStyle::new(FPS_TEXT_SIZE, Color::WHITE),
        );

        let mesh = tessellate(&self.canvas, &self.sprites, &mut self.fonts);
        self.draw_2d
            .upload_images(&self.gpu, self.sprites.take_uploads());
        self.draw_2d.sync_atlases(&self.gpu, &self.fonts);
        self.draw_2d.render(&self.gpu, &mesh, self.host.letterbox())
    }
}

enum TableauApp {
    Pending { config: AppConfig },
    Running(Box<Running>),
    Failed(TableauError),
}

impl ApplicationHandler for TableauApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let TableauApp::Pending { config } = self else {
            return;
        };
        match Running::start(event_loop, config) {
            Ok(running) => *self = TableauApp::Running(Box::new(running)),
            Err(err) => {
                tracing::error!(error = %err, "startup failed");
                *self = TableauApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let TableauApp::Running(app) = self else {
            return;
        };

        app.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = app.frame() {
                    tracing::error!(error = %err, "frame failed");
                    *self = TableauApp::Failed(err);
                    event_loop.exit();
                    return;
                }
                app.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| TableauError::Window(err.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = TableauApp::Pending { config };
    event_loop
        .run_app(&mut app)
        .map_err(|err| TableauError::Window(err.to_string()))?;

    match app {
        TableauApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_averages_over_the_window() {
        let mut counter = FpsCounter::default();
        assert_eq!(counter.fps(), 0.0);
        for _ in 0..40 {
            counter.tick(1.0 / 60.0);
        }
        assert!((counter.fps() - 60.0).abs() < 0.5, "fps = {}", counter.fps());
    }
}
