use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use softgl::cli::Cli;
use softgl::config::{scaled_size, RendererConfig};
use softgl::core::{FrameClock, Rectangle, SoftwareRenderer, WgpuSurface};
use softgl::demo::DemoScene;
use softgl::logging::{init_logging, LoggingConfig};

struct App {
    config: RendererConfig,
    window: Option<Arc<Window>>,
    renderer: Option<SoftwareRenderer<WgpuSurface>>,
    scene: Option<DemoScene>,
    clock: FrameClock,
    pending_resize: Option<(u32, u32)>,
}

impl App {
    fn new(config: RendererConfig) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            scene: None,
            clock: FrameClock::default(),
            pending_resize: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (surface_width, surface_height) =
            scaled_size(self.config.width, self.config.height, self.config.scale)?;
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(self.config.title.clone())
                        .with_visible(false)
                        .with_inner_size(winit::dpi::PhysicalSize::new(surface_width, surface_height)),
                )
                .context("failed to create window")?,
        );

        let surface = WgpuSurface::new(window.clone(), self.config.buffering)
            .context("failed to create presentation surface")?;
        let mut renderer = SoftwareRenderer::new(surface, &self.config)?;
        renderer.init()?;

        let scene = DemoScene::new()?;
        scene.install(&mut renderer);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.scene = Some(scene);
        self.clock.reset();
        Ok(())
    }

    fn render_frame(&mut self) {
        let delta = self.clock.tick();
        let (Some(renderer), Some(scene)) = (&mut self.renderer, &mut self.scene) else {
            return;
        };

        // Buffers are only reallocated between frames
        if let Some((width, height)) = self.pending_resize.take() {
            match renderer.set_window_size(width, height) {
                Ok(()) => {
                    renderer.set_view_port(Rectangle::sized(width, height));
                    log::debug!("window resized to {}x{} (dt {:.3}s)", width, height, delta);
                }
                Err(e) => log::warn!("ignoring resize to {}x{}: {}", width, height, e),
            }
        }

        scene.update(self.clock.elapsed());
        let result = scene.draw(renderer).and_then(|_| renderer.present());
        if let Err(e) = result {
            log::error!("frame failed: {}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.start(event_loop) {
                log::error!("failed to start renderer: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if let Some(renderer) = &self.renderer {
                    renderer.close_signal().request();
                }
            }
            WindowEvent::Resized(size) => {
                let scale = self.config.scale;
                let (width, height) = (size.width / scale, size.height / scale);
                if width > 0 && height > 0 {
                    self.pending_resize = Some((width, height));
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &mut self.renderer {
            if renderer.poll_close_requested() {
                renderer.dispose();
                log::info!("closing after {:.1}s, last {:.1} fps", self.clock.elapsed(), self.clock.fps());
                event_loop.exit();
                return;
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(LoggingConfig::from_cli(&cli, &config));

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("softgl demo - Escape or close the window to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
