use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use shared::config::LifeConfig;
use shared::input::{PointerButton, PointerEvent};
use shared::session::Session;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::frame::FrameBuilder;
use crate::render::Renderer;

mod frame;
mod render;

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(1);

struct LifeApp {
    config: LifeConfig,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    renderer: Option<Renderer>,
    session: Option<Session>,
    frame: FrameBuilder,
    last_cursor: [f32; 2],
    frame_count: u32,
    last_fps_log: Instant,
    init_error: Option<anyhow::Error>,
}

impl LifeApp {
    fn new(config: LifeConfig) -> Self {
        let cells = config.rows * config.columns;
        Self {
            config,
            window: None,
            window_id: None,
            renderer: None,
            session: None,
            frame: FrameBuilder::with_capacity(cells),
            last_cursor: [0.0, 0.0],
            frame_count: 0,
            last_fps_log: Instant::now(),
            init_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let monitor = event_loop.primary_monitor().map(|monitor| {
            let size = monitor.size();
            (size.width, size.height)
        });
        if monitor.is_none() {
            log::warn!("no primary monitor reported, using fallback window size");
        }
        let (width, height) = self.config.window_size_for(monitor);

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.rows * self.config.columns + 1))
            .context("initialize GPU renderer")?;
        let size = renderer.size();
        log::info!(
            "window {}x{}, grid {}x{} cells of {}px",
            size.width,
            size.height,
            self.config.rows,
            self.config.columns,
            self.config.cell_size
        );

        let session = Session::new(&self.config, [size.width as f32, size.height as f32], Instant::now());
        window.request_redraw();

        self.window_id = Some(window.id());
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.session = Some(session);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn pointer(&mut self, event: PointerEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.handle_pointer(event, Instant::now()).needs_redraw() {
            self.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(session)) = (self.renderer.as_mut(), self.session.as_mut()) else {
            return;
        };
        session.tick(Instant::now());
        let (instances, ui_vertices) = self.frame.build(session);

        match renderer.render(instances, ui_vertices) {
            Ok(()) => {
                self.frame_count += 1;
                let elapsed = self.last_fps_log.elapsed();
                if elapsed >= FPS_LOG_INTERVAL {
                    let fps = self.frame_count as f64 / elapsed.as_secs_f64();
                    log::info!("fps: {:.1}, generation {}", fps, session.generation());
                    self.frame_count = 0;
                    self.last_fps_log = Instant::now();
                }
            }
            Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size()),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("skipping frame: {err}"),
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

impl ApplicationHandler<()> for LifeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("startup failed: {err:#}");
            self.init_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                if let Some(session) = self.session.as_mut() {
                    session.resize([size.width as f32, size.height as f32]);
                }
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = [position.x as f32, position.y as f32];
                self.pointer(PointerEvent::Moved(self.last_cursor));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let event = match state {
                    ElementState::Pressed => PointerEvent::Pressed(button, self.last_cursor),
                    ElementState::Released => PointerEvent::Released(button, self.last_cursor),
                };
                self.pointer(event);
            }
            // A release that happens while unfocused is never delivered.
            WindowEvent::Focused(false) => self.pointer(PointerEvent::Cancel),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.session.as_ref().and_then(Session::next_deadline) {
            Some(deadline) => {
                if Instant::now() >= deadline {
                    self.request_redraw();
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let event_loop = EventLoop::new()?;
    let mut app = LifeApp::new(LifeConfig::default());
    event_loop.run_app(&mut app)?;
    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
