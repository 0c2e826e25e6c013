use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use orbitview_assets::{ModelData, ShaderPair};
use orbitview_driver::{AppState, DemoConfig, FrameClock, FrameDriver, SceneMeshes};
use orbitview_input::{Key, KeyState};
use orbitview_render::DrawList;
use orbitview_render_wgpu::{GpuContext, WgpuRenderer};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "orbitview-desktop", about = "Orbit camera and instanced mesh demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// GPU-side resources, created once the window exists.
struct Gpu {
    context: GpuContext,
    renderer: WgpuRenderer,
    meshes: SceneMeshes,
    draws: DrawList,
}

struct DesktopApp {
    config: DemoConfig,
    driver: FrameDriver,
    keys: KeyState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    setup_failed: bool,
}

impl DesktopApp {
    fn new(config: DemoConfig) -> Self {
        let driver = FrameDriver::new(
            AppState::from_config(&config),
            FrameClock::new(config.pacing),
        );
        Self {
            config,
            driver,
            keys: KeyState::new(),
            window: None,
            gpu: None,
            setup_failed: false,
        }
    }

    /// Window, shaders, models, device and uploads. Any failure is fatal.
    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(true);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(window.clone());

        let assets = &self.config.assets;
        let shaders = ShaderPair::load(&assets.vertex_shader, &assets.fragment_shader)
            .context("failed to load shader pair")?;
        let field_model = ModelData::load(&assets.instance_mesh, &assets.instance_texture)
            .context("failed to load instanced model")?;
        let object_model = ModelData::load(&assets.object_mesh, &assets.object_texture)
            .context("failed to load moving object model")?;

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialise GPU")?;
        let mut renderer = WgpuRenderer::new(
            &context.device,
            context.format(),
            size.width,
            size.height,
            &shaders,
            context.supports_wireframe(),
        )
        .context("failed to create shader program")?;

        let device = &context.device;
        let queue = &context.queue;
        let meshes = SceneMeshes {
            instanced: renderer.upload_mesh(device, queue, &field_model.mesh, &field_model.texture),
            object: renderer.upload_mesh(device, queue, &object_model.mesh, &object_model.texture),
            overlay: renderer.upload_overlay(device, &self.driver.app().overlay),
        };
        renderer.upload_instances(device, &self.driver.app().instances);

        let draws = DrawList::new(renderer.uniforms().clone());
        let (width, height) = context.size();
        self.driver.resize(width, height);

        self.gpu = Some(Gpu {
            context,
            renderer,
            meshes,
            draws,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        gpu.draws.clear();
        let effects = self.driver.tick(&self.keys, gpu.meshes, &mut gpu.draws);
        if effects.close_requested {
            self.shutdown(event_loop);
            return;
        }
        if let (Some(hidden), Some(window)) = (effects.cursor_hidden, &self.window) {
            set_cursor_captured(window, hidden);
        }
        if let Some(wireframe) = effects.wireframe {
            let applied = gpu.renderer.set_wireframe(wireframe);
            self.driver.app_mut().toggles.wireframe = applied;
        }

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.context.device,
            &gpu.context.queue,
            &view,
            &gpu.draws,
            self.config.clear_color,
        );
        output.present();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Enter Closing, release GPU resources and leave the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.request_close();
        if let Some(gpu) = self.gpu.take() {
            drop(gpu);
            tracing::info!("GPU resources released");
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            tracing::error!("setup failed: {e:#}");
            self.setup_failed = true;
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.context.size();
                    gpu.renderer.resize(&gpu.context.device, width, height);
                    self.driver.resize(width, height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    self.keys.set(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.keys.set_cursor(position.x, position.y);
            }
            WindowEvent::Focused(false) => {
                self.keys.clear();
                self.driver.app_mut().reset_edges();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Hide and lock the cursor, falling back to confining it where locking is
/// unsupported; or show and release it.
fn set_cursor_captured(window: &Window, captured: bool) {
    window.set_cursor_visible(!captured);
    let grab = if captured {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };
    if let Err(e) = grab {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    tracing::info!(hidden = captured, "cursor visibility toggled");
}

fn run(cli: Cli) -> Result<bool> {
    let config = DemoConfig::load_or_default(cli.config.as_deref())?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(!app.setup_failed)
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(
        backend = orbitview_render_wgpu::crate_info(),
        "orbitview-desktop starting"
    );

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(-1),
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(-1);
        }
    }
}
