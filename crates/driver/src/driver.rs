use std::collections::HashSet;

use orbitview_common::Viewport;
use orbitview_input::{Action, KeyState};
use orbitview_render::DrawTarget;
use orbitview_scene::{CameraInput, ObjectInput};

use crate::clock::FrameClock;
use crate::state::{AppState, SceneMeshes};

/// Frame loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Terminal: resources are being released and no further ticks run.
    Closing,
}

/// Window-side requests produced by one tick. `None` means unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameEffects {
    /// New cursor visibility state: `Some(true)` hides and captures it.
    pub cursor_hidden: Option<bool>,
    /// New requested polygon mode: `Some(true)` is wireframe.
    pub wireframe: Option<bool>,
    /// Cursor position that was logged this tick.
    pub logged_cursor: Option<(f64, f64)>,
    /// The driver entered [`DriverState::Closing`] during this tick.
    pub close_requested: bool,
}

/// Per-frame driver: dispatches input, advances scene state and composes
/// draws.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: DriverState,
    app: AppState,
    clock: FrameClock,
    frames: u64,
}

impl FrameDriver {
    /// Enter [`DriverState::Running`]. Setup that can fail happens before
    /// this, so a constructed driver is always ready to tick.
    pub fn new(app: AppState, clock: FrameClock) -> Self {
        tracing::info!(pacing = ?clock.pacing(), "frame driver running");
        Self {
            state: DriverState::Running,
            app,
            clock,
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppState {
        &mut self.app
    }

    /// Ticks completed in the running state.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one tick with the clock's delta.
    pub fn tick(
        &mut self,
        keys: &KeyState,
        meshes: SceneMeshes,
        target: &mut impl DrawTarget,
    ) -> FrameEffects {
        let dt = self.clock.tick();
        self.step(keys, dt, meshes, target)
    }

    /// Run one tick with an explicit delta.
    ///
    /// Order: press-edge toggles, then `update(dt)` followed by held input
    /// (so manual input always applies last), then instanced field, moving
    /// object and overlay are composed into `target`.
    pub fn step(
        &mut self,
        keys: &KeyState,
        dt: f32,
        meshes: SceneMeshes,
        target: &mut impl DrawTarget,
    ) -> FrameEffects {
        if self.state == DriverState::Closing {
            return FrameEffects::default();
        }
        let _span = tracing::trace_span!("frame", frame = self.frames, dt).entered();

        let pressed = self.app.edges.update(keys);
        let actions = self.app.bindings.press_actions(&pressed);
        let effects = self.dispatch(&actions, keys.cursor());
        if effects.close_requested {
            return effects;
        }

        let held = self.app.bindings.held_actions(keys);
        let app = &mut self.app;
        app.camera.update(dt);
        app.camera.process_input(camera_input(&held), dt);
        app.object.process_input(object_input(&held), dt);

        app.composer
            .render_instanced(&app.camera, &app.instances, meshes.instanced, target);
        app.composer
            .render_single_object(&app.camera, &app.object, meshes.object, target);
        app.composer
            .render_overlay_quad(&mut app.overlay, keys.cursor(), meshes.overlay, target);

        self.frames += 1;
        effects
    }

    /// External close request, e.g. the window's close button.
    pub fn request_close(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Closing;
            tracing::info!(frames = self.frames, "frame driver closing");
        }
    }

    /// Follow a window resize: aspect ratio and overlay projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.app.composer.resize(Viewport::new(width, height));
        tracing::debug!(width, height, "viewport resized");
    }

    fn dispatch(&mut self, actions: &[Action], cursor: (f64, f64)) -> FrameEffects {
        let mut effects = FrameEffects::default();
        for action in actions {
            match action {
                Action::ToggleCursor => {
                    let toggles = &mut self.app.toggles;
                    toggles.cursor_hidden = !toggles.cursor_hidden;
                    effects.cursor_hidden = Some(toggles.cursor_hidden);
                }
                Action::ToggleWireframe => {
                    let toggles = &mut self.app.toggles;
                    toggles.wireframe = !toggles.wireframe;
                    effects.wireframe = Some(toggles.wireframe);
                }
                Action::LogCursor => {
                    tracing::info!("cursor position: ({:.1}, {:.1})", cursor.0, cursor.1);
                    effects.logged_cursor = Some(cursor);
                }
                Action::ToggleCameraMode => {
                    self.app.camera.toggle_mode();
                    let mode = if self.app.camera.is_automatic() {
                        "automatic"
                    } else {
                        "manual"
                    };
                    tracing::info!(mode, "camera mode changed");
                }
                Action::Quit => {
                    self.request_close();
                    effects.close_requested = true;
                }
                _ => {}
            }
        }
        effects
    }
}

fn camera_input(held: &HashSet<Action>) -> CameraInput {
    CameraInput {
        left: held.contains(&Action::OrbitLeft),
        right: held.contains(&Action::OrbitRight),
        closer: held.contains(&Action::ZoomIn),
        farther: held.contains(&Action::ZoomOut),
        boost: held.contains(&Action::Boost),
    }
}

fn object_input(held: &HashSet<Action>) -> ObjectInput {
    ObjectInput {
        pos_x: held.contains(&Action::ObjectRight),
        neg_x: held.contains(&Action::ObjectLeft),
        pos_y: held.contains(&Action::ObjectUp),
        neg_y: held.contains(&Action::ObjectDown),
        pos_z: held.contains(&Action::ObjectBack),
        neg_z: held.contains(&Action::ObjectForward),
    }
}
