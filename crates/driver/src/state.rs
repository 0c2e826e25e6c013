use orbitview_common::Viewport;
use orbitview_input::{EdgeDetector, KeyBindings};
use orbitview_render::{MeshHandle, SceneComposer};
use orbitview_scene::{InstanceTable, MovingObject, OrbitCamera, OverlayQuad};

use crate::config::DemoConfig;

/// Backend handles for the three things drawn each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneMeshes {
    pub instanced: MeshHandle,
    pub object: MeshHandle,
    pub overlay: MeshHandle,
}

/// Window-side toggles flipped by edge-triggered keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggles {
    pub cursor_hidden: bool,
    pub wireframe: bool,
}

/// Everything the frame loop mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct AppState {
    pub camera: OrbitCamera,
    pub object: MovingObject,
    pub instances: InstanceTable,
    pub overlay: OverlayQuad,
    pub composer: SceneComposer,
    pub bindings: KeyBindings,
    pub toggles: Toggles,
    pub(crate) edges: EdgeDetector,
}

impl AppState {
    pub fn new(
        camera: OrbitCamera,
        object: MovingObject,
        instances: InstanceTable,
        composer: SceneComposer,
        bindings: KeyBindings,
    ) -> Self {
        let edges = bindings.edge_detector();
        Self {
            camera,
            object,
            instances,
            overlay: OverlayQuad::default(),
            composer,
            bindings,
            toggles: Toggles::default(),
            edges,
        }
    }

    /// Build the demo scene described by `config`, generating the instance
    /// table once.
    pub fn from_config(config: &DemoConfig) -> Self {
        let seed = config.instances.resolve_seed();
        let instances =
            InstanceTable::generate(config.instances.count, seed, &config.instances.params);
        tracing::info!(
            count = instances.len(),
            seed,
            strategy = ?config.instances.strategy,
            "generated instance table"
        );

        let camera = OrbitCamera::new(config.camera.radius, config.camera.speed);
        let object = MovingObject::new(
            config.object.move_speed,
            config.object.scale,
            config.object.rotation_axis,
            config.object.rotation_degrees,
        );
        let composer = SceneComposer::new(
            Viewport::new(config.window.width, config.window.height),
            config.instances.strategy,
        );
        Self::new(camera, object, instances, composer, KeyBindings::default())
    }

    /// Drop edge history, e.g. after the window loses focus.
    pub fn reset_edges(&mut self) {
        self.edges.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitview_render::DrawStrategy;

    #[test]
    fn from_config_uses_seed_and_sizes() {
        let mut config = DemoConfig::default();
        config.instances.count = 12;
        config.instances.seed = Some(5);
        config.instances.strategy = DrawStrategy::PerInstanceUniform;
        config.camera.radius = 0.2;

        let state = AppState::from_config(&config);
        assert_eq!(state.instances.len(), 12);
        assert_eq!(state.instances.seed(), 5);
        assert_eq!(state.camera.radius(), 1.0);
        assert_eq!(state.composer.strategy(), DrawStrategy::PerInstanceUniform);
        assert_eq!(state.composer.viewport(), Viewport::new(800, 600));
        assert_eq!(state.toggles, Toggles::default());
    }

    #[test]
    fn same_seed_same_field() {
        let mut config = DemoConfig::default();
        config.instances.count = 32;
        config.instances.seed = Some(77);
        let a = AppState::from_config(&config);
        let b = AppState::from_config(&config);
        assert_eq!(a.instances.matrices(), b.instances.matrices());
    }
}
