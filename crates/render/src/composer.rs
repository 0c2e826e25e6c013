use glam::Mat4;
use orbitview_common::Viewport;
use orbitview_scene::{InstanceTable, MovingObject, OrbitCamera, OverlayQuad};
use serde::{Deserialize, Serialize};

use crate::draw::{DrawCall, DrawTarget, Instances, MeshHandle, Program, UniformWrite};
use crate::{MVP_UNIFORM, VIEW_PROJ_UNIFORM};

/// How the instanced field is submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStrategy {
    /// One draw for every instance: a shared `view_proj` uniform plus the
    /// per-instance model matrices bound as vertex attributes.
    #[default]
    Instanced,
    /// One draw per instance, each with its own `mvp` uniform.
    PerInstanceUniform,
}

/// Turns camera and scene state into draw calls.
///
/// Holds the current viewport so the aspect ratio and overlay projection
/// follow window resizes.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    viewport: Viewport,
    strategy: DrawStrategy,
}

impl SceneComposer {
    pub fn new(viewport: Viewport, strategy: DrawStrategy) -> Self {
        Self { viewport, strategy }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    /// `projection(aspect) · view`.
    pub fn view_projection(&self, camera: &OrbitCamera) -> Mat4 {
        camera.projection_matrix(self.viewport.aspect_ratio()) * camera.view_matrix()
    }

    /// `projection · view · model` for every instance, in table order.
    pub fn instance_transforms(&self, camera: &OrbitCamera, table: &InstanceTable) -> Vec<Mat4> {
        let vp = self.view_projection(camera);
        table.matrices().iter().map(|model| vp * *model).collect()
    }

    /// Submit the instanced field using the configured strategy.
    pub fn render_instanced(
        &self,
        camera: &OrbitCamera,
        table: &InstanceTable,
        mesh: MeshHandle,
        target: &mut impl DrawTarget,
    ) {
        if table.is_empty() {
            return;
        }
        match self.strategy {
            DrawStrategy::Instanced => {
                let uniform = checked_uniform(
                    target,
                    Program::Scene,
                    VIEW_PROJ_UNIFORM,
                    self.view_projection(camera),
                );
                target.draw(DrawCall {
                    program: Program::Scene,
                    mesh,
                    uniform,
                    instances: Instances::Attributes {
                        count: table.len() as u32,
                    },
                });
            }
            DrawStrategy::PerInstanceUniform => {
                let present = uniform_present(target, Program::Scene, MVP_UNIFORM);
                for mvp in self.instance_transforms(camera, table) {
                    target.draw(DrawCall {
                        program: Program::Scene,
                        mesh,
                        uniform: present.then_some(UniformWrite {
                            name: MVP_UNIFORM,
                            value: mvp,
                        }),
                        instances: Instances::Single,
                    });
                }
            }
        }
    }

    /// Submit the moving object: `projection · view · object model`.
    pub fn render_single_object(
        &self,
        camera: &OrbitCamera,
        object: &MovingObject,
        mesh: MeshHandle,
        target: &mut impl DrawTarget,
    ) {
        let mvp = self.view_projection(camera) * object.model_matrix();
        let uniform = checked_uniform(target, Program::Scene, MVP_UNIFORM, mvp);
        target.draw(DrawCall {
            program: Program::Scene,
            mesh,
            uniform,
            instances: Instances::Single,
        });
    }

    /// Hit-test the cursor against the overlay quad and submit it with a
    /// pixel-space orthographic projection.
    pub fn render_overlay_quad(
        &self,
        overlay: &mut OverlayQuad,
        cursor: (f64, f64),
        mesh: MeshHandle,
        target: &mut impl DrawTarget,
    ) {
        if overlay.update_hover(cursor) {
            // TODO: swap the overlay texture while hovered once a hover texture is loaded.
            tracing::debug!(hovered = overlay.is_hovered(), "overlay hover changed");
        }
        let projection = OverlayQuad::projection(self.viewport);
        let uniform = checked_uniform(target, Program::Overlay, MVP_UNIFORM, projection);
        target.draw(DrawCall {
            program: Program::Overlay,
            mesh,
            uniform,
            instances: Instances::Single,
        });
    }
}

fn uniform_present(target: &impl DrawTarget, program: Program, name: &'static str) -> bool {
    let present = target.has_uniform(program, name);
    if !present {
        tracing::warn!(uniform = name, ?program, "could not find uniform location");
    }
    present
}

fn checked_uniform(
    target: &impl DrawTarget,
    program: Program,
    name: &'static str,
    value: Mat4,
) -> Option<UniformWrite> {
    uniform_present(target, program, name).then_some(UniformWrite { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawList, UniformTable};
    use glam::Vec3;
    use orbitview_scene::InstanceParams;

    fn full_uniforms() -> UniformTable {
        UniformTable::new()
            .with(Program::Scene, [VIEW_PROJ_UNIFORM, MVP_UNIFORM])
            .with(Program::Overlay, [MVP_UNIFORM])
    }

    fn composer(strategy: DrawStrategy) -> SceneComposer {
        SceneComposer::new(Viewport::new(800, 600), strategy)
    }

    #[test]
    fn instance_transform_is_projection_view_model() {
        let mut camera = OrbitCamera::new(10.0, 1.0);
        camera.toggle_mode();
        camera.update(0.7);
        let table = InstanceTable::generate(16, 11, &InstanceParams::default());
        let composer = composer(DrawStrategy::PerInstanceUniform);

        let p = camera.projection_matrix(800.0 / 600.0);
        let v = camera.view_matrix();
        let transforms = composer.instance_transforms(&camera, &table);
        for (mvp, model) in transforms.iter().zip(table.matrices()) {
            assert_eq!(*mvp, p * v * *model);
        }
    }

    #[test]
    fn composition_order_matters() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let table = InstanceTable::generate(1, 2, &InstanceParams::default());
        let composer = composer(DrawStrategy::Instanced);
        let p = camera.projection_matrix(800.0 / 600.0);
        let v = camera.view_matrix();
        let m = table.matrices()[0];
        let mvp = composer.instance_transforms(&camera, &table)[0];
        assert_ne!(mvp, m * v * p);
    }

    #[test]
    fn instanced_strategy_issues_one_draw() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let table = InstanceTable::generate(100, 1, &InstanceParams::default());
        let composer = composer(DrawStrategy::Instanced);
        let mut list = DrawList::new(full_uniforms());

        composer.render_instanced(&camera, &table, MeshHandle(0), &mut list);

        assert_eq!(list.len(), 1);
        let call = &list.calls()[0];
        assert_eq!(call.instances, Instances::Attributes { count: 100 });
        let uniform = call.uniform.expect("view_proj uniform");
        assert_eq!(uniform.name, VIEW_PROJ_UNIFORM);
        assert_eq!(uniform.value, composer.view_projection(&camera));
    }

    #[test]
    fn per_instance_strategy_issues_draw_per_instance() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let table = InstanceTable::generate(25, 1, &InstanceParams::default());
        let composer = composer(DrawStrategy::PerInstanceUniform);
        let mut list = DrawList::new(full_uniforms());

        composer.render_instanced(&camera, &table, MeshHandle(3), &mut list);

        assert_eq!(list.len(), 25);
        let expected = composer.instance_transforms(&camera, &table);
        for (call, mvp) in list.calls().iter().zip(expected) {
            assert_eq!(call.mesh, MeshHandle(3));
            assert_eq!(call.instances, Instances::Single);
            assert_eq!(call.uniform.map(|u| u.value), Some(mvp));
        }
    }

    #[test]
    fn empty_table_draws_nothing() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let table = InstanceTable::generate(0, 1, &InstanceParams::default());
        let mut list = DrawList::new(full_uniforms());
        composer(DrawStrategy::Instanced).render_instanced(&camera, &table, MeshHandle(0), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn missing_uniform_still_draws() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let object = MovingObject::default();
        let mut list = DrawList::new(UniformTable::new());

        composer(DrawStrategy::Instanced).render_single_object(
            &camera,
            &object,
            MeshHandle(1),
            &mut list,
        );

        assert_eq!(list.len(), 1);
        assert!(list.calls()[0].uniform.is_none());
    }

    #[test]
    fn single_object_mvp() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let mut object = MovingObject::new(5.0, 0.5, Vec3::Y, 90.0);
        object.set_position(Vec3::new(1.0, 0.0, -2.0));
        let composer = composer(DrawStrategy::Instanced);
        let mut list = DrawList::new(full_uniforms());

        composer.render_single_object(&camera, &object, MeshHandle(1), &mut list);

        let uniform = list.calls()[0].uniform.expect("mvp uniform");
        assert_eq!(uniform.name, MVP_UNIFORM);
        assert_eq!(
            uniform.value,
            composer.view_projection(&camera) * object.model_matrix()
        );
    }

    #[test]
    fn overlay_follows_viewport_and_hover() {
        let mut composer = composer(DrawStrategy::Instanced);
        composer.resize(Viewport::new(1024, 768));
        let mut overlay = OverlayQuad::default();
        let mut list = DrawList::new(full_uniforms());

        composer.render_overlay_quad(&mut overlay, (150.0, 150.0), MeshHandle(2), &mut list);

        assert!(overlay.is_hovered());
        let call = &list.calls()[0];
        assert_eq!(call.program, Program::Overlay);
        assert_eq!(
            call.uniform.map(|u| u.value),
            Some(OverlayQuad::projection(Viewport::new(1024, 768)))
        );
    }

    #[test]
    fn projection_follows_resize() {
        let camera = OrbitCamera::new(10.0, 1.0);
        let mut composer = composer(DrawStrategy::Instanced);
        let before = composer.view_projection(&camera);
        composer.resize(Viewport::new(600, 600));
        let after = composer.view_projection(&camera);
        assert_ne!(before, after);
        assert_eq!(after, camera.projection_matrix(1.0) * camera.view_matrix());
    }
}
