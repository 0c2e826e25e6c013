/// Built-in WGSL program for the screen-space overlay quad.
///
/// Shares bind group 0 with the scene program; only the dynamic `mvp`
/// slot at binding 1 is read.
pub const OVERLAY_SHADER: &str = r#"
@group(0) @binding(1)
var<uniform> mvp: mat4x4<f32>;

struct OverlayInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct OverlayOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_overlay(vertex: OverlayInput) -> OverlayOutput {
    var out: OverlayOutput;
    out.clip_position = mvp * vec4<f32>(vertex.position, 0.0, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_overlay(in: OverlayOutput) -> @location(0) vec4<f32> {
    let edge = min(min(in.uv.x, 1.0 - in.uv.x), min(in.uv.y, 1.0 - in.uv.y));
    let border = step(edge, 0.03);
    let fill = mix(vec3<f32>(0.25, 0.45, 0.85), vec3<f32>(0.1, 0.2, 0.5), in.uv.y);
    return vec4<f32>(mix(fill, vec3<f32>(1.0, 1.0, 1.0), border), 0.85);
}
"#;

pub const OVERLAY_VERTEX_ENTRY: &str = "vs_overlay";
pub const OVERLAY_FRAGMENT_ENTRY: &str = "fs_overlay";

/// Scene vertex entry point for the instanced-attribute strategy.
pub const SCENE_INSTANCED_ENTRY: &str = "vs_instanced";
/// Scene vertex entry point for draws carrying their own `mvp`.
pub const SCENE_PER_DRAW_ENTRY: &str = "vs_per_draw";
pub const SCENE_FRAGMENT_ENTRY: &str = "fs_main";
