use std::collections::HashMap;
use std::num::NonZeroU64;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orbitview_assets::{MeshData, ShaderPair, ShaderSource, ShaderStage, TextureData};
use orbitview_render::{
    DrawCall, DrawList, Instances, MVP_UNIFORM, MeshHandle, Program, UniformTable, VIEW_PROJ_UNIFORM,
};
use orbitview_scene::{InstanceTable, OverlayQuad};
use wgpu::util::DeviceExt;

use crate::RenderError;
use crate::shaders;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;
const INITIAL_MVP_SLOTS: u64 = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct OverlayVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// One model matrix, uploaded as four `vec4` columns.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
}

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];
const OVERLAY_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

fn mesh_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRIBUTES,
    }
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

fn overlay_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OverlayVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &OVERLAY_ATTRIBUTES,
    }
}

enum Geometry {
    Indexed {
        index_buffer: wgpu::Buffer,
        index_count: u32,
    },
    Triangles {
        vertex_count: u32,
    },
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    geometry: Geometry,
    /// Scene meshes only; the overlay program has no texture group.
    texture: Option<wgpu::BindGroup>,
}

impl GpuMesh {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.geometry {
            Geometry::Indexed {
                index_buffer,
                index_count,
            } => {
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..*index_count, 0, instances);
            }
            Geometry::Triangles { vertex_count } => pass.draw(0..*vertex_count, instances),
        }
    }
}

struct ScenePipelines {
    instanced: wgpu::RenderPipeline,
    per_draw: wgpu::RenderPipeline,
}

/// wgpu renderer that replays composed draw lists.
pub struct WgpuRenderer {
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fill: ScenePipelines,
    line: Option<ScenePipelines>,
    overlay_pipeline: wgpu::RenderPipeline,
    view_proj_buffer: wgpu::Buffer,
    mvp_buffer: wgpu::Buffer,
    mvp_stride: u64,
    mvp_capacity: u64,
    uniform_bind_group: wgpu::BindGroup,
    last_mvp: HashMap<Program, Mat4>,
    staging: Vec<u8>,
    meshes: Vec<GpuMesh>,
    instance_buffer: Option<(wgpu::Buffer, u32)>,
    depth_view: wgpu::TextureView,
    uniforms: UniformTable,
    wireframe: bool,
}

impl WgpuRenderer {
    /// Compile the scene shader pair and the built-in overlay program.
    ///
    /// Line-mode scene pipelines are only built when `line_mode` is true,
    /// i.e. the device was created with `POLYGON_MODE_LINE`.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        program: &ShaderPair,
        line_mode: bool,
    ) -> Result<Self, RenderError> {
        let overlay_source = ShaderSource::from_source(
            "built-in overlay",
            ShaderStage::Vertex,
            shaders::OVERLAY_SHADER.to_string(),
        )?;
        let uniforms = UniformTable::new()
            .with(Program::Scene, program.uniforms())
            .with(Program::Overlay, overlay_source.uniforms().iter().cloned());

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[
                uniform_entry(0, false),
                uniform_entry(1, true),
            ],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let overlay_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("overlay_pipeline_layout"),
                bind_group_layouts: &[&uniform_layout],
                push_constant_ranges: &[],
            });

        let vertex_module = shader_module(
            device,
            &program.vertex.path.display().to_string(),
            &program.vertex.source,
        )?;
        let fragment_module = shader_module(
            device,
            &program.fragment.path.display().to_string(),
            &program.fragment.source,
        )?;
        let overlay_module = shader_module(device, "built-in overlay", shaders::OVERLAY_SHADER)?;

        let scene = SceneModules {
            layout: &scene_layout,
            vertex: &vertex_module,
            fragment: &fragment_module,
            format: surface_format,
        };
        let fill = scene.pipelines(device, wgpu::PolygonMode::Fill)?;
        let line = if line_mode {
            Some(scene.pipelines(device, wgpu::PolygonMode::Line)?)
        } else {
            None
        };

        let overlay_pipeline = validated(device, "overlay pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("overlay_pipeline"),
                layout: Some(&overlay_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &overlay_module,
                    entry_point: Some(shaders::OVERLAY_VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[overlay_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &overlay_module,
                    entry_point: Some(shaders::OVERLAY_FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                // Drawn last, on top of the scene.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        let view_proj_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("view_proj_buffer"),
            contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let mvp_stride = aligned_stride(MAT4_SIZE, alignment);
        let mvp_buffer = create_mvp_buffer(device, INITIAL_MVP_SLOTS, mvp_stride);
        let uniform_bind_group =
            create_uniform_bind_group(device, &uniform_layout, &view_proj_buffer, &mvp_buffer);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            uniform_layout,
            texture_layout,
            sampler,
            fill,
            line,
            overlay_pipeline,
            view_proj_buffer,
            mvp_buffer,
            mvp_stride,
            mvp_capacity: INITIAL_MVP_SLOTS,
            uniform_bind_group,
            last_mvp: HashMap::new(),
            staging: Vec::new(),
            meshes: Vec::new(),
            instance_buffer: None,
            depth_view: create_depth_view(device, width, height),
            uniforms,
            wireframe: false,
        })
    }

    /// Uniform names each program declares, for the composer's lookups.
    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    /// Upload a textured scene mesh.
    pub fn upload_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &MeshData,
        texture: &TextureData,
    ) -> MeshHandle {
        let vertices: Vec<Vertex> = mesh
            .vertices
            .iter()
            .map(|v| Vertex {
                position: v.position,
                uv: v.uv,
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_vertices", mesh.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_indices", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let texture = self.texture_bind_group(device, queue, &mesh.name, texture);

        self.push_mesh(GpuMesh {
            vertex_buffer,
            geometry: Geometry::Indexed {
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
            texture: Some(texture),
        })
    }

    /// Upload the overlay quad's pixel-space corners.
    pub fn upload_overlay(&mut self, device: &wgpu::Device, quad: &OverlayQuad) -> MeshHandle {
        let vertices = overlay_vertices(quad);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.push_mesh(GpuMesh {
            vertex_buffer,
            geometry: Geometry::Triangles {
                vertex_count: vertices.len() as u32,
            },
            texture: None,
        })
    }

    /// One-time upload of the instance table's model matrices.
    pub fn upload_instances(&mut self, device: &wgpu::Device, table: &InstanceTable) {
        if self.instance_buffer.is_some() {
            tracing::warn!("instance table already uploaded; ignoring");
            return;
        }
        if table.is_empty() {
            return;
        }
        let raw: Vec<InstanceRaw> = table
            .to_cols()
            .into_iter()
            .map(|model| InstanceRaw { model })
            .collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("instance_buffer"),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX,
        });
        tracing::info!(instances = raw.len(), "uploaded instance table");
        self.instance_buffer = Some((buffer, raw.len() as u32));
    }

    /// Switch scene polygon mode. Returns the mode now in effect.
    pub fn set_wireframe(&mut self, enabled: bool) -> bool {
        if enabled && self.line.is_none() {
            tracing::warn!("wireframe unsupported by this adapter; keeping fill mode");
            self.wireframe = false;
        } else {
            self.wireframe = enabled;
        }
        self.wireframe
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_view(device, width, height);
    }

    /// Clear to `clear` and replay `list` into `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        list: &DrawList,
        clear: [f32; 4],
    ) {
        let offsets = self.write_uniforms(device, queue, list);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let scene = match (&self.line, self.wireframe) {
                (Some(line), true) => line,
                _ => &self.fill,
            };

            for (call, offset) in list.calls().iter().zip(offsets) {
                let Some(mesh) = self.meshes.get(call.mesh.0 as usize) else {
                    tracing::warn!(mesh = call.mesh.0, "draw references unknown mesh");
                    continue;
                };
                match call.program {
                    Program::Scene => {
                        let Some(texture) = &mesh.texture else {
                            tracing::warn!(mesh = call.mesh.0, "scene draw with untextured mesh");
                            continue;
                        };
                        let instances = match call.instances {
                            Instances::Single => {
                                pass.set_pipeline(&scene.per_draw);
                                0..1
                            }
                            Instances::Attributes { count } => {
                                let Some((buffer, uploaded)) = &self.instance_buffer else {
                                    tracing::warn!("instanced draw before instance upload");
                                    continue;
                                };
                                pass.set_pipeline(&scene.instanced);
                                pass.set_vertex_buffer(1, buffer.slice(..));
                                0..count.min(*uploaded)
                            }
                        };
                        pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                        pass.set_bind_group(1, texture, &[]);
                        mesh.draw(&mut pass, instances);
                    }
                    Program::Overlay => {
                        pass.set_pipeline(&self.overlay_pipeline);
                        pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                        mesh.draw(&mut pass, 0..1);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Stage every draw's `mvp` into its own dynamic-offset slot and write
    /// `view_proj` directly. Returns the byte offset for each call.
    fn write_uniforms(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        list: &DrawList,
    ) -> Vec<u32> {
        let (slots, view_proj) = resolve_uniform_slots(list.calls(), &mut self.last_mvp);
        if let Some(view_proj) = view_proj {
            queue.write_buffer(
                &self.view_proj_buffer,
                0,
                bytemuck::cast_slice(&view_proj.to_cols_array()),
            );
        }

        self.ensure_mvp_capacity(device, slots.len() as u64);

        let stride = self.mvp_stride as usize;
        self.staging.clear();
        self.staging.resize(slots.len() * stride, 0);
        for (i, mvp) in slots.iter().enumerate() {
            let start = i * stride;
            let cols = mvp.to_cols_array();
            let bytes: &[u8] = bytemuck::cast_slice(&cols);
            self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !self.staging.is_empty() {
            queue.write_buffer(&self.mvp_buffer, 0, &self.staging);
        }

        (0..slots.len() as u64)
            .map(|i| (i * self.mvp_stride) as u32)
            .collect()
    }

    fn ensure_mvp_capacity(&mut self, device: &wgpu::Device, slots: u64) {
        if slots <= self.mvp_capacity {
            return;
        }
        let capacity = slots.next_power_of_two();
        self.mvp_buffer = create_mvp_buffer(device, capacity, self.mvp_stride);
        self.mvp_capacity = capacity;
        self.uniform_bind_group = create_uniform_bind_group(
            device,
            &self.uniform_layout,
            &self.view_proj_buffer,
            &self.mvp_buffer,
        );
        tracing::debug!(capacity, "grew mvp uniform buffer");
    }

    fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        texture: &TextureData,
    ) -> wgpu::BindGroup {
        let size = wgpu::Extent3d {
            width: texture.width,
            height: texture.height,
            depth_or_array_layers: 1,
        };
        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture.width),
                rows_per_image: Some(texture.height),
            },
            size,
        );
        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn push_mesh(&mut self, mesh: GpuMesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle((self.meshes.len() - 1) as u32)
    }
}

/// Scene shader modules plus what every scene pipeline shares.
struct SceneModules<'a> {
    layout: &'a wgpu::PipelineLayout,
    vertex: &'a wgpu::ShaderModule,
    fragment: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
}

impl SceneModules<'_> {
    fn pipelines(
        &self,
        device: &wgpu::Device,
        polygon_mode: wgpu::PolygonMode,
    ) -> Result<ScenePipelines, RenderError> {
        Ok(ScenePipelines {
            instanced: self.pipeline(
                device,
                shaders::SCENE_INSTANCED_ENTRY,
                &[mesh_layout(), instance_layout()],
                polygon_mode,
            )?,
            per_draw: self.pipeline(
                device,
                shaders::SCENE_PER_DRAW_ENTRY,
                &[mesh_layout()],
                polygon_mode,
            )?,
        })
    }

    fn pipeline(
        &self,
        device: &wgpu::Device,
        entry: &str,
        buffers: &[wgpu::VertexBufferLayout<'_>],
        polygon_mode: wgpu::PolygonMode,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        let label = format!("scene_{entry}_{polygon_mode:?}");
        validated(device, &label, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&label),
                layout: Some(self.layout),
                vertex: wgpu::VertexState {
                    module: self.vertex,
                    entry_point: Some(entry),
                    compilation_options: Default::default(),
                    buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: self.fragment,
                    entry_point: Some(shaders::SCENE_FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })
    }
}

/// Run `create` inside a validation error scope so a bad shader or
/// pipeline becomes an error instead of a device-lost panic.
fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(RenderError::Validation {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(value),
    }
}

fn shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    validated(device, label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
}

fn uniform_entry(binding: u32, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(MAT4_SIZE),
        },
        count: None,
    }
}

fn create_mvp_buffer(device: &wgpu::Device, slots: u64, stride: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mvp_buffer"),
        size: slots * stride,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view_proj: &wgpu::Buffer,
    mvp: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: view_proj.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: mvp,
                    offset: 0,
                    size: NonZeroU64::new(MAT4_SIZE),
                }),
            },
        ],
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

/// The `mvp` value each call's dynamic-offset slot holds, plus the last
/// `view_proj` written in the list. A call without an `mvp` write keeps the
/// previous value for its program, or identity before the first write.
fn resolve_uniform_slots(
    calls: &[DrawCall],
    last_mvp: &mut HashMap<Program, Mat4>,
) -> (Vec<Mat4>, Option<Mat4>) {
    let mut view_proj = None;
    let mut slots = Vec::with_capacity(calls.len());
    for call in calls {
        match call.uniform {
            Some(write) if write.name == VIEW_PROJ_UNIFORM => view_proj = Some(write.value),
            Some(write) if write.name == MVP_UNIFORM => {
                last_mvp.insert(call.program, write.value);
            }
            Some(write) => {
                tracing::debug!(uniform = write.name, "uniform has no GPU slot");
            }
            None => {}
        }
        slots.push(
            last_mvp
                .get(&call.program)
                .copied()
                .unwrap_or(Mat4::IDENTITY),
        );
    }
    (slots, view_proj)
}

/// Round `size` up to a multiple of `alignment`.
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}

fn overlay_vertices(quad: &OverlayQuad) -> [OverlayVertex; 6] {
    let rect = quad.rect();
    let (w, h) = (rect.width.max(f32::EPSILON), rect.height.max(f32::EPSILON));
    quad.corners().map(|[x, y]| OverlayVertex {
        position: [x, y],
        uv: [(x - rect.x) / w, (y - rect.y) / h],
    })
}
