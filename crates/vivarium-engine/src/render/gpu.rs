//! wgpu renderer for particle systems and the overlay draw list.
//!
//! # Architecture
//!
//! The renderer does not own the event loop; [`run_windowed`](super::run_windowed)
//! calls [`GpuRenderer::render`] once per redraw with the spawner's
//! [`ParticleSystem`] and the overlay's [`DrawCommand`]s.
//!
//! Two pipelines share one render pass:
//!
//! 1. **particles** -- the installed sprite mesh, one instance per visible
//!    particle, textured and alpha blended. Instances are sorted by
//!    descending z, so with `z = -layer` higher layers land on top.
//! 2. **overlay** -- flat quads in screen pixels, drawn last.
//!
//! Sprite GPU resources are re-uploaded whenever the particle system's
//! mesh generation changes.

use std::sync::Arc;

use vivarium_core::appearance::{SpriteGeometry, SpriteTexture};
use wgpu::util::DeviceExt;

use crate::batch::ParticleSystem;
use crate::mesh::{RenderMaterial, RenderMesh};
use crate::overlay::DrawCommand;
use crate::particle::Particle;

// ---------------------------------------------------------------------------
// Vertex formats
// ---------------------------------------------------------------------------

/// One sprite mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    uv: [f32; 2],
    color: [f32; 4],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-particle instance data.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct InstanceRaw {
    position: [f32; 3],
    rotation: f32,
    size: [f32; 3],
    _pad: f32,
    color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: 12,
            shader_location: 4,
            format: wgpu::VertexFormat::Float32,
        },
        wgpu::VertexAttribute {
            offset: 16,
            shader_location: 5,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: 32,
            shader_location: 6,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn from_particle(particle: &Particle, tint: [f32; 4]) -> Self {
        let c = particle.start_color;
        Self {
            position: particle.position.to_array(),
            rotation: particle.rotation,
            size: particle.start_size.to_array(),
            _pad: 0.0,
            color: [c[0] * tint[0], c[1] * tint[1], c[2] * tint[2], c[3] * tint[3]],
        }
    }
}

/// Flat overlay vertex in screen pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct OverlayVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const VERTICES_PER_QUAD: usize = 6;

/// Starting buffer sizes; both grow on demand.
const INITIAL_INSTANCES: usize = 1024;
const INITIAL_OVERLAY_QUADS: usize = 4096;

// ---------------------------------------------------------------------------
// Camera2D
// ---------------------------------------------------------------------------

/// A 2D orthographic camera over world space, y up.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Width of the visible area in world units.
    pub width: f32,
    /// Height of the visible area in world units.
    pub height: f32,
    /// Camera center X in world units.
    pub x: f32,
    /// Camera center Y in world units.
    pub y: f32,
}

impl Camera2D {
    /// Column-major orthographic projection mapping the visible area to
    /// clip space `[-1, 1]`.
    pub fn orthographic_matrix(&self) -> [f32; 16] {
        let sx = 2.0 / self.width;
        let sy = 2.0 / self.height;
        let tx = -self.x * sx;
        let ty = -self.y * sy;
        [
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            tx, ty, 0.0, 1.0,
        ]
    }

    /// Projection for screen pixels: origin top-left, y down.
    pub fn screen_space_matrix(width: f32, height: f32) -> [f32; 16] {
        let sx = 2.0 / width.max(1.0);
        let sy = -2.0 / height.max(1.0);
        [
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            -1.0, 1.0, 0.0, 1.0,
        ]
    }

    /// Keep the visible height and match the width to `aspect`.
    pub fn fit_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.width = self.height * aspect;
        }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// GPU resources
// ---------------------------------------------------------------------------

/// Uniform buffer plus its bind group.
struct CameraBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        matrix: &[f32; 16],
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(matrix),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// Uploaded sprite mesh and texture.
struct SpriteResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    texture_bind_group: wgpu::BindGroup,
    tint: [f32; 4],
    instanced: bool,
    /// Mesh generation these resources were built from.
    generation: u64,
}

impl SpriteResources {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        mesh: &RenderMesh,
        material: &RenderMaterial,
        generation: u64,
    ) -> Self {
        let vertices: Vec<MeshVertex> = mesh
            .positions
            .iter()
            .zip(&mesh.uvs)
            .zip(&mesh.colors)
            .map(|((p, uv), color)| MeshVertex {
                position: p.to_array(),
                uv: uv.to_array(),
                color: *color,
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture_bind_group = upload_texture(device, queue, layout, &material.texture);

        tracing::debug!(
            generation,
            vertices = vertices.len(),
            texture = %material.texture.label,
            "sprite resources uploaded"
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            texture_bind_group,
            tint: material.color,
            instanced: material.enable_instancing,
            generation,
        }
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    texture: &SpriteTexture,
) -> wgpu::BindGroup {
    let gpu_texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(texture.label.as_str()),
            size: wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &texture.rgba,
    );
    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sprite_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("sprite_texture_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

/// A vertex buffer that is reallocated when data outgrows it.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    element_size: usize,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, element_size: usize, capacity: usize) -> Self {
        Self {
            buffer: Self::allocate(device, label, element_size, capacity),
            capacity,
            element_size,
            label,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        element_size: usize,
        capacity: usize,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * element_size) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write<T: bytemuck::Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.label, self.element_size, self.capacity);
            tracing::debug!(label = self.label, capacity = self.capacity, "vertex buffer grown");
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
    }
}

// ---------------------------------------------------------------------------
// GpuRenderer
// ---------------------------------------------------------------------------

/// wgpu renderer for one window.
///
/// Call [`GpuRenderer::new`] with an `Arc<winit::window::Window>`. If no
/// suitable GPU is available the error is returned and the caller can fall
/// back to headless operation.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    particle_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    world_camera: CameraBinding,
    screen_camera: CameraBinding,
    texture_layout: wgpu::BindGroupLayout,
    sprite: SpriteResources,
    instances: GrowableBuffer,
    overlay_vertices: GrowableBuffer,
    window: Arc<winit::window::Window>,
    /// World-space camera for particles.
    pub camera: Camera2D,
    /// Frame clear color.
    pub clear_color: wgpu::Color,
}

impl GpuRenderer {
    /// Initialize surface, device, pipelines and a default white quad
    /// sprite.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("vivarium_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let mut camera = Camera2D::default();
        camera.fit_aspect(width as f32 / height as f32);
        let world_camera = CameraBinding::new(
            &device,
            &camera_layout,
            "world_camera",
            &camera.orthographic_matrix(),
        );
        let screen_camera = CameraBinding::new(
            &device,
            &camera_layout,
            "screen_camera",
            &Camera2D::screen_space_matrix(width as f32, height as f32),
        );

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
        });
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("overlay_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
        });

        let particle_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let overlay_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay_pipeline_layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let particle_pipeline = create_pipeline(
            &device,
            "particle_pipeline",
            &particle_layout,
            &particle_shader,
            &[MeshVertex::desc(), InstanceRaw::desc()],
            config.format,
        );
        let overlay_pipeline = create_pipeline(
            &device,
            "overlay_pipeline",
            &overlay_layout,
            &overlay_shader,
            &[OverlayVertex::desc()],
            config.format,
        );

        let default_mesh = RenderMesh::from_sprite(&SpriteGeometry::unit_quad())?;
        let default_material =
            RenderMaterial::instanced_sprite(SpriteTexture::solid("white", [255; 4]));
        let sprite = SpriteResources::upload(
            &device,
            &queue,
            &texture_layout,
            &default_mesh,
            &default_material,
            0,
        );

        let instances = GrowableBuffer::new(
            &device,
            "particle_instances",
            std::mem::size_of::<InstanceRaw>(),
            INITIAL_INSTANCES,
        );
        let overlay_vertices = GrowableBuffer::new(
            &device,
            "overlay_vertices",
            std::mem::size_of::<OverlayVertex>(),
            INITIAL_OVERLAY_QUADS * VERTICES_PER_QUAD,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_pipeline,
            overlay_pipeline,
            world_camera,
            screen_camera,
            texture_layout,
            sprite,
            instances,
            overlay_vertices,
            window,
            camera,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.1,
                a: 1.0,
            },
        })
    }

    /// Re-upload the sprite if the particle system installed a new mesh.
    fn sync_sprite(&mut self, system: &ParticleSystem) {
        let generation = system.mesh_generation();
        if generation == self.sprite.generation {
            return;
        }
        if let (Some(mesh), Some(material)) = (system.mesh(), system.material()) {
            self.sprite = SpriteResources::upload(
                &self.device,
                &self.queue,
                &self.texture_layout,
                mesh,
                material,
                generation,
            );
        }
    }

    /// Render one frame: visible particles, then the overlay on top.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g., window minimized, surface lost).
    pub fn render(
        &mut self,
        system: &ParticleSystem,
        overlay: &[DrawCommand],
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_sprite(system);

        self.queue.write_buffer(
            &self.world_camera.buffer,
            0,
            bytemuck::cast_slice(&self.camera.orthographic_matrix()),
        );
        self.queue.write_buffer(
            &self.screen_camera.buffer,
            0,
            bytemuck::cast_slice(&Camera2D::screen_space_matrix(
                self.config.width as f32,
                self.config.height as f32,
            )),
        );

        let instances = sorted_instances(system.visible_particles(), self.sprite.tint);
        self.instances.write(&self.device, &self.queue, &instances);

        let overlay_vertices = overlay_vertices(overlay);
        self.overlay_vertices
            .write(&self.device, &self.queue, &overlay_vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vivarium_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vivarium_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let instance_count = instances.len() as u32;
            if instance_count > 0 && self.sprite.index_count > 0 {
                pass.set_pipeline(&self.particle_pipeline);
                pass.set_bind_group(0, &self.world_camera.bind_group, &[]);
                pass.set_bind_group(1, &self.sprite.texture_bind_group, &[]);
                pass.set_vertex_buffer(0, self.sprite.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
                pass.set_index_buffer(self.sprite.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                if self.sprite.instanced {
                    pass.draw_indexed(0..self.sprite.index_count, 0, 0..instance_count);
                } else {
                    for i in 0..instance_count {
                        pass.draw_indexed(0..self.sprite.index_count, 0, i..i + 1);
                    }
                }
            }

            let vertex_count = overlay_vertices.len() as u32;
            if vertex_count > 0 {
                pass.set_pipeline(&self.overlay_pipeline);
                pass.set_bind_group(0, &self.screen_camera.bind_group, &[]);
                pass.set_vertex_buffer(0, self.overlay_vertices.buffer.slice(..));
                pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Resize the surface and refit the camera. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera
                .fit_aspect(new_size.width as f32 / new_size.height as f32);
        }
    }

    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// Instance data in painter's order: descending z, so higher layers
/// (more negative z) are drawn last.
fn sorted_instances(particles: &[Particle], tint: [f32; 4]) -> Vec<InstanceRaw> {
    let mut ordered: Vec<&Particle> = particles.iter().collect();
    ordered.sort_by(|a, b| b.position.z.total_cmp(&a.position.z));
    ordered
        .into_iter()
        .map(|p| InstanceRaw::from_particle(p, tint))
        .collect()
}

/// Two triangles per overlay command.
fn overlay_vertices(commands: &[DrawCommand]) -> Vec<OverlayVertex> {
    let mut vertices = Vec::with_capacity(commands.len() * VERTICES_PER_QUAD);
    for cmd in commands {
        let half_w = cmd.width / 2.0;
        let half_h = cmd.height / 2.0;
        let (left, right) = (cmd.x - half_w, cmd.x + half_w);
        let (top, bottom) = (cmd.y - half_h, cmd.y + half_h);
        for position in [
            [left, top],
            [right, top],
            [right, bottom],
            [left, top],
            [right, bottom],
            [left, bottom],
        ] {
            vertices.push(OverlayVertex {
                position,
                color: cmd.color,
            });
        }
    }
    vertices
}
