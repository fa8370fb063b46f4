/// wgpu rendering pipeline: draws a frame's display list as textured quads
/// sampled from the glyph atlas, alpha-blended in paint order.

use crate::core::Color;
use crate::renderer::atlas::GlyphAtlas;
use crate::renderer::frame::{DrawCommand, Frame, Rect};

use std::sync::Arc;
use winit::window::Window;

/// Per-vertex data for a quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellVertex {
    /// Position in normalized device coordinates
    pub position: [f32; 2],
    /// UV coordinates into glyph atlas
    pub uv: [f32; 2],
    /// Premultiplied-free RGBA color
    pub color: [f32; 4],
}

impl CellVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // uv
        2 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CellVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Holds all wgpu state for rendering.
pub struct RenderState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    atlas_texture: wgpu::Texture,
    atlas_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    max_quads: usize,
}

impl RenderState {
    /// Create the surface, device and pipeline for `window`.
    pub fn new(window: Arc<Window>, atlas_size: (u32, u32), max_quads: usize) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("termgrid-device"),
                ..Default::default()
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (pipeline, atlas_texture, atlas_bind_group) =
            Self::create_pipeline(&device, atlas_size, format);

        let (vertex_buffer, index_buffer) = Self::create_buffers(&device, max_quads);

        log::info!("Renderer ready: {:?}, {}x{}", format, config.width, config.height);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            pipeline,
            atlas_texture,
            atlas_bind_group,
            vertex_buffer,
            index_buffer,
            max_quads,
        })
    }

    fn create_buffers(device: &wgpu::Device, max_quads: usize) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad-vertices"),
            size: (max_quads * 4 * std::mem::size_of::<CellVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad-indices"),
            size: (max_quads * 6 * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        (vertex_buffer, index_buffer)
    }

    fn create_pipeline(
        device: &wgpu::Device,
        atlas_size: (u32, u32),
        target_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::Texture, wgpu::BindGroup) {
        let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glyph-atlas"),
            size: wgpu::Extent3d {
                width: atlas_size.0,
                height: atlas_size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let atlas_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("atlas-bind-group-layout"),
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

        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&atlas_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&atlas_sampler) },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[CellVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, atlas_texture, atlas_bind_group)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload atlas texture if dirty.
    pub fn update_atlas(&self, atlas: &mut GlyphAtlas) {
        if !atlas.dirty {
            return;
        }
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas.atlas_width),
                rows_per_image: Some(atlas.atlas_height),
            },
            wgpu::Extent3d {
                width: atlas.atlas_width,
                height: atlas.atlas_height,
                depth_or_array_layers: 1,
            },
        );
        atlas.dirty = false;
    }

    /// Draw `frame` to the window surface and present it.
    pub fn draw(&mut self, frame: &Frame, atlas: Option<&mut GlyphAtlas>) {
        let (vertices, indices) = match atlas {
            Some(atlas) => {
                let built = build_vertices(frame, Some(&mut *atlas));
                self.update_atlas(atlas);
                built
            }
            None => build_vertices(frame, None),
        };

        let quads = vertices.len() / 4;
        if quads > self.max_quads {
            self.max_quads = quads.next_power_of_two();
            let (vb, ib) = Self::create_buffers(&self.device, self.max_quads);
            self.vertex_buffer = vb;
            self.index_buffer = ib;
            log::debug!("Grew quad buffers to {}", self.max_quads);
        }

        if !vertices.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            self.queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("grid-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !indices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.atlas_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Convert a display list to quads. Glyphs are skipped when no atlas is
/// available; fills sample the atlas' solid texel.
pub fn build_vertices(frame: &Frame, mut atlas: Option<&mut GlyphAtlas>) -> (Vec<CellVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(frame.commands.len() * 4);
    let mut indices = Vec::with_capacity(frame.commands.len() * 6);

    let sw = frame.surface_width.max(1) as f32;
    let sh = frame.surface_height.max(1) as f32;
    let solid = atlas
        .as_deref()
        .map(GlyphAtlas::solid_uv)
        .unwrap_or([0.5 / 1024.0, 0.5 / 1024.0]);

    for cmd in &frame.commands {
        match cmd {
            DrawCommand::FillRect { rect, color } => {
                if rect.width == 0 || rect.height == 0 {
                    continue;
                }
                let Rect { x, y, width, height } = *rect;
                push_quad(
                    &mut vertices,
                    &mut indices,
                    [x as f32, y as f32, (x + width) as f32, (y + height) as f32],
                    [solid[0], solid[1], solid[0], solid[1]],
                    *color,
                    sw,
                    sh,
                );
            }
            DrawCommand::Glyph { x, y, ch, color, .. } => {
                let Some(atlas) = atlas.as_deref_mut() else { continue };
                let glyph = atlas.get_glyph(*ch);
                if glyph.width == 0 || glyph.height == 0 {
                    continue;
                }
                let x0 = *x as f32 + glyph.offset_x;
                let y0 = *y as f32 + atlas.ascent - (glyph.offset_y + glyph.height as f32);
                let aw = atlas.atlas_width as f32;
                let ah = atlas.atlas_height as f32;
                push_quad(
                    &mut vertices,
                    &mut indices,
                    [x0, y0, x0 + glyph.width as f32, y0 + glyph.height as f32],
                    [
                        glyph.x as f32 / aw,
                        glyph.y as f32 / ah,
                        (glyph.x + glyph.width) as f32 / aw,
                        (glyph.y + glyph.height) as f32 / ah,
                    ],
                    *color,
                    sw,
                    sh,
                );
            }
        }
    }

    (vertices, indices)
}

fn push_quad(
    vertices: &mut Vec<CellVertex>,
    indices: &mut Vec<u32>,
    [x0, y0, x1, y1]: [f32; 4],
    [u0, v0, u1, v1]: [f32; 4],
    color: Color,
    screen_width: f32,
    screen_height: f32,
) {
    // Normalize to NDC (-1..1)
    let nx0 = (x0 / screen_width) * 2.0 - 1.0;
    let ny0 = 1.0 - (y0 / screen_height) * 2.0;
    let nx1 = (x1 / screen_width) * 2.0 - 1.0;
    let ny1 = 1.0 - (y1 / screen_height) * 2.0;
    let color = color_to_f32(color);

    let base = vertices.len() as u32;
    vertices.extend_from_slice(&[
        CellVertex { position: [nx0, ny0], uv: [u0, v0], color },
        CellVertex { position: [nx1, ny0], uv: [u1, v0], color },
        CellVertex { position: [nx1, ny1], uv: [u1, v1], color },
        CellVertex { position: [nx0, ny1], uv: [u0, v1], color },
    ]);
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

fn color_to_f32(c: Color) -> [f32; 4] {
    [
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        c.a as f32 / 255.0,
    ]
}

const SHADER_SRC: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@group(0) @binding(0) var atlas_texture: texture_2d<f32>;
@group(0) @binding(1) var atlas_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = textureSample(atlas_texture, atlas_sampler, in.uv).r;
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;
