//! Batched 2D rendering of a [`Canvas`].
//!
//! [`tessellate`] turns the display list into triangles grouped by the texture
//! they sample, preserving draw order. [`Draw2d`] owns the GPU side: pipelines,
//! the uploaded sprite images and glyph atlases, and the letterboxed render pass.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::ops::Range;

use glam::{Affine2, Vec2};
use image::RgbaImage;

use crate::assets::{FontAtlas, Fonts, ImageId, SpriteStore, wrap_lines};
use crate::canvas::{Align, Canvas, DrawCmd, TextStyle};
use crate::error::{Result, TableauError};
use crate::gpu::GpuContext;
use crate::scene::Letterbox;
use crate::texture::Texture;

/// Vertex for 2D sprite/text rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// What a run of vertices samples from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    Colored,
    Image(ImageId),
    /// Glyph atlas, by [`Fonts::key`].
    Glyphs(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub kind: BatchKind,
    pub range: Range<u32>,
}

/// Triangles for one frame, in painter's order.
#[derive(Debug, Default)]
pub struct Mesh2d {
    pub vertices: Vec<Vertex2d>,
    pub batches: Vec<Batch>,
}

impl Mesh2d {
    /// Append vertices, extending the last batch when it samples the same source.
    fn push(&mut self, kind: BatchKind, vertices: &[Vertex2d]) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;
        match self.batches.last_mut() {
            Some(batch) if batch.kind == kind && batch.range.end == start => batch.range.end = end,
            _ => self.batches.push(Batch {
                kind,
                range: start..end,
            }),
        }
    }
}

const CIRCLE_SEGMENTS: usize = 24;

/// Two triangles covering `min..max` in local space.
fn quad(transform: &Affine2, min: Vec2, max: Vec2, uv: [f32; 4], color: [f32; 4]) -> [Vertex2d; 6] {
    let [u0, v0, uw, vh] = uv;
    let (u1, v1) = (u0 + uw, v0 + vh);
    let corner = |x: f32, y: f32, u: f32, v: f32| Vertex2d {
        position: transform.transform_point2(Vec2::new(x, y)).to_array(),
        uv: [u, v],
        color,
    };
    let top_left = corner(min.x, min.y, u0, v0);
    let top_right = corner(max.x, min.y, u1, v0);
    let bottom_right = corner(max.x, max.y, u1, v1);
    let bottom_left = corner(min.x, max.y, u0, v1);
    [top_left, top_right, bottom_left, top_right, bottom_right, bottom_left]
}

fn circle(transform: &Affine2, center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex2d> {
    let vertex = |local: Vec2| Vertex2d {
        position: transform.transform_point2(local).to_array(),
        uv: [0.0; 2],
        color,
    };
    let middle = vertex(center);
    (0..CIRCLE_SEGMENTS)
        .flat_map(|segment| {
            let a0 = segment as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            let a1 = (segment + 1) as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            [
                middle,
                vertex(center + Vec2::from_angle(a0) * radius),
                vertex(center + Vec2::from_angle(a1) * radius),
            ]
        })
        .collect()
}

/// Glyph quads for a text block centered on the transform origin.
fn text_vertices(atlas: &FontAtlas, text: &str, transform: &Affine2, style: &TextStyle) -> Vec<Vertex2d> {
    let lines = wrap_lines(text, style.wrap_width, |line| atlas.measure(line));
    let widths: Vec<f32> = lines.iter().map(|line| atlas.measure(line)).collect();
    let block_width = widths.iter().copied().fold(0.0, f32::max);
    let line_height = atlas.line_height();
    let top = -(line_height * lines.len() as f32) / 2.0;
    let color = style.color.to_array();

    let mut vertices = Vec::new();
    for (index, (line, width)) in lines.iter().zip(&widths).enumerate() {
        let mut pen = match style.align {
            Align::Center => -width / 2.0,
            Align::Left => -block_width / 2.0,
        };
        let baseline = top + index as f32 * line_height + atlas.ascent();
        for c in line.chars() {
            let Some(glyph) = atlas.glyph(c) else {
                pen += atlas.size() * 0.5;
                continue;
            };
            if glyph.width > 0 && glyph.height > 0 {
                // fontdue's ymin is the distance from the baseline to the glyph's bottom.
                let min = Vec2::new(
                    pen + glyph.offset_x,
                    baseline - glyph.offset_y - glyph.height as f32,
                );
                let max = min + Vec2::new(glyph.width as f32, glyph.height as f32);
                vertices.extend_from_slice(&quad(transform, min, max, glyph.uv, color));
            }
            pen += glyph.advance;
        }
    }
    vertices
}

/// Flatten a canvas into batched triangles.
///
/// Sprites whose image has not finished loading and text drawn without a font are
/// skipped for this frame.
pub fn tessellate(canvas: &Canvas, sprites: &SpriteStore, fonts: &mut Fonts) -> Mesh2d {
    let mut mesh = Mesh2d::default();
    for cmd in canvas.commands() {
        match cmd {
            DrawCmd::Quad {
                rect,
                transform,
                color,
            } => {
                let min = Vec2::new(rect.x, rect.y);
                let max = min + Vec2::new(rect.width, rect.height);
                let vertices = quad(transform, min, max, [0.0; 4], color.to_array());
                mesh.push(BatchKind::Colored, &vertices);
            }
            DrawCmd::Circle {
                center,
                radius,
                transform,
                color,
            } => {
                let vertices = circle(transform, *center, *radius, color.to_array());
                mesh.push(BatchKind::Colored, &vertices);
            }
            DrawCmd::Sprite {
                sprite,
                size,
                transform,
                tint,
            } => {
                let Some(frame) = sprites.frame(*sprite) else {
                    continue;
                };
                let half = size.unwrap_or(frame.size) / 2.0;
                let vertices = quad(transform, -half, half, frame.uv, tint.to_array());
                mesh.push(BatchKind::Image(frame.image), &vertices);
            }
            DrawCmd::Text {
                text,
                transform,
                style,
            } => {
                let Some(atlas) = fonts.atlas(style.size) else {
                    continue;
                };
                let vertices = text_vertices(atlas, text, transform, style);
                mesh.push(BatchKind::Glyphs(Fonts::key(style.size)), &vertices);
            }
        }
    }
    mesh
}

/// Uniforms for 2D rendering.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Draw2dUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const INITIAL_VERTICES: usize = 16384;

/// GPU renderer for [`Mesh2d`] frames.
pub struct Draw2d {
    // Pipelines
    colored_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,

    // Shared resources
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,

    images: HashMap<ImageId, (Texture, wgpu::BindGroup)>,
    glyphs: HashMap<u32, (Texture, wgpu::BindGroup)>,
}

impl Draw2d {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Draw2d Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw2d.wgsl").into()),
        });

        // Uniform buffer
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Uniforms"),
            size: std::mem::size_of::<Draw2dUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Uniform bind group layout (group 0)
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Uniform Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw2d Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Texture bind group layout (group 1)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Texture Layout"),
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

        // Pipeline layouts
        let colored_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Colored Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let textured_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Textured Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
                push_constant_ranges: &[],
            });

        // Blend state for alpha blending
        let blend_state = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        // Colored pipeline (no texture)
        let colored_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Draw2d Colored Pipeline"),
            layout: Some(&colored_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex2d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_colored"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(blend_state),
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

        // Textured pipeline (for fonts/sprites)
        let textured_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Draw2d Textured Pipeline"),
            layout: Some(&textured_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex2d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_textured"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(blend_state),
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

        let vertex_buffer = Self::create_vertex_buffer(gpu, INITIAL_VERTICES);

        Self {
            colored_pipeline,
            textured_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTICES,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            images: HashMap::new(),
            glyphs: HashMap::new(),
        }
    }

    fn create_vertex_buffer(gpu: &GpuContext, capacity: usize) -> wgpu::Buffer {
        gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vertex2d>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn bind_texture(&self, gpu: &GpuContext, texture: &Texture, label: &str) -> wgpu::BindGroup {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Upload images the sprite store finished decoding.
    pub fn upload_images(&mut self, gpu: &GpuContext, uploads: Vec<(ImageId, RgbaImage)>) {
        for (id, pixels) in uploads {
            let label = format!("Sprite Image {}", id.0);
            let texture = Texture::from_image(gpu, &pixels, &label);
            let bind_group = self.bind_texture(gpu, &texture, &label);
            tracing::debug!(image = id.0, width = texture.width, height = texture.height, "image uploaded");
            self.images.insert(id, (texture, bind_group));
        }
    }

    /// Upload glyph atlases rasterized since the last call.
    pub fn sync_atlases(&mut self, gpu: &GpuContext, fonts: &Fonts) {
        for (key, atlas) in fonts.atlases() {
            if self.glyphs.contains_key(&key) {
                continue;
            }
            // Coverage goes in alpha so glyphs share the sprite pipeline.
            let rgba: Vec<u8> = atlas
                .bitmap
                .iter()
                .flat_map(|&coverage| [255, 255, 255, coverage])
                .collect();
            let label = format!("Glyph Atlas {key}px");
            let texture = Texture::from_rgba(gpu, &rgba, atlas.width, atlas.height, false, &label);
            let bind_group = self.bind_texture(gpu, &texture, &label);
            tracing::debug!(size = key, "glyph atlas uploaded");
            self.glyphs.insert(key, (texture, bind_group));
        }
    }

    fn ensure_capacity(&mut self, gpu: &GpuContext, vertices: usize) {
        if vertices <= self.vertex_capacity {
            return;
        }
        self.vertex_capacity = vertices.next_power_of_two();
        self.vertex_buffer = Self::create_vertex_buffer(gpu, self.vertex_capacity);
    }

    /// Present one frame: the mesh is drawn in stage coordinates into the
    /// letterboxed viewport, with black margins around it.
    pub fn render(&mut self, gpu: &GpuContext, mesh: &Mesh2d, letterbox: &Letterbox) -> Result<()> {
        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface timed out; skipping frame");
                return Ok(());
            }
            Err(err) => return Err(TableauError::gpu(err.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ensure_capacity(gpu, mesh.vertices.len());
        let uniforms = Draw2dUniforms {
            resolution: letterbox.stage().to_array(),
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        if !mesh.vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Draw2d Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Draw2d Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if letterbox.size.x >= 1.0 && letterbox.size.y >= 1.0 {
                pass.set_viewport(
                    letterbox.margin.x,
                    letterbox.margin.y,
                    letterbox.size.x,
                    letterbox.size.y,
                    0.0,
                    1.0,
                );
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

                for batch in &mesh.batches {
                    let texture = match batch.kind {
                        BatchKind::Colored => None,
                        BatchKind::Image(id) => match self.images.get(&id) {
                            Some((_, bind_group)) => Some(bind_group),
                            None => continue,
                        },
                        BatchKind::Glyphs(key) => match self.glyphs.get(&key) {
                            Some((_, bind_group)) => Some(bind_group),
                            None => continue,
                        },
                    };
                    match texture {
                        Some(bind_group) => {
                            pass.set_pipeline(&self.textured_pipeline);
                            pass.set_bind_group(1, bind_group, &[]);
                        }
                        None => pass.set_pipeline(&self.colored_pipeline),
                    }
                    pass.draw(batch.range.clone(), 0..1);
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::canvas::{Color, TextStyle};
    use crate::net::testing::StubFetch;

    fn store() -> SpriteStore {
        SpriteStore::new(Arc::new(StubFetch::new()))
    }

    fn kinds(mesh: &Mesh2d) -> Vec<BatchKind> {
        mesh.batches.iter().map(|batch| batch.kind).collect()
    }

    #[test]
    fn rect_becomes_two_triangles() {
        let mut canvas = Canvas::new();
        canvas.rect(10.0, 20.0, 30.0, 40.0, Color::WHITE);
        let mesh = tessellate(&canvas, &store(), &mut Fonts::none());
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.vertices[0].position, [10.0, 20.0]);
        assert_eq!(mesh.vertices[4].position, [40.0, 60.0]);
        assert_eq!(mesh.batches, vec![Batch { kind: BatchKind::Colored, range: 0..6 }]);
    }

    #[test]
    fn circle_is_a_triangle_fan() {
        let mut canvas = Canvas::new();
        canvas.circle(Vec2::new(5.0, 5.0), 2.0, Color::WHITE);
        let mesh = tessellate(&canvas, &store(), &mut Fonts::none());
        assert_eq!(mesh.vertices.len(), CIRCLE_SEGMENTS * 3);
        for vertex in &mesh.vertices {
            let distance = Vec2::from_array(vertex.position).distance(Vec2::new(5.0, 5.0));
            assert!(distance < 2.0 + 1e-4);
        }
    }

    #[test]
    fn batches_merge_only_when_adjacent() {
        let mut store = store();
        let sprite = store.insert_image("logo", RgbaImage::new(4, 4));
        let image = store.frame(sprite).unwrap().image;

        let mut canvas = Canvas::new();
        canvas.rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);
        canvas.circle(Vec2::ZERO, 1.0, Color::WHITE);
        canvas.sprite(sprite, Affine2::IDENTITY, None, Color::WHITE);
        canvas.sprite(sprite, Affine2::IDENTITY, None, Color::WHITE);
        canvas.rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);

        let mesh = tessellate(&canvas, &store, &mut Fonts::none());
        assert_eq!(
            kinds(&mesh),
            vec![BatchKind::Colored, BatchKind::Image(image), BatchKind::Colored]
        );
        assert_eq!(mesh.batches[1].range.len(), 12);
    }

    #[test]
    fn sprites_are_centered_on_their_transform() {
        let mut store = store();
        let sprite = store.insert_image("card", RgbaImage::new(10, 14));
        let mut canvas = Canvas::new();
        canvas.sprite(
            sprite,
            Affine2::from_translation(Vec2::new(100.0, 100.0)),
            None,
            Color::WHITE,
        );
        let mesh = tessellate(&canvas, &store, &mut Fonts::none());
        assert_eq!(mesh.vertices[0].position, [95.0, 93.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[4].position, [105.0, 107.0]);
        assert_eq!(mesh.vertices[4].uv, [1.0, 1.0]);
    }

    #[test]
    fn explicit_size_overrides_natural_size() {
        let mut store = store();
        let sprite = store.insert_image("background", RgbaImage::new(2, 2));
        let mut canvas = Canvas::new();
        canvas.sprite(sprite, Affine2::IDENTITY, Some(Vec2::new(8.0, 4.0)), Color::WHITE);
        let mesh = tessellate(&canvas, &store, &mut Fonts::none());
        assert_eq!(mesh.vertices[0].position, [-4.0, -2.0]);
    }

    #[test]
    fn unloaded_sprites_and_fontless_text_are_skipped() {
        let mut store = store();
        let pending = store.request_url("http://img/never.png");
        let mut canvas = Canvas::new();
        canvas.sprite(pending, Affine2::IDENTITY, None, Color::WHITE);
        canvas.text("hello", Vec2::ZERO, TextStyle::new(24.0, Color::WHITE));
        let mesh = tessellate(&canvas, &store, &mut Fonts::none());
        assert!(mesh.vertices.is_empty());
        assert!(mesh.batches.is_empty());
    }
}
