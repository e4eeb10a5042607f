//! wgpu backend: replays a [`folio_core::Frame`] against a window surface.
//!
//! Fills and borders are instanced quads whose rounded corners come from an
//! SDF in the fragment shader. Text samples an A8 glyph atlas fed by
//! `folio-text`. Instances batch between scissor changes and upload through
//! per-frame ring buffers.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use folio_core::{DrawCommand, Frame, Rect};
use folio_text::{BitmapFormat, GlyphKey};
use wgpu::util::DeviceExt;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Per-frame vertex upload ring. Writes always fit or wrap to the front;
/// the buffers are sized generously for UI workloads.
struct UploadRing {
    buf: wgpu::Buffer,
    cap: u64,
    head: u64,
}

impl UploadRing {
    fn new(device: &wgpu::Device, label: &str, cap: u64) -> Self {
        let buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: cap,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buf, cap, head: 0 }
    }

    fn reset(&mut self) {
        self.head = 0;
    }

    fn alloc_write(&mut self, queue: &wgpu::Queue, bytes: &[u8]) -> (u64, u64) {
        let len = bytes.len() as u64;
        let align = 4u64;
        let start = (self.head + (align - 1)) & !(align - 1);
        let end = start + len;
        if end > self.cap {
            let end = len.min(self.cap);
            queue.write_buffer(&self.buf, 0, &bytes[0..end as usize]);
            self.head = end;
            (0, end)
        } else {
            queue.write_buffer(&self.buf, start, bytes);
            self.head = end;
            (start, len)
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RectInstance {
    // x, y, w, h in pixels
    pos_size: [f32; 4],
    radius: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BorderInstance {
    pos_size: [f32; 4],
    radius: f32,
    stroke: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlyphInstance {
    pos_size: [f32; 4],
    // u0, v0, u1, v1
    uv: [f32; 4],
    color: [f32; 4],
}

#[derive(Clone, Copy)]
struct GlyphInfo {
    u0: f32,
    v0: f32,
    u1: f32,
    v1: f32,
    w: f32,
    h: f32,
}

/// Shelf-packed A8 glyph atlas.
struct Atlas {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    size: u32,
    next_x: u32,
    next_y: u32,
    row_h: u32,
    map: HashMap<(GlyphKey, u32), GlyphInfo>,
}

const ATLAS_START: u32 = 1024;
const ATLAS_MAX: u32 = 4096;

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    globals: wgpu::Buffer,
    globals_bind: wgpu::BindGroup,
    text_bind_layout: wgpu::BindGroupLayout,
    text_bind: wgpu::BindGroup,

    rect_pipeline: wgpu::RenderPipeline,
    border_pipeline: wgpu::RenderPipeline,
    text_pipeline: wgpu::RenderPipeline,

    atlas: Atlas,

    ring_rect: UploadRing,
    ring_border: UploadRing,
    ring_glyph: UploadRing,
}

fn make_atlas_texture(device: &wgpu::Device, size: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glyph atlas A8"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

impl WgpuBackend {
    pub fn new(window: Arc<winit::window::Window>) -> Result<Self, BackendError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|_| BackendError::NoAdapter)?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("folio device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            }))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let present_mode = caps
            .present_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::PresentMode::Mailbox || *m == wgpu::PresentMode::Immediate)
            .unwrap_or(wgpu::PresentMode::Fifo);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::cast_slice(&[size.width as f32, size.height as f32, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals bind"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });

        let text_bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text bind layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let (atlas_tex, atlas_view) = make_atlas_texture(&device, ATLAS_START);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("atlas sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let atlas = Atlas {
            tex: atlas_tex,
            view: atlas_view,
            sampler,
            size: ATLAS_START,
            next_x: 1,
            next_y: 1,
            row_h: 0,
            map: HashMap::new(),
        };
        let text_bind = Self::make_text_bind(&device, &text_bind_layout, &globals, &atlas);

        let rect_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("rect.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/rect.wgsl"))),
        });
        let border_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("border.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/border.wgsl"))),
        });
        let text_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("text.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/text.wgsl"))),
        });

        let make_pipeline = |label: &str,
                             shader: &wgpu::ShaderModule,
                             layout: &wgpu::BindGroupLayout,
                             stride: u64,
                             attributes: &[wgpu::VertexAttribute]| {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[layout],
                immediate_size: 0,
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: stride,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes,
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let rect_pipeline = make_pipeline(
            "rect pipeline",
            &rect_shader,
            &globals_layout,
            std::mem::size_of::<RectInstance>() as u64,
            &[
                wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 16,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    shader_location: 2,
                    offset: 20,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        );
        let border_pipeline = make_pipeline(
            "border pipeline",
            &border_shader,
            &globals_layout,
            std::mem::size_of::<BorderInstance>() as u64,
            &[
                wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 16,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    shader_location: 2,
                    offset: 20,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    shader_location: 3,
                    offset: 24,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        );
        let text_pipeline = make_pipeline(
            "text pipeline",
            &text_shader,
            &text_bind_layout,
            std::mem::size_of::<GlyphInstance>() as u64,
            &[
                wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 16,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    shader_location: 2,
                    offset: 32,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        );

        let ring_rect = UploadRing::new(&device, "rect ring", 256 * 1024);
        let ring_border = UploadRing::new(&device, "border ring", 128 * 1024);
        let ring_glyph = UploadRing::new(&device, "glyph ring", 512 * 1024);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals,
            globals_bind,
            text_bind_layout,
            text_bind,
            rect_pipeline,
            border_pipeline,
            text_pipeline,
            atlas,
            ring_rect,
            ring_border,
            ring_glyph,
        })
    }

    fn make_text_bind(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        globals: &wgpu::Buffer,
        atlas: &Atlas,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text bind"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        })
    }

    pub fn configure_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    // ---------------------------------------------------------------- atlas

    fn atlas_alloc(&mut self, w: u32, h: u32) -> bool {
        if self.atlas.next_x + w + 1 >= self.atlas.size {
            self.atlas.next_x = 1;
            self.atlas.next_y += self.atlas.row_h + 1;
            self.atlas.row_h = 0;
        }
        self.atlas.next_y + h + 1 < self.atlas.size
    }

    fn atlas_grow_and_rebuild(&mut self) {
        let new_size = (self.atlas.size * 2).min(ATLAS_MAX);
        if new_size == self.atlas.size {
            return;
        }
        let (tex, view) = make_atlas_texture(&self.device, new_size);
        self.atlas.tex = tex;
        self.atlas.view = view;
        self.atlas.size = new_size;
        self.atlas.next_x = 1;
        self.atlas.next_y = 1;
        self.atlas.row_h = 0;

        let keys: Vec<(GlyphKey, u32)> = self.atlas.map.keys().copied().collect();
        self.atlas.map.clear();
        for (key, px) in keys {
            let _ = self.upload_glyph(key, px);
        }
        self.text_bind =
            Self::make_text_bind(&self.device, &self.text_bind_layout, &self.globals, &self.atlas);
    }

    fn upload_glyph(&mut self, key: GlyphKey, px: u32) -> Option<GlyphInfo> {
        let map_key = (key, px);
        if let Some(info) = self.atlas.map.get(&map_key) {
            return Some(*info);
        }
        let bitmap = folio_text::rasterize(key)?;
        if bitmap.format != BitmapFormat::Mask {
            // Color glyphs would need an RGBA atlas; skip them.
            return None;
        }
        let w = bitmap.w.max(1);
        let h = bitmap.h.max(1);
        if !self.atlas_alloc(w, h) {
            self.atlas_grow_and_rebuild();
            if !self.atlas_alloc(w, h) {
                return None;
            }
        }
        let x = self.atlas.next_x;
        let y = self.atlas.next_y;
        self.atlas.next_x += w + 1;
        self.atlas.row_h = self.atlas.row_h.max(h + 1);

        let mut data = bitmap.data;
        data.resize((w * h) as usize, 0);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfoBase {
                texture: &self.atlas.tex,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        let size = self.atlas.size as f32;
        let info = GlyphInfo {
            u0: x as f32 / size,
            v0: y as f32 / size,
            u1: (x + w) as f32 / size,
            v1: (y + h) as f32 / size,
            w: w as f32,
            h: h as f32,
        };
        self.atlas.map.insert(map_key, info);
        Some(info)
    }

    // ---------------------------------------------------------------- frame

    pub fn frame(&mut self, frame: &Frame) {
        if self.config.width == 0 || self.config.height == 0 {
            return;
        }
        let surface_tex = loop {
            match self.surface.get_current_texture() {
                Ok(f) => break f,
                Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                    log::warn!("surface lost/outdated; reconfiguring");
                    self.surface.configure(&self.device, &self.config);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("surface timeout; retrying");
                    continue;
                }
                Err(e) => {
                    log::error!("surface error: {e:?}");
                    return;
                }
            }
        };
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.globals,
            0,
            bytemuck::cast_slice(&[
                self.config.width as f32,
                self.config.height as f32,
                0.0,
                0.0,
            ]),
        );

        enum Cmd {
            Scissor(Rect),
            Rects { off: u64, cnt: u32 },
            Borders { off: u64, cnt: u32 },
            Glyphs { off: u64, cnt: u32 },
        }

        #[derive(Default)]
        struct Batch {
            rects: Vec<RectInstance>,
            borders: Vec<BorderInstance>,
            glyphs: Vec<GlyphInstance>,
        }

        self.ring_rect.reset();
        self.ring_border.reset();
        self.ring_glyph.reset();

        let mut cmds: Vec<Cmd> = Vec::with_capacity(frame.commands.len());
        let mut batch = Batch::default();

        fn flush(
            batch: &mut Batch,
            rings: (&mut UploadRing, &mut UploadRing, &mut UploadRing),
            queue: &wgpu::Queue,
            cmds: &mut Vec<Cmd>,
        ) {
            let (ring_rect, ring_border, ring_glyph) = rings;
            if !batch.rects.is_empty() {
                let bytes = bytemuck::cast_slice(&batch.rects);
                let (off, wrote) = ring_rect.alloc_write(queue, bytes);
                debug_assert_eq!(wrote as usize, bytes.len());
                cmds.push(Cmd::Rects {
                    off,
                    cnt: batch.rects.len() as u32,
                });
                batch.rects.clear();
            }
            if !batch.borders.is_empty() {
                let bytes = bytemuck::cast_slice(&batch.borders);
                let (off, wrote) = ring_border.alloc_write(queue, bytes);
                debug_assert_eq!(wrote as usize, bytes.len());
                cmds.push(Cmd::Borders {
                    off,
                    cnt: batch.borders.len() as u32,
                });
                batch.borders.clear();
            }
            if !batch.glyphs.is_empty() {
                let bytes = bytemuck::cast_slice(&batch.glyphs);
                let (off, wrote) = ring_glyph.alloc_write(queue, bytes);
                debug_assert_eq!(wrote as usize, bytes.len());
                cmds.push(Cmd::Glyphs {
                    off,
                    cnt: batch.glyphs.len() as u32,
                });
                batch.glyphs.clear();
            }
        }

        for command in &frame.commands {
            match command {
                DrawCommand::RectFilled {
                    rect,
                    rounding,
                    color,
                } => {
                    batch.rects.push(RectInstance {
                        pos_size: [rect.x, rect.y, rect.w, rect.h],
                        radius: *rounding,
                        color: color.to_linear(),
                    });
                }
                DrawCommand::RectStroked {
                    rect,
                    rounding,
                    thickness,
                    color,
                } => {
                    batch.borders.push(BorderInstance {
                        pos_size: [rect.x, rect.y, rect.w, rect.h],
                        radius: *rounding,
                        stroke: *thickness,
                        color: color.to_linear(),
                    });
                }
                DrawCommand::Text {
                    pos,
                    text,
                    px,
                    color,
                } => {
                    let px_size = px.clamp(8.0, 96.0);
                    let color = color.to_linear();
                    for glyph in folio_text::shape_line(text, px_size) {
                        let Some(info) = self.upload_glyph(glyph.key, px_size as u32) else {
                            continue;
                        };
                        let x = pos.x + glyph.x + glyph.bearing_x;
                        let y = pos.y + glyph.y - glyph.bearing_y;
                        batch.glyphs.push(GlyphInstance {
                            pos_size: [x, y, info.w, info.h],
                            uv: [info.u0, info.v0, info.u1, info.v1],
                            color,
                        });
                    }
                }
                DrawCommand::Scissor { rect } => {
                    flush(
                        &mut batch,
                        (
                            &mut self.ring_rect,
                            &mut self.ring_border,
                            &mut self.ring_glyph,
                        ),
                        &self.queue,
                        &mut cmds,
                    );
                    cmds.push(Cmd::Scissor(*rect));
                }
            }
        }
        flush(
            &mut batch,
            (
                &mut self.ring_rect,
                &mut self.ring_border,
                &mut self.ring_glyph,
            ),
            &self.queue,
            &mut cmds,
        );

        let clear = frame.clear.to_linear();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_scissor_rect(0, 0, self.config.width, self.config.height);

            for cmd in cmds {
                match cmd {
                    Cmd::Scissor(rect) => {
                        let (x, y, w, h) =
                            to_scissor(&rect, self.config.width, self.config.height);
                        rpass.set_scissor_rect(x, y, w, h);
                    }
                    Cmd::Rects { off, cnt } => {
                        rpass.set_pipeline(&self.rect_pipeline);
                        rpass.set_bind_group(0, &self.globals_bind, &[]);
                        let bytes = cnt as u64 * std::mem::size_of::<RectInstance>() as u64;
                        rpass.set_vertex_buffer(0, self.ring_rect.buf.slice(off..off + bytes));
                        rpass.draw(0..6, 0..cnt);
                    }
                    Cmd::Borders { off, cnt } => {
                        rpass.set_pipeline(&self.border_pipeline);
                        rpass.set_bind_group(0, &self.globals_bind, &[]);
                        let bytes = cnt as u64 * std::mem::size_of::<BorderInstance>() as u64;
                        rpass.set_vertex_buffer(0, self.ring_border.buf.slice(off..off + bytes));
                        rpass.draw(0..6, 0..cnt);
                    }
                    Cmd::Glyphs { off, cnt } => {
                        rpass.set_pipeline(&self.text_pipeline);
                        rpass.set_bind_group(0, &self.text_bind, &[]);
                        let bytes = cnt as u64 * std::mem::size_of::<GlyphInstance>() as u64;
                        rpass.set_vertex_buffer(0, self.ring_glyph.buf.slice(off..off + bytes));
                        rpass.draw(0..6, 0..cnt);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_tex.present();
    }
}

/// Clamp a scissor rectangle to the framebuffer; degenerate input becomes a
/// zero-area scissor at the origin, which safely draws nothing.
fn to_scissor(r: &Rect, fb_w: u32, fb_h: u32) -> (u32, u32, u32, u32) {
    if r.w <= 0.0 || r.h <= 0.0 {
        return (0, 0, 0, 0);
    }
    let mut x = r.x.floor() as i64;
    let mut y = r.y.floor() as i64;
    let mut w = r.w.ceil() as i64;
    let mut h = r.h.ceil() as i64;
    if x < 0 {
        w += x;
        x = 0;
    }
    if y < 0 {
        h += y;
        y = 0;
    }
    if w <= 0 || h <= 0 {
        return (0, 0, 0, 0);
    }
    let fb_w = fb_w as i64;
    let fb_h = fb_h as i64;
    if x >= fb_w || y >= fb_h {
        return (0, 0, 0, 0);
    }
    if x + w > fb_w {
        w = fb_w - x;
    }
    if y + h > fb_h {
        h = fb_h - y;
    }
    (x as u32, y as u32, w.max(0) as u32, h.max(0) as u32)
}
