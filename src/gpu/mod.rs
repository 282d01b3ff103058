//! GPU state: surface, pipelines and the point vertex buffer.
//!
//! Points are generated on the CPU and streamed into a vertex buffer sized to
//! the emitter's ring. Each frame only the slots written since the previous
//! frame are uploaded. Every point is drawn as an instanced quad, either a
//! constant-size point sprite or a world-sized billboard.

mod egui_integration;
mod texture;

pub use egui_integration::{EguiFrameOutput, EguiIntegration, GuiStyle};
pub use texture::TextureSlot;

use std::sync::Arc;

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::emitter::{PointEmitter, PointVertex, MAX_CAPACITY};
use crate::error::GpuError;
use crate::render::ParticleUniforms;
use crate::state::AppState;
use crate::textures::{TextureData, TexturePrecision};

/// WGSL source of the particle shader.
pub const PARTICLE_SHADER: &str = include_str!("../shaders/particles.wgsl");

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const POINT_STRIDE: wgpu::BufferAddress = std::mem::size_of::<PointVertex>() as wgpu::BufferAddress;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// Indexed by [`pipeline_index`].
    pipelines: Vec<wgpu::RenderPipeline>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: wgpu::Buffer,
    point_buffer: wgpu::Buffer,
    point_capacity: usize,
    palette: TextureSlot,
    noise: TextureSlot,
    depth_texture: wgpu::TextureView,
    float32_filterable: bool,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, vsync: bool, capacity: usize) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        log::info!("Using {} ({:?})", adapter_info.name, adapter_info.backend);

        let float32_filterable = adapter.features().contains(wgpu::Features::FLOAT32_FILTERABLE);
        let required_features = if float32_filterable {
            wgpu::Features::FLOAT32_FILTERABLE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features,
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&ParticleUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let point_capacity = capacity.clamp(1, max_points_for(&device.limits()));
        let point_buffer = create_point_buffer(&device, point_capacity);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
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
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3),
                sampler_entry(4),
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = (0..4)
            .map(|i| {
                let additive = i & 2 != 0;
                let depth_test = i & 1 != 0;
                create_pipeline(&device, &pipeline_layout, &shader, config.format, additive, depth_test)
            })
            .collect();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            bind_group_layout,
            bind_group: None,
            uniform_buffer,
            point_buffer,
            point_capacity,
            palette: TextureSlot::new("Palette Texture"),
            noise: TextureSlot::new("Noise Texture"),
            depth_texture,
            float32_filterable,
            adapter_info,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Most points the vertex buffer can hold on this device.
    pub fn max_points(&self) -> usize {
        max_points_for(&self.device.limits())
    }

    pub fn adapter_summary(&self) -> String {
        format!(
            "{} ({:?}, {:?})",
            self.adapter_info.name, self.adapter_info.backend, self.adapter_info.device_type
        )
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface if the vsync setting changed.
    pub fn set_vsync(&mut self, vsync: bool) {
        let mode = present_mode(vsync);
        if self.config.present_mode != mode {
            self.config.present_mode = mode;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Palette precision actually usable on this device.
    pub fn supported_precision(&self, wanted: TexturePrecision) -> TexturePrecision {
        if wanted == TexturePrecision::Float32 && !self.float32_filterable {
            TexturePrecision::Unorm8
        } else {
            wanted
        }
    }

    /// Rebuild textures flagged dirty in `state`.
    pub fn sync_textures(&mut self, state: &mut AppState) {
        let mut rebuilt = false;

        if state.palette_dirty {
            let wanted = state.settings.palette_precision;
            let precision = self.supported_precision(wanted);
            if precision != wanted {
                log::warn!(
                    "{} palettes need float filtering, which this adapter lacks; using {}",
                    wanted.label(),
                    precision.label()
                );
                state.settings.palette_precision = precision;
            }
            let built = state
                .palettes
                .current()
                .to_texture()
                .and_then(|data| self.palette.build(&self.device, &self.queue, &data, precision));
            match built {
                Ok(()) => rebuilt = true,
                Err(e) => log::warn!("Palette '{}' not uploaded: {}", state.palettes.current().name, e),
            }
            state.palette_dirty = false;
        }

        if state.noise_dirty {
            let built = TextureData::random_vectors(&mut rand::thread_rng(), state.settings.noise_size)
                .and_then(|data| self.noise.build(&self.device, &self.queue, &data, TexturePrecision::Unorm8));
            match built {
                Ok(()) => rebuilt = true,
                Err(e) => log::warn!("Noise texture not rebuilt: {}", e),
            }
            state.noise_dirty = false;
        }

        if rebuilt || self.bind_group.is_none() {
            self.bind_group = self.create_bind_group();
        }
    }

    fn create_bind_group(&self) -> Option<wgpu::BindGroup> {
        let entries = [
            wgpu::BindGroupEntry {
                binding: 0,
                resource: self.uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(self.palette.view()?),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(self.palette.sampler()?),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(self.noise.view()?),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(self.noise.sampler()?),
            },
        ];
        Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &self.bind_group_layout,
            entries: &entries,
        }))
    }

    /// Copy the emitter's dirty ring slots into the vertex buffer.
    ///
    /// Returns the number of points uploaded.
    pub fn upload_points(&mut self, emitter: &mut PointEmitter) -> usize {
        if emitter.capacity() != self.point_capacity {
            self.point_capacity = emitter.capacity();
            self.point_buffer.destroy();
            self.point_buffer = create_point_buffer(&self.device, self.point_capacity);
        }

        let dirty = emitter.take_dirty();
        let points = emitter.points();
        let mut uploaded = 0;
        for range in dirty {
            let offset = range.start as wgpu::BufferAddress * POINT_STRIDE;
            uploaded += range.len();
            self.queue
                .write_buffer(&self.point_buffer, offset, bytemuck::cast_slice(&points[range]));
        }
        uploaded
    }

    fn update_uniforms(&self, state: &AppState) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let uniforms = ParticleUniforms::new(
            state.camera.view_proj(aspect),
            state.emitter.model_matrix(),
            [self.config.width as f32, self.config.height as f32],
            &state.render,
            &state.palette_view,
            &state.clipping,
            state.emitter.max_speed(),
        );
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw the point cloud, then the GUI if `gui` is given.
    pub fn render(
        &mut self,
        state: &mut AppState,
        gui: Option<(&mut EguiIntegration, &EguiFrameOutput)>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_textures(state);
        self.upload_points(&mut state.emitter);
        self.update_uniforms(state);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let [r, g, b] = state.render.background;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let count = state.emitter.len() as u32;
            if let Some(bind_group) = self.bind_group.as_ref().filter(|_| count > 0) {
                let active = state.render.active();
                let pipeline = &self.pipelines[pipeline_index(active.additive, active.depth_test)];
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.point_buffer.slice(..));
                render_pass.draw(0..6, 0..count);
            }
        }

        if let Some((egui, frame)) = gui {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: frame.pixels_per_point,
            };
            egui.prepare(&self.device, &self.queue, &mut encoder, frame, &screen_descriptor);

            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            egui.paint(&mut render_pass, frame, &screen_descriptor);
            drop(render_pass);

            egui.cleanup(frame);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Pipeline slot for a blend/depth combination.
fn pipeline_index(additive: bool, depth_test: bool) -> usize {
    ((additive as usize) << 1) | depth_test as usize
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn blend_state(additive: bool) -> wgpu::BlendState {
    if additive {
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        }
    } else {
        wgpu::BlendState::ALPHA_BLENDING
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    additive: bool,
    depth_test: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match (additive, depth_test) {
            (false, false) => "Particle Pipeline (alpha)",
            (false, true) => "Particle Pipeline (alpha, depth)",
            (true, false) => "Particle Pipeline (additive)",
            (true, true) => "Particle Pipeline (additive, depth)",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: POINT_STRIDE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend_state(additive)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            // Additive blending never writes depth.
            depth_write_enabled: depth_test && !additive,
            depth_compare: if depth_test {
                wgpu::CompareFunction::Less
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn max_points_for(limits: &wgpu::Limits) -> usize {
    let fit = limits.max_buffer_size / POINT_STRIDE;
    usize::try_from(fit).unwrap_or(usize::MAX).min(MAX_CAPACITY)
}

fn create_point_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Point Buffer"),
        size: capacity as wgpu::BufferAddress * POINT_STRIDE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
