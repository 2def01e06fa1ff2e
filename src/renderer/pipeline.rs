//! WebGPU render pipelines for the backdrop
//!
//! Two instanced-quad pipelines over one shared uniform: the static star
//! populations (uploaded once per mount) and the per-frame shooting-star
//! sprites. All GPU handles live in `RenderState`; dropping it at unmount
//! releases every buffer, pipeline and the surface.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::vertex::{
    CLEAR_COLOR, SPRITE_KIND_GLOW, SPRITE_KIND_STREAM, SPRITE_KIND_TERMINAL, SPRITE_KIND_TRAIL,
    STAR_KIND_GLYPH, STAR_KIND_ROUND, SpriteInstance, StarInstance, TERMINAL_TINT,
};
use crate::Settings;
use crate::sim::{BackdropState, Sprite, StarField};

/// Shared uniform data (must match the shader's Globals struct)
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],
    camera: [f32; 2],
    time: f32,
    breath_speed: f32,
    breath_amplitude: f32,
    glow_softness: f32,
    corner_softness: f32,
    _pad: [f32; 3],
}

/// All GPU state for one mount
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,

    star_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    /// Static instance buffers, uploaded once from the generated field
    glyph_buffer: Option<wgpu::Buffer>,
    glyph_count: u32,
    round_buffer: Option<wgpu::Buffer>,
    round_count: u32,

    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("starfall-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("backdrop_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                camera: [0.0, 0.0],
                time: 0.0,
                breath_speed: 1.2,
                breath_amplitude: 0.35,
                glow_softness: 0.6,
                corner_softness: 0.35,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("backdrop_bind_group_layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str,
                             vs: &str,
                             fs: &str,
                             layout: wgpu::VertexBufferLayout<'static>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
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
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let star_pipeline = make_pipeline("star_pipeline", "vs_star", "fs_star", StarInstance::desc());
        let sprite_pipeline =
            make_pipeline("sprite_pipeline", "vs_sprite", "fs_sprite", SpriteInstance::desc());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            star_pipeline,
            sprite_pipeline,
            globals_buffer,
            bind_group,
            glyph_buffer: None,
            glyph_count: 0,
            round_buffer: None,
            round_count: 0,
            size: (width, height),
        })
    }

    /// Upload both star populations. Called once per mount, right after
    /// generation; the buffers are never written again.
    pub fn upload_field(&mut self, field: &StarField) {
        let glyph: Vec<StarInstance> = field
            .glyph
            .iter()
            .map(|s| StarInstance::from_star(s, STAR_KIND_GLYPH))
            .collect();
        let round: Vec<StarInstance> = field
            .round
            .iter()
            .map(|s| StarInstance::from_star(s, STAR_KIND_ROUND))
            .collect();

        self.glyph_count = glyph.len() as u32;
        self.round_count = round.len() as u32;
        self.glyph_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("glyph_stars"),
                contents: bytemuck::cast_slice(&glyph),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.round_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("round_stars"),
                contents: bytemuck::cast_slice(&round),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Collect renderable sub-entity sprites from every live shooting star
    fn sprite_instances(state: &BackdropState) -> Vec<SpriteInstance> {
        let mut instances = Vec::with_capacity(state.shooting.len() * 4);
        let push = |instances: &mut Vec<SpriteInstance>, sprite: &Sprite, kind: u32| {
            if sprite.renderable() {
                instances.push(SpriteInstance::from_sprite(sprite, kind));
            }
        };
        for star in &state.shooting {
            push(&mut instances, &star.trail, SPRITE_KIND_TRAIL);
            push(&mut instances, &star.stream, SPRITE_KIND_STREAM);
            push(&mut instances, &star.glow, SPRITE_KIND_GLOW);
            if star.terminal.renderable() {
                let mut terminal = SpriteInstance::from_sprite(&star.terminal, SPRITE_KIND_TERMINAL);
                terminal.color = (TERMINAL_TINT
                    * glam::Vec3::from_array(terminal.color))
                .to_array();
                instances.push(terminal);
            }
        }
        instances
    }

    /// Submit one frame
    pub fn render(
        &mut self,
        state: &BackdropState,
        settings: &Settings,
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                resolution: [self.size.0 as f32, self.size.1 as f32],
                camera: state.camera.current.to_array(),
                time: state.time,
                breath_speed: settings.breath_speed,
                breath_amplitude: settings.breath_amplitude,
                glow_softness: settings.glow_softness,
                corner_softness: settings.corner_softness,
                _pad: [0.0; 3],
            }),
        );

        // Per-frame sprite instances; recreated each frame like the rest of
        // the dynamic geometry
        let sprites = Self::sprite_instances(state);
        let sprite_buffer = (!sprites.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("shooting_sprites"),
                    contents: bytemuck::cast_slice(&sprites),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("backdrop_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("backdrop_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);

            pass.set_pipeline(&self.star_pipeline);
            if let Some(ref buffer) = self.glyph_buffer {
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..6, 0..self.glyph_count);
            }
            if let Some(ref buffer) = self.round_buffer {
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..6, 0..self.round_count);
            }

            if let Some(ref buffer) = sprite_buffer {
                pass.set_pipeline(&self.sprite_pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..6, 0..sprites.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
