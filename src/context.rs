use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{self, CameraController, CameraResources, CameraUniform, FollowCamera, Projection},
    config::FolioConfig,
    data_structures::texture,
    input::pointer_to_ndc,
    pipelines::{
        Pipelines,
        basic::mk_basic_pipeline,
        light::{LightResources, LightUniform},
        sky::{SkyResources, mk_sky_pipeline},
    },
    resources::material_layout,
};

/// Last known pointer position in NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseState {
    pub ndc: cgmath::Vector2<f32>,
}

impl Default for MouseState {
    fn default() -> Self {
        // off screen until the first cursor event so nothing is hovered
        Self {
            ndc: cgmath::Vector2::new(-2.0, -2.0),
        }
    }
}

impl MouseState {
    pub fn move_to(&mut self, position: PhysicalPosition<f64>, width: u32, height: u32) {
        self.ndc = pointer_to_ndc(position.x, position.y, width, height);
    }
}

/// Highest device pixel ratio the surface is rendered at. Denser screens get
/// an upscaled image.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Surface size for a window of `width` x `height` physical pixels at
/// `scale_factor`, with the pixel ratio capped at [`MAX_PIXEL_RATIO`].
pub fn capped_surface_size(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    if scale_factor <= MAX_PIXEL_RATIO {
        return (width, height);
    }
    let ratio = MAX_PIXEL_RATIO / scale_factor;
    let cap = |pixels: u32| ((f64::from(pixels) * ratio).round() as u32).max(1);
    (cap(width), cap(height))
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub sky: SkyResources,
    pub material_layout: wgpu::BindGroupLayout,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub mouse: MouseState,
}

/// What a flow constructor gets to create its GPU resources before the
/// first frame.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub material_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            material_layout: ctx.material_layout.clone(),
        }
    }
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let (width, height) = capped_surface_size(size.width, size.height, window.scale_factor());
        let defaults = FolioConfig::default();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("the surface supports no texture format"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = camera::Camera::new(
            defaults.camera.initial_position,
            defaults.camera.initial_target,
        );
        let projection = Projection::new(config.width, config.height, &defaults.camera);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            follow: FollowCamera::new(&defaults.camera),
            controller: CameraController::new(&defaults.camera),
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(&device, LightUniform::from_config(&defaults.lighting));
        let sky = SkyResources::new(&device, &queue, &defaults.sky);
        let material_layout = material_layout(&device);

        let pipelines = Pipelines {
            basic: mk_basic_pipeline(
                &device,
                &config,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
            sky: mk_sky_pipeline(&device, &config, &sky.bind_group_layout),
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            sky,
            material_layout,
            pipelines,
            clear_colour: wgpu::Color::WHITE,
            mouse: MouseState::default(),
            window,
            depth_texture,
        })
    }

    /// Applies the camera, lighting and sky parts of `config`.
    pub fn configure(&mut self, config: &FolioConfig) {
        self.camera.reset(&config.camera);
        self.projection = Projection::new(self.config.width, self.config.height, &config.camera);
        self.light.configure(&self.queue, &config.lighting);
        self.sky.set_gradient(&self.device, &self.queue, &config.sky);
    }

    pub fn set_cursor(&self, icon: winit::window::CursorIcon) {
        self.window.set_cursor(icon);
    }
}
