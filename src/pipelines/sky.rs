use crate::{
    config::SkyStop,
    data_structures::texture::Texture,
    pipelines::{DepthMode, mk_render_pipeline},
    sky::{GRADIENT_HEIGHT, gradient_image},
};

/// Gradient texture drawn behind the scene.
#[derive(Debug)]
pub struct SkyResources {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("sky_bind_group_layout"),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    let sampler = texture
        .sampler
        .clone()
        .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("sky_bind_group"),
    })
}

fn gradient_texture(device: &wgpu::Device, queue: &wgpu::Queue, stops: &[SkyStop]) -> Texture {
    let image = gradient_image(stops, GRADIENT_HEIGHT);
    Texture::from_rgba(
        device,
        queue,
        &image,
        Some("Sky Gradient"),
        wgpu::AddressMode::ClampToEdge,
    )
}

impl SkyResources {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, stops: &[SkyStop]) -> Self {
        let bind_group_layout = mk_bind_group_layout(device);
        let texture = gradient_texture(device, queue, stops);
        let bind_group = mk_bind_group(device, &bind_group_layout, &texture);
        Self {
            texture,
            bind_group,
            bind_group_layout,
        }
    }

    /// Replaces the gradient. The layout (and thus the pipeline) is kept.
    pub fn set_gradient(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stops: &[SkyStop]) {
        self.texture = gradient_texture(device, queue, stops);
        self.bind_group = mk_bind_group(device, &self.bind_group_layout, &self.texture);
    }
}

/// Draws before the scene without touching the depth buffer.
pub fn mk_sky_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sky_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        "Sky Pipeline",
        &[sky_bind_group_layout],
        wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
        },
        &[],
        config.format,
        DepthMode::Background,
    )
}
