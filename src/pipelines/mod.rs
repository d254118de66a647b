//! Render pipelines and the GPU resources bound to them.
//!
//! - `basic`: lit meshes from the glTF scene
//! - `light`: sun and ambient uniform
//! - `sky`: gradient background

use crate::data_structures::texture::Texture;

pub mod basic;
pub mod light;
pub mod sky;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
}

/// How a pipeline uses the shared depth buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DepthMode {
    /// Regular geometry: depth tested and written, back faces culled.
    Opaque,
    /// Screen filling background drawn first, never occludes anything.
    Background,
}

impl DepthMode {
    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            DepthMode::Opaque => Some(wgpu::Face::Back),
            DepthMode::Background => None,
        }
    }

    fn depth_stencil(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            DepthMode::Opaque => (true, wgpu::CompareFunction::Less),
            DepthMode::Background => (false, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Builds a `vs_main`/`fs_main` pipeline that writes opaque colour to the
/// surface format.
pub(crate) fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    shader: wgpu::ShaderModuleDescriptor,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    color_format: wgpu::TextureFormat,
    depth: DepthMode,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Layout", label)),
        bind_group_layouts,
        push_constant_ranges: &[],
    });
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: depth.cull_mode(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth.depth_stencil()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
