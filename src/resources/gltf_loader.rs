//! glTF scene loading.
//!
//! The document is turned into two halves that share node and mesh indices:
//! a [`SceneGraph`] with CPU geometry for transforms and raycasting, and a
//! [`GpuScene`] with one [`Model`] per glTF mesh plus one instance buffer per
//! node that shows a mesh.

use std::{
    io::{BufReader, Cursor},
    rc::Rc,
};

use anyhow::{Context as _, anyhow};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{Material, Mesh, Model, ModelVertex},
        scene_graph::{NodeId, SceneGraph},
        texture::Texture,
    },
    render::{Instanced, Render},
    resources::texture::{load_binary, load_texture},
};

/// Instance buffer of one node, drawing `model` at the node's world transform.
#[derive(Debug)]
pub struct NodeDraw {
    pub node: NodeId,
    pub model: usize,
    pub instance_buffer: wgpu::Buffer,
}

#[derive(Debug, Default)]
pub struct GpuScene {
    pub models: Vec<Model>,
    pub draws: Vec<NodeDraw>,
}

#[derive(Debug)]
pub struct LoadedScene {
    pub graph: SceneGraph,
    pub gpu: GpuScene,
}

impl GpuScene {
    /// Uploads the current world transform of every drawn node.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue, graph: &SceneGraph) {
        for draw in &self.draws {
            if let Some(node) = graph.node(draw.node) {
                queue.write_buffer(
                    &draw.instance_buffer,
                    0,
                    bytemuck::cast_slice(&[node.world.to_raw()]),
                );
            }
        }
    }

    /// Visible mesh nodes. Hidden nodes (collision geometry) are skipped.
    pub fn render<'a>(&'a self, graph: &SceneGraph) -> Render<'a> {
        let instanced = self
            .draws
            .iter()
            .filter(|draw| graph.node(draw.node).is_some_and(|node| node.visible))
            .filter_map(|draw| {
                self.models.get(draw.model).map(|model| Instanced {
                    instance: &draw.instance_buffer,
                    model,
                    amount: 1,
                })
            })
            .collect::<Vec<_>>();
        if instanced.is_empty() {
            Render::None
        } else {
            Render::Defaults(instanced)
        }
    }
}

pub async fn load_scene_gltf(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    material_layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<LoadedScene> {
    let gltf_bytes = load_binary(file_name).await?;
    let gltf_reader = BufReader::new(Cursor::new(gltf_bytes));
    let gltf = gltf::Gltf::from_reader(gltf_reader)
        .with_context(|| format!("{} is not a valid glTF file", file_name))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow!("{} references a missing GLB chunk", file_name))?;
                buffer_data.push(blob.into());
            }
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_binary(uri).await?);
            }
        }
    }

    let materials = Rc::new(load_materials(&gltf, &buffer_data, device, queue, material_layout).await?);
    // primitives without a material use the white default appended last
    let default_material = materials.len() - 1;

    let models: Vec<Model> = gltf
        .meshes()
        .map(|mesh| Model {
            meshes: load_meshes(&mesh, &buffer_data, device, default_material),
            materials: materials.clone(),
        })
        .collect();

    let graph = SceneGraph::from_gltf(&gltf.document, &buffer_data);
    let draws = graph
        .traverse()
        .into_iter()
        .filter_map(|id| {
            let node = graph.node(id)?;
            let mesh = node.mesh?;
            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Instance Buffer", node.name)),
                contents: bytemuck::cast_slice(&[node.world.to_raw()]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            Some(NodeDraw {
                node: id,
                model: mesh,
                instance_buffer,
            })
        })
        .collect::<Vec<_>>();

    log::info!(
        "Loaded {}: {} nodes, {} meshes, {} materials.",
        file_name,
        graph.len(),
        models.len(),
        materials.len()
    );

    Ok(LoadedScene {
        graph,
        gpu: GpuScene { models, draws },
    })
}

async fn load_materials(
    gltf: &gltf::Gltf,
    buffer_data: &[Vec<u8>],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<Vec<Material>> {
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let name = material.name().unwrap_or("material");
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => match info.texture().source().source() {
                gltf::image::Source::View { view, mime_type } => {
                    let start = view.offset();
                    let bytes = buffer_data
                        .get(view.buffer().index())
                        .and_then(|buffer| buffer.get(start..start + view.length()))
                        .ok_or_else(|| anyhow!("texture of {} lies outside its buffer", name))?;
                    Texture::from_bytes(device, queue, bytes, name, mime_type.split('/').last())?
                }
                gltf::image::Source::Uri { uri, mime_type } => {
                    load_texture(
                        uri,
                        device,
                        queue,
                        mime_type.and_then(|mt| mt.split('/').last()),
                    )
                    .await?
                }
            },
            None => Texture::solid(device, queue, [255; 4], name),
        };
        materials.push(Material::new(
            device,
            name,
            diffuse_texture,
            pbr.base_color_factor(),
            layout,
        ));
    }
    materials.push(Material::new(
        device,
        "default",
        Texture::solid(device, queue, [255; 4], "default"),
        [1.0; 4],
        layout,
    ));
    Ok(materials)
}

fn load_meshes(
    mesh: &gltf::Mesh,
    buffer_data: &[Vec<u8>],
    device: &wgpu::Device,
    default_material: usize,
) -> Vec<Mesh> {
    let name = mesh.name().unwrap_or("mesh");
    mesh.primitives()
        .filter(|primitive| {
            let triangles = primitive.mode() == gltf::mesh::Mode::Triangles;
            if !triangles {
                log::warn!("Skipping {:?} primitive of {}.", primitive.mode(), name);
            }
            triangles
        })
        .filter_map(|primitive| {
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::warn!("Primitive {} of {} has no positions.", primitive.index(), name);
                return None;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|position| ModelVertex {
                    position,
                    tex_coords: [0.0, 0.0],
                    normal: [0.0, 1.0, 0.0],
                })
                .collect();
            if let Some(normals) = reader.read_normals() {
                vertices
                    .iter_mut()
                    .zip(normals)
                    .for_each(|(vertex, normal)| vertex.normal = normal);
            }
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                vertices
                    .iter_mut()
                    .zip(tex_coords.into_f32())
                    .for_each(|(vertex, uv)| vertex.tex_coords = uv);
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            if indices.is_empty() {
                return None;
            }

            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", name)),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            Some(Mesh {
                name: name.to_string(),
                vertex_buffer,
                index_buffer,
                num_elements: indices.len() as u32,
                material: primitive.material().index().unwrap_or(default_material),
            })
        })
        .collect()
}
