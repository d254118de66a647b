//! Scene graph and hierarchical scene organization.
//!
//! The graph is an arena of [`SceneNode`]s addressed by [`NodeId`]. Nodes keep
//! their glTF name, a local transform relative to their parent and a cached
//! world transform. Mesh nodes reference a [`MeshGeometry`]: a CPU copy of
//! the triangles and the parry3d mesh used for raycasting. GPU buffers live
//! separately in [`crate::resources::GpuScene`] so the graph can be built and
//! queried without a device.

use log::warn;
use parry3d::{
    math::{Point, Real},
    shape::TriMesh,
};

use crate::data_structures::instance::Instance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Triangles of one glTF mesh in the mesh's local space, together with the
/// collision shape built from them.
#[derive(Clone, Debug, Default)]
pub struct MeshGeometry {
    pub positions: Vec<cgmath::Point3<f32>>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    collider: Option<TriMesh>,
}

impl MeshGeometry {
    pub fn new(positions: Vec<cgmath::Point3<f32>>, indices: Vec<u32>) -> Self {
        if indices.len() % 3 != 0 {
            warn!(
                "Mesh has {} indices which is not a multiple of three, the trailing ones are ignored.",
                indices.len()
            );
        }
        let collider = build_collider(&positions, &indices);
        Self {
            positions,
            indices,
            collider,
        }
    }

    /// `None` for meshes without a single valid triangle.
    pub fn collider(&self) -> Option<&TriMesh> {
        self.collider.as_ref()
    }
}

fn build_collider(positions: &[cgmath::Point3<f32>], indices: &[u32]) -> Option<TriMesh> {
    let vertex_count = positions.len() as u32;
    let triangles: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .filter(|tri| tri.iter().all(|&i| i < vertex_count))
        .collect();
    if triangles.is_empty() {
        return None;
    }
    let vertices: Vec<Point<Real>> = positions
        .iter()
        .map(|p| Point::new(p.x, p.y, p.z))
        .collect();
    match TriMesh::new(vertices, triangles) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            warn!("Cannot build a collision mesh: {:?}", e);
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Instance,
    pub world: Instance,
    pub visible: bool,
    /// Index into [`SceneGraph::meshes`].
    pub mesh: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    pub meshes: Vec<MeshGeometry>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node below `parent` (or as a root) and returns its id. The
    /// world transform is valid once [`update_world_transforms`](Self::update_world_transforms)
    /// ran.
    pub fn add_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        local: Instance,
        mesh: Option<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            world: local.clone(),
            local,
            visible: true,
            mesh,
        });
        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(parent_node) => parent_node.children.push(id),
            None => {
                if parent.is_some() {
                    warn!("Parent of node {} does not exist, adding it as a root.", name);
                }
                self.nodes[id.0].parent = None;
                self.roots.push(id);
            }
        }
        id
    }

    pub fn add_mesh(&mut self, geometry: MeshGeometry) -> usize {
        self.meshes.push(geometry);
        self.meshes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn mesh_of(&self, id: NodeId) -> Option<&MeshGeometry> {
        self.node(id)
            .and_then(|node| node.mesh)
            .and_then(|idx| self.meshes.get(idx))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in depth-first pre-order, parents before children.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// `id` followed by all of its descendants.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                order.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    pub fn parent_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.node(parent))
            .map(|parent| parent.name.as_str())
    }

    pub fn set_local_transform(&mut self, id: NodeId, instance: Instance) {
        match self.nodes.get_mut(id.0) {
            Some(node) => node.local = instance,
            None => warn!("You tried to transform node {:?}, which does not exist.", id),
        }
    }

    /// Recomputes the world transform of every node from its parent's.
    pub fn update_world_transforms(&mut self) {
        for id in self.traverse() {
            let parent_world = self.nodes[id.0]
                .parent
                .map(|parent| self.nodes[parent.0].world.clone())
                .unwrap_or_default();
            let node = &mut self.nodes[id.0];
            node.world = &parent_world * &node.local;
        }
    }

    /// Builds the graph from the default scene of a glTF document (or its first
    /// scene). Mesh primitives are merged into one [`MeshGeometry`] per glTF
    /// mesh.
    pub fn from_gltf(document: &gltf::Document, buffers: &[Vec<u8>]) -> Self {
        let mut graph = Self::new();
        let meshes: Vec<usize> = document
            .meshes()
            .map(|mesh| graph.add_mesh(read_geometry(&mesh, buffers)))
            .collect();
        match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => scene
                .nodes()
                .for_each(|node| graph.add_gltf_node(&node, None, &meshes)),
            None => warn!("The glTF document contains no scene."),
        }
        graph.update_world_transforms();
        graph
    }

    fn add_gltf_node(&mut self, node: &gltf::Node, parent: Option<NodeId>, meshes: &[usize]) {
        let name = node.name().unwrap_or("");
        let mesh = node.mesh().and_then(|mesh| meshes.get(mesh.index()).copied());
        let id = self.add_node(name, parent, node.transform().into(), mesh);
        for child in node.children() {
            self.add_gltf_node(&child, Some(id), meshes);
        }
    }
}

fn read_geometry(mesh: &gltf::Mesh, buffers: &[Vec<u8>]) -> MeshGeometry {
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            warn!(
                "Skipping non-triangle primitive of mesh {:?} for collisions.",
                mesh.name()
            );
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let offset = positions.len() as u32;
        let Some(primitive_positions) = reader.read_positions() else {
            warn!("Primitive of mesh {:?} has no positions.", mesh.name());
            continue;
        };
        let count = positions.len();
        positions.extend(primitive_positions.map(cgmath::Point3::from));
        let added = (positions.len() - count) as u32;
        match reader.read_indices() {
            Some(read) => indices.extend(read.into_u32().map(|i| i + offset)),
            None => indices.extend(offset..offset + added),
        }
    }
    MeshGeometry::new(positions, indices)
}
