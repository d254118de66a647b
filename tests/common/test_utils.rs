#![allow(dead_code)]

use cgmath::{Point3, Vector3};
use flow_folio::{
    data_structures::{
        instance::Instance,
        scene_graph::{MeshGeometry, NodeId, SceneGraph},
    },
    modal::{ModalView, ProjectInfo},
};

/// Corner order: bit 0 picks +x, bit 1 +y, bit 2 +z.
const CUBE_INDICES: [u32; 36] = [
    0, 2, 1, 1, 2, 3, // -z
    4, 5, 6, 5, 7, 6, // +z
    0, 1, 4, 1, 5, 4, // -y
    2, 6, 3, 3, 6, 7, // +y
    0, 4, 2, 2, 4, 6, // -x
    1, 3, 5, 3, 7, 5, // +x
];

fn cube_corners(half: [f32; 3]) -> Vec<Point3<f32>> {
    (0..8)
        .map(|i| {
            let sign = |bit: u32| if i & (1 << bit) != 0 { 1.0 } else { -1.0 };
            Point3::new(sign(0) * half[0], sign(1) * half[1], sign(2) * half[2])
        })
        .collect()
}

/// Axis aligned box of the given half extents around the local origin.
pub fn box_geometry(half: [f32; 3]) -> MeshGeometry {
    MeshGeometry::new(cube_corners(half), CUBE_INDICES.to_vec())
}

pub fn at(position: [f32; 3]) -> Instance {
    Instance::from(Vector3::from(position))
}

pub fn add_group(graph: &mut SceneGraph, name: &str, parent: Option<NodeId>, position: [f32; 3]) -> NodeId {
    graph.add_node(name, parent, at(position), None)
}

/// Adds a box mesh node centred on `center` (in parent space).
pub fn add_box(
    graph: &mut SceneGraph,
    name: &str,
    parent: Option<NodeId>,
    center: [f32; 3],
    half: [f32; 3],
) -> NodeId {
    let mesh = graph.add_mesh(box_geometry(half));
    graph.add_node(name, parent, at(center), Some(mesh))
}

pub struct Showcase {
    pub graph: SceneGraph,
    pub character: NodeId,
    pub north_wall: NodeId,
    pub east_wall: NodeId,
    pub project: NodeId,
    pub project_mesh: NodeId,
    pub decoration: NodeId,
}

/// A small island: the character at the origin, a wall whose face is 5.5
/// units north of it, another 6.5 units east, nothing south or west, and
/// `Project_1` standing at (30, 0, 30).
pub fn showcase_graph() -> Showcase {
    let mut graph = SceneGraph::new();
    let root = add_group(&mut graph, "Scene", None, [0.0, 0.0, 0.0]);
    let character = add_box(&mut graph, "Character", Some(root), [0.0, 0.0, 0.0], [0.5, 1.0, 0.5]);
    let collision = add_group(&mut graph, "Collision", Some(root), [0.0, 0.0, 0.0]);
    let north_wall = add_box(&mut graph, "Wall_North", Some(collision), [0.0, 5.0, -6.0], [20.0, 10.0, 0.5]);
    let east_wall = add_box(&mut graph, "Wall_East", Some(collision), [7.0, 5.0, 0.0], [0.5, 10.0, 20.0]);
    let project = add_group(&mut graph, "Project_1", Some(root), [30.0, 0.0, 30.0]);
    let project_mesh = add_box(&mut graph, "Project_1_Screen", Some(project), [0.0, 2.0, 0.0], [2.0, 2.0, 2.0]);
    let decoration = add_box(&mut graph, "Tree", Some(root), [-30.0, 2.0, -30.0], [1.0, 2.0, 1.0]);
    graph.update_world_transforms();
    Showcase {
        graph,
        character,
        north_wall,
        east_wall,
        project,
        project_mesh,
        decoration,
    }
}

/// A binary glTF with one unit cube mesh shared by all mesh nodes:
///
/// - `Character` at the origin
/// - `Collision` group with a `Wall` child, scaled flat, 6 units north
/// - `Project_2` group at (20, 0, 0) with a `Project_2_Screen` child
/// - a second scene that must not be loaded
pub fn showcase_glb() -> Vec<u8> {
    let mut bin: Vec<u8> = Vec::new();
    for corner in cube_corners([1.0, 1.0, 1.0]) {
        for value in [corner.x, corner.y, corner.z] {
            bin.extend_from_slice(&value.to_le_bytes());
        }
    }
    let positions_len = bin.len();
    for index in CUBE_INDICES {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    let indices_len = bin.len() - positions_len;

    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [
            { "nodes": [0, 1, 3] },
            { "nodes": [5] }
        ],
        "nodes": [
            { "name": "Character", "mesh": 0 },
            { "name": "Collision", "children": [2] },
            { "name": "Wall", "mesh": 0, "translation": [0.0, 1.0, -6.0], "scale": [10.0, 1.0, 0.5] },
            { "name": "Project_2", "children": [4], "translation": [20.0, 0.0, 0.0] },
            { "name": "Project_2_Screen", "mesh": 0 },
            { "name": "Unused", "mesh": 0 }
        ],
        "meshes": [
            { "name": "Cube", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] }
        ],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": 5126,
                "count": 8,
                "type": "VEC3",
                "min": [-1.0, -1.0, -1.0],
                "max": [1.0, 1.0, 1.0]
            },
            {
                "bufferView": 1,
                "componentType": 5125,
                "count": CUBE_INDICES.len(),
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_len },
            { "buffer": 0, "byteOffset": positions_len, "byteLength": indices_len }
        ],
        "buffers": [ { "byteLength": bin.len() } ]
    });
    let mut json = serde_json::to_vec(&json).expect("serialisable glTF json");
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

/// Parses [`showcase_glb`] into a scene graph the way the loader does.
pub fn showcase_glb_graph() -> SceneGraph {
    let gltf = gltf::Gltf::from_slice(&showcase_glb()).expect("valid glb");
    let blob = gltf.blob.clone().expect("glb has a binary chunk");
    SceneGraph::from_gltf(&gltf.document, &[blob])
}

/// What a [`ModalView`] was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalCall {
    Present(String),
    Dismiss,
}

/// Records calls into a shared log so a test can inspect them after handing
/// the view to its owner.
#[derive(Clone, Debug, Default)]
pub struct RecordingModal {
    pub calls: std::rc::Rc<std::cell::RefCell<Vec<ModalCall>>>,
}

impl RecordingModal {
    pub fn calls(&self) -> Vec<ModalCall> {
        self.calls.borrow().clone()
    }
}

impl ModalView for RecordingModal {
    fn present(&mut self, project: &ProjectInfo) {
        self.calls
            .borrow_mut()
            .push(ModalCall::Present(project.title.clone()));
    }

    fn dismiss(&mut self) {
        self.calls.borrow_mut().push(ModalCall::Dismiss);
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {} to be close to {}",
        expected,
        actual
    );
}

pub fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual.x - expected.x).abs() < 1e-4
            && (actual.y - expected.y).abs() < 1e-4
            && (actual.z - expected.z).abs() < 1e-4,
        "expected {:?} to be close to {:?}",
        actual,
        expected
    );
}
