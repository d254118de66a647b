//! Engine data structures: transforms, the scene graph, meshes and textures.
//!
//! - `instance` holds per-node transformation data and its GPU layout
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `scene_graph` is the named node hierarchy loaded from glTF, with CPU geometry
//! - `texture` contains GPU texture wrapper and creation utilities

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
