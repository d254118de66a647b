/**
 * This module contains all logic for loading scenes, textures and text from
 * the asset directory (the file system natively, HTTP on the web).
 */
pub mod gltf_loader;
pub mod texture;

pub use self::{
    gltf_loader::{GpuScene, LoadedScene, load_scene_gltf},
    texture::{load_binary, load_string, material_layout},
};
