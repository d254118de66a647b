//! flow-folio
//!
//! A walkable 3D portfolio. A glTF scene is loaded, its character walks on a
//! grid (keyboard or on-screen d-pad), invisible collision meshes block the
//! way and clicking one of the project objects opens a modal describing it.
//! Rendering runs on a small wgpu forward renderer, natively and in the
//! browser.
//!
//! High-level modules
//! - `camera`: orthographic camera, follow logic, wheel zoom and picking rays
//! - `character`: grid movement, shortest turns and the collision check
//! - `config`: tunable constants and the optional `folio.json`
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: transforms, scene graph, GPU models and textures
//! - `flow`: the winit event loop and the `GraphicsFlow` trait
//! - `input`: keys, d-pad and pointer coordinates
//! - `modal`: the project registry and the modal state
//! - `pipelines`: lit scene and sky gradient pipelines
//! - `portfolio`: the showcase flow that ties everything together
//! - `raycast`: rays against the triangles of scene graph nodes
//! - `render`: per-frame draw batches
//! - `resources`: asset loading
//! - `scene`: sorting scene nodes into interactive, collision and character
//! - `sky`: background gradient generation
//! - `tween`: easing and the step timeline
//!

pub mod camera;
pub mod character;
pub mod config;
pub mod context;
pub mod data_structures;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod flow;
pub mod input;
pub mod modal;
pub mod pipelines;
pub mod portfolio;
pub mod raycast;
pub mod render;
pub mod resources;
pub mod scene;
pub mod sky;
pub mod tween;

use std::pin::Pin;

use crate::{
    context::InitContext,
    flow::{EventSender, FlowConstructor, GraphicsFlow},
    portfolio::{Portfolio, PortfolioEvent},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Opens the window (or binds the page canvas) and runs the showcase.
pub fn run_showcase() -> anyhow::Result<()> {
    let portfolio: FlowConstructor<(), PortfolioEvent> = Box::new(
        |init: InitContext, sender: EventSender<(), PortfolioEvent>| {
            Box::pin(async move {
                let flow: Box<dyn GraphicsFlow<(), PortfolioEvent>> =
                    Box::new(Portfolio::load(init, sender).await);
                flow
            }) as Pin<Box<dyn Future<Output = Box<dyn GraphicsFlow<(), PortfolioEvent>>>>>
        },
    );
    flow::run(vec![portfolio])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run_showcase().map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
