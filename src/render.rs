//! Render composition.
//!
//! Flows describe what they want drawn each frame with a [`Render`]. The
//! event loop flattens all of them into one batch for the basic pipeline.

use crate::data_structures::model::Model;

/// A model together with the instance buffer that places it.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// - `None` renders nothing
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced models
pub enum Render<'a> {
    None,
    Defaults(Vec<Instanced<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn collect(self, basics: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::None => (),
        }
    }
}
