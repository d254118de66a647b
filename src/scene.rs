//! Partition of a loaded scene into the node sets the showcase works with.

use std::collections::HashSet;

use crate::{
    config::FolioConfig,
    data_structures::scene_graph::{NodeId, SceneGraph},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSets {
    /// Nodes that open a modal when clicked.
    pub interactive: Vec<NodeId>,
    /// Invisible meshes the character cannot walk through.
    pub collision: Vec<NodeId>,
    pub character: Option<NodeId>,
}

impl SceneSets {
    /// Sorts the nodes of `graph` by name and hides the collision meshes.
    ///
    /// A mesh is collision geometry if it is itself named after the collision
    /// group or if its parent is. If several nodes carry the character name,
    /// the last one in traversal order wins.
    pub fn partition(graph: &mut SceneGraph, config: &FolioConfig) -> Self {
        let interactive_names: HashSet<&str> = config.interactive_names().into_iter().collect();
        let mut sets = Self::default();
        for id in graph.traverse() {
            let is_collision = graph.parent_name(id) == Some(config.collision_group.as_str())
                || graph.node(id).map(|n| n.name.as_str()) == Some(config.collision_group.as_str());
            let Some(node) = graph.node_mut(id) else {
                continue;
            };
            if interactive_names.contains(node.name.as_str()) {
                sets.interactive.push(id);
            }
            if node.mesh.is_some() && is_collision {
                node.visible = false;
                sets.collision.push(id);
            }
            if node.name == config.character.node_name {
                sets.character = Some(id);
            }
        }
        log::info!(
            "Scene partitioned: {} interactive, {} collision meshes, character {}.",
            sets.interactive.len(),
            sets.collision.len(),
            if sets.character.is_some() { "found" } else { "missing" }
        );
        sets
    }

    /// Name of the interactive node that `hit` belongs to: the node itself or
    /// its closest interactive ancestor.
    pub fn interactive_owner<'g>(&self, graph: &'g SceneGraph, hit: NodeId) -> Option<&'g str> {
        let mut current = Some(hit);
        while let Some(id) = current {
            let node = graph.node(id)?;
            if self.interactive.contains(&id) {
                return Some(node.name.as_str());
            }
            current = node.parent;
        }
        None
    }
}
