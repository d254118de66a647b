//! Raycasting against scene-graph meshes.
//!
//! Used for two things: collision rays cast from the character toward the
//! cell it wants to step into, and the pointer ray that finds which project
//! is under the cursor. Every mesh carries a parry3d [`TriMesh`] in its local
//! space; rays are moved into that space with the inverse world transform,
//! which keeps scaled nodes exact. Hidden meshes are still hit, collision
//! geometry is invisible by construction.
//!
//! [`TriMesh`]: parry3d::shape::TriMesh

use cgmath::{InnerSpace, Point3, SquareMatrix, Transform, Vector3};
use parry3d::{
    math::{Point, Real, Vector},
    query::RayCast,
};

use crate::data_structures::scene_graph::{NodeId, SceneGraph};

const EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Always unit length.
    pub direction: Vector3<f32>,
}

impl Ray {
    /// `None` if `direction` has (almost) no length.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        if direction.magnitude2() < EPSILON * EPSILON {
            return None;
        }
        Some(Self {
            origin,
            direction: direction.normalize(),
        })
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Casts rays against sets of scene nodes. Only hits with a distance in
/// `near..=far` count.
#[derive(Clone, Copy, Debug)]
pub struct Raycaster {
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    /// Intersects `ray` with the meshes of `roots` and all their descendants.
    /// Each mesh reports its nearest hit; hits are sorted by ascending
    /// distance.
    pub fn intersect_nodes(&self, graph: &SceneGraph, roots: &[NodeId], ray: &Ray) -> Vec<Hit> {
        let mut hits = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for &root in roots {
            for id in graph.subtree(root) {
                if seen.insert(id) {
                    hits.extend(self.intersect_node(graph, id, ray));
                }
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn first_hit(&self, graph: &SceneGraph, roots: &[NodeId], ray: &Ray) -> Option<Hit> {
        self.intersect_nodes(graph, roots, ray).into_iter().next()
    }

    fn intersect_node(&self, graph: &SceneGraph, id: NodeId, ray: &Ray) -> Option<Hit> {
        let node = graph.node(id)?;
        let collider = graph.mesh_of(id)?.collider()?;
        let reach = self.far - self.near;
        if reach < 0.0 {
            return None;
        }
        let Some(to_local) = node.world.to_matrix().invert() else {
            log::debug!("Node {:?} has a degenerate transform, it cannot be hit.", id);
            return None;
        };

        // The local direction is not renormalised, so parry's time of impact
        // stays a world distance.
        let origin = to_local.transform_point(ray.at(self.near));
        let direction = to_local.transform_vector(ray.direction);
        let local_ray = parry3d::query::Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        let toi = collider.cast_local_ray(&local_ray, reach.min(Real::MAX), false)?;
        let distance = self.near + toi;
        Some(Hit {
            node: id,
            distance,
            point: ray.at(distance),
        })
    }
}
