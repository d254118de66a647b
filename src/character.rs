//! The walkable character.
//!
//! Movement is discrete: every command moves the character one cell of
//! `move_distance` along X or Z, turning it to face the direction of travel.
//! A step is only taken if no collision mesh is in the way, which is checked
//! by casting horizontal rays at several heights toward the target cell.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::{Euler, Quaternion, Rad, Vector3};

use crate::{
    config::CharacterConfig,
    data_structures::{
        instance::Instance,
        scene_graph::{NodeId, SceneGraph},
    },
    raycast::{Ray, Raycaster},
    tween::{Ease, MoveTimeline},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on the ground plane. "Up" walks away from the camera (-Z).
    pub fn offset(self) -> Vector3<f32> {
        match self {
            Direction::Up => Vector3::new(0.0, 0.0, -1.0),
            Direction::Down => Vector3::new(0.0, 0.0, 1.0),
            Direction::Left => Vector3::new(-1.0, 0.0, 0.0),
            Direction::Right => Vector3::new(1.0, 0.0, 0.0),
        }
    }

    /// Heading (rotation about Y) the character takes when walking this way.
    pub fn yaw(self) -> f32 {
        match self {
            Direction::Up => 0.0,
            Direction::Down => PI,
            Direction::Left => -FRAC_PI_2,
            Direction::Right => FRAC_PI_2,
        }
    }
}

/// `target` expressed relative to `current` so that the turn between them is
/// at most half a revolution.
pub fn normalize_rotation(current: f32, target: f32) -> f32 {
    let mut delta = (target - current) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    current + delta
}

/// Euler angles of `rotation` with the heading in `y`. A pure turn of more
/// than a quarter revolution decomposes into `(π, π - yaw, π)`; that form is
/// folded back so animating `y` alone turns the character as expected.
fn heading_euler(rotation: Quaternion<f32>) -> Euler<Rad<f32>> {
    let euler = Euler::from(rotation);
    let near_half_turn = |angle: Rad<f32>| (angle.0.abs() - PI).abs() < 1e-4;
    if near_half_turn(euler.x) && near_half_turn(euler.z) {
        Euler::new(Rad(0.0), Rad(PI - euler.y.0), Rad(0.0))
    } else {
        euler
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub target: Vector3<f32>,
    pub yaw: f32,
}

#[derive(Clone, Debug)]
pub struct Character {
    pub node: NodeId,
    pub position: Vector3<f32>,
    /// Euler angles of the node; only `y` is animated.
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
    pub config: CharacterConfig,
    pub ease: Ease,
    motion: Option<(MoveTimeline, f32)>,
}

impl Character {
    pub fn new(node: NodeId, local: &Instance, config: CharacterConfig) -> Self {
        Self {
            node,
            position: local.position,
            rotation: heading_euler(local.rotation),
            scale: local.scale,
            config,
            ease: Ease::default(),
            motion: None,
        }
    }

    /// Reads the character's starting transform from the graph.
    pub fn from_graph(graph: &SceneGraph, node: NodeId, config: CharacterConfig) -> Option<Self> {
        graph
            .node(node)
            .map(|scene_node| Self::new(node, &scene_node.local, config))
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y.0
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Where one step in `direction` would end. `None` while a step is
    /// still playing.
    pub fn plan(&self, direction: Direction) -> Option<Step> {
        if self.is_moving() {
            return None;
        }
        Some(Step {
            target: self.position + direction.offset() * self.config.move_distance,
            yaw: direction.yaw(),
        })
    }

    /// Casts one ray per configured height from the character toward
    /// `target`. Any collision mesh closer than one step plus the margin
    /// blocks the move. With no collision meshes every move is allowed.
    pub fn can_move_to(
        &self,
        target: Vector3<f32>,
        graph: &SceneGraph,
        collision: &[NodeId],
        raycaster: &Raycaster,
    ) -> bool {
        if collision.is_empty() {
            return true;
        }
        let origin = graph
            .node(self.node)
            .map(|node| node.world.translation())
            .unwrap_or_else(|| cgmath::Point3::new(self.position.x, self.position.y, self.position.z));
        let direction = Vector3::new(target.x - self.position.x, 0.0, target.z - self.position.z);
        let reach = self.config.move_distance + self.config.collision_margin;

        for height in &self.config.ray_heights {
            let ray_origin = cgmath::Point3::new(origin.x, origin.y + height, origin.z);
            let Some(ray) = Ray::new(ray_origin, direction) else {
                // no horizontal component, nothing can be in the way
                return true;
            };
            if let Some(hit) = raycaster.first_hit(graph, collision, &ray) {
                if hit.distance < reach {
                    log::debug!(
                        "Step blocked by {:?} at distance {:.2} (ray height {}).",
                        hit.node,
                        hit.distance,
                        height
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Starts walking to `step`. The turn takes the shortest way round.
    pub fn begin_move(&mut self, step: Step) {
        let timeline = MoveTimeline {
            start: self.position,
            target: step.target,
            start_yaw: self.yaw(),
            target_yaw: normalize_rotation(self.yaw(), step.yaw),
            jump_height: self.config.jump_height,
            duration: self.config.move_duration_secs,
            ease: self.ease,
        };
        self.motion = Some((timeline, 0.0));
    }

    /// Advances the current step by `dt` seconds. Returns `true` if the
    /// character's transform changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some((timeline, elapsed)) = self.motion.as_mut() else {
            return false;
        };
        *elapsed += dt;
        let sample = timeline.sample(*elapsed);
        self.position = sample.position;
        self.rotation.y = Rad(sample.yaw);
        if timeline.is_complete(*elapsed) {
            self.motion = None;
        }
        true
    }

    pub fn local_transform(&self) -> Instance {
        Instance {
            position: self.position,
            rotation: Quaternion::from(self.rotation),
            scale: self.scale,
        }
    }

    /// Writes the animated transform back into the scene graph.
    pub fn apply(&self, graph: &mut SceneGraph) {
        graph.set_local_transform(self.node, self.local_transform());
        graph.update_world_transforms();
    }
}
