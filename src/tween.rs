//! Easing and the character's move timeline.
//!
//! A step is three tracks starting together: the planar move, the turn
//! toward the new heading and a jump that rises for the first half of the
//! step and falls back (mirrored) during the second half.

use cgmath::{Vector3, VectorSpace};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// `1 - (1 - t)^2`, a quick start that slows into the target.
    #[default]
    Power1Out,
}

impl Ease {
    /// `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveSample {
    pub position: Vector3<f32>,
    pub yaw: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveTimeline {
    pub start: Vector3<f32>,
    pub target: Vector3<f32>,
    pub start_yaw: f32,
    /// Already on the shortest path from `start_yaw`.
    pub target_yaw: f32,
    pub jump_height: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl MoveTimeline {
    /// Position and yaw `elapsed` seconds into the step. The Y of `target`
    /// is ignored, the jump always lands at the start height.
    pub fn sample(&self, elapsed: f32) -> MoveSample {
        if self.is_complete(elapsed) {
            return MoveSample {
                position: Vector3::new(self.target.x, self.start.y, self.target.z),
                yaw: self.target_yaw,
            };
        }
        let progress = self.ease.apply(elapsed / self.duration);
        let planar = self.start.lerp(self.target, progress);

        let half = self.duration / 2.0;
        let jump_phase = if elapsed <= half {
            self.ease.apply(elapsed / half)
        } else {
            // yoyo: the second half plays the first half backwards
            self.ease.apply((self.duration - elapsed) / half)
        };

        MoveSample {
            position: Vector3::new(
                planar.x,
                self.start.y + self.jump_height * jump_phase,
                planar.z,
            ),
            yaw: self.start_yaw + (self.target_yaw - self.start_yaw) * progress,
        }
    }

    pub fn is_complete(&self, elapsed: f32) -> bool {
        self.duration <= 0.0 || elapsed >= self.duration
    }
}
