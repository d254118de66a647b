//! Orthographic camera, follow logic and picking rays.
//!
//! The showcase looks at the island from a fixed diagonal angle. While a
//! character exists the camera keeps a constant offset from it (without
//! following its jumps) and always looks at the point below the character.

use cgmath::{InnerSpace, Matrix4, Point3, Vector2, Vector3};
use winit::event::{MouseScrollDelta, WindowEvent};

use crate::{config::CameraConfig, raycast::Ray};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Each wheel notch scales the zoom by this factor.
const ZOOM_STEP: f32 = 0.95;
/// Pixel deltas (touchpads, browsers) per wheel notch.
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Picking ray through `ndc` for an orthographic projection: all rays are
    /// parallel to the view direction and start on the near plane.
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>, projection: &Projection) -> Option<Ray> {
        let forward = self.forward();
        let right = forward.cross(self.up);
        if right.magnitude2() < f32::EPSILON {
            log::warn!("Camera looks straight along its up vector, cannot build a picking ray.");
            return None;
        }
        let right = right.normalize();
        let up = right.cross(forward);
        let (left, right_edge, bottom, top) = projection.frustum();
        let x = left + (ndc.x + 1.0) / 2.0 * (right_edge - left);
        let y = bottom + (ndc.y + 1.0) / 2.0 * (top - bottom);
        let origin = self.position + forward * projection.near + right * x + up * y;
        Ray::new(origin, forward)
    }
}

/// Orthographic projection whose frustum follows the window's aspect ratio.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, config: &CameraConfig) -> Self {
        Self {
            aspect: aspect_ratio(width, height).unwrap_or(1.0),
            half_height: config.half_height,
            near: config.near,
            far: config.far,
            zoom: config.zoom,
        }
    }

    /// Zero sized windows (minimised) keep the previous aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(aspect) = aspect_ratio(width, height) {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// `(left, right, bottom, top)` after zoom.
    pub fn frustum(&self) -> (f32, f32, f32, f32) {
        let half_height = self.half_height / self.zoom;
        let half_width = self.aspect * half_height;
        (-half_width, half_width, -half_height, half_height)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let (left, right, bottom, top) = self.frustum();
        OPENGL_TO_WGPU_MATRIX * cgmath::ortho(left, right, bottom, top, self.near, self.far)
    }
}

fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}

/// Keeps the camera at a fixed offset from a followed point.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowCamera {
    pub offset: Vector3<f32>,
    pub target_height: f32,
}

impl FollowCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            offset: config.follow_offset.into(),
            target_height: config.target_height,
        }
    }

    /// The camera height is `offset.y` itself, so jumps do not shake the view.
    pub fn follow(&self, camera: &mut Camera, position: Vector3<f32>) {
        camera.position = Point3::new(
            position.x + self.offset.x,
            self.offset.y,
            position.z + self.offset.z,
        );
        camera.target = Point3::new(position.x, self.target_height, position.z);
    }
}

/// Wheel zoom. Pending scroll is collected from window events and applied
/// once per frame.
#[derive(Debug)]
pub struct CameraController {
    scroll: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            scroll: 0.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            self.scroll += match delta {
                MouseScrollDelta::LineDelta(_, lines) => *lines,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
            };
        }
    }

    /// Scrolling up zooms in.
    pub fn update(&mut self, projection: &mut Projection) {
        if self.scroll == 0.0 {
            return;
        }
        let zoom = projection.zoom / ZOOM_STEP.powf(self.scroll);
        projection.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.scroll = 0.0;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub follow: FollowCamera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    /// Looks at the configured start position until something is followed.
    pub fn reset(&mut self, config: &CameraConfig) {
        self.camera = Camera::new(config.initial_position, config.initial_target);
        self.follow = FollowCamera::new(config);
        self.controller = CameraController::new(config);
    }
}
