/// 3D transformation matrices and rotation state
use nalgebra::{Matrix4, Vector3};

use crate::projection::Camera;

/// Frame-delta units per unit of rotation rate.
///
/// Frame callbacks report time in milliseconds; a speed of 1 turns the model
/// by one radian every 500 ms.
pub const TIME_NORMALIZATION: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Per-axis rotation angles (radians) and angular speeds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub angles: Vector3<f32>,
    pub speeds: Vector3<f32>,
}

impl RotationState {
    pub fn new(speeds: Vector3<f32>) -> Self {
        Self {
            angles: Vector3::zeros(),
            speeds,
        }
    }

    pub fn angle(&self, axis: Axis) -> f32 {
        self.angles[axis.index()]
    }

    pub fn speed(&self, axis: Axis) -> f32 {
        self.speeds[axis.index()]
    }

    pub fn set_speed(&mut self, axis: Axis, value: f32) {
        self.speeds[axis.index()] = value;
    }

    /// Integrate the current speeds over `delta_time` frame units
    pub fn integrate(&mut self, delta_time: f32) {
        self.angles += self.speeds * (delta_time / TIME_NORMALIZATION);
    }

    /// Rotation about X, then Y, then Z, right-multiplied in that order
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.angles.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.angles.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.angles.z));
        rx * ry * rz
    }
}

/// Model, view and projection matrices kept in sync with rotation,
/// zoom and viewport changes.
///
/// Each matrix only changes through its own mutator: `advance` touches the
/// model, `set_zoom` the view, `set_viewport` the projection.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    camera: Camera,
    rotation: RotationState,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    model: Matrix4<f32>,
}

impl TransformPipeline {
    pub fn new(width: u32, height: u32, zoom: f32, speeds: Vector3<f32>) -> Self {
        let camera = Camera::new();
        let rotation = RotationState::new(speeds);
        Self {
            projection: camera.projection_matrix(width, height),
            view: camera.view_matrix(zoom),
            model: rotation.matrix(),
            camera,
            rotation,
        }
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn set_speed(&mut self, axis: Axis, value: f32) {
        self.rotation.set_speed(axis, value);
    }

    /// Step the rotation forward and rebuild the model matrix
    pub fn advance(&mut self, delta_time: f32) -> &Matrix4<f32> {
        self.rotation.integrate(delta_time);
        self.model = self.rotation.matrix();
        &self.model
    }

    pub fn set_zoom(&mut self, distance: f32) -> &Matrix4<f32> {
        self.view = self.camera.view_matrix(distance);
        log::debug!("view matrix rebuilt for zoom {distance}");
        &self.view
    }

    /// Rebuild the projection. `height` must be non-zero.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> &Matrix4<f32> {
        self.projection = self.camera.projection_matrix(width, height);
        log::debug!("projection matrix rebuilt for {width}x{height}");
        &self.projection
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn model(&self) -> &Matrix4<f32> {
        &self.model
    }
}
