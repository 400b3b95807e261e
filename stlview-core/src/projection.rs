/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 100_000.0;

/// Orbit camera looking at a target along the (1, 1, 1) diagonal.
///
/// The zoom distance is applied per axis, so the eye sits at
/// `target + (d, d, d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            target: Point3::origin(),
            up: Vector3::y(),
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    pub fn eye(&self, distance: f32) -> Point3<f32> {
        self.target + Vector3::repeat(distance)
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self, distance: f32) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(distance), &self.target, &self.up)
    }

    /// Create the perspective projection matrix for a viewport.
    ///
    /// `height` must be non-zero.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let aspect = width as f32 / height as f32;
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a point through a combined MVP matrix into pixel coordinates.
///
/// Returns `(x, y, depth)` with depth in normalized device units, or `None`
/// when the point is behind the eye or outside the depth range.
pub fn project_to_screen(
    point: &Point3<f32>,
    mvp: &Matrix4<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
    Some((screen_x, screen_y, ndc.z))
}
