/// Startup settings for a viewer session
use nalgebra::Vector3;
use std::ops::RangeInclusive;

/// Initial state of a [`ViewerSession`](crate::session::ViewerSession)
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Angular speed per axis, in radians per 500 frame-time units
    pub speeds: Vector3<f32>,
    pub zoom: f32,
    /// How many random anchors a newly loaded mesh's gradient gets
    pub anchor_range: RangeInclusive<usize>,
    /// Fixed seed for reproducible gradients; entropy when `None`
    pub seed: Option<u64>,
    /// Edge length of the cube shown before any file is loaded
    pub demo_cube_size: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            speeds: Vector3::new(0.5, 0.3, 0.2),
            zoom: 3.0,
            anchor_range: 2..=6,
            seed: None,
            demo_cube_size: 2.0,
        }
    }
}

impl ViewerConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_speeds(mut self, x: f32, y: f32, z: f32) -> Self {
        self.speeds = Vector3::new(x, y, z);
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_anchor_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.anchor_range = range;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
