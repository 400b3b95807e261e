/// Canvas size and camera distance, mutated by input events
use nalgebra::Vector3;

/// Camera distance as a multiple of the mesh's bounding radius
pub const FRAMING_FACTOR: f32 = 3.0;

/// Zoom change per unit of scroll delta
pub const SCROLL_SENSITIVITY: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    width: u32,
    height: u32,
    zoom: f32,
}

impl ViewportState {
    pub fn new(width: u32, height: u32, zoom: f32) -> Self {
        Self {
            width,
            height,
            zoom,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Width over height. Height must be positive.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    /// Scale the zoom by a wheel delta; positive deltas move the camera closer.
    ///
    /// A delta that would put the eye on or past the target is ignored.
    pub fn apply_scroll(&mut self, delta: f32) -> f32 {
        let zoom = self.zoom * (1.0 - delta * SCROLL_SENSITIVITY);
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
        self.zoom
    }

    /// Place the camera far enough out to frame every vertex.
    ///
    /// Leaves the zoom alone when there is nothing to frame.
    pub fn frame_positions(&mut self, positions: &[f32]) -> f32 {
        let radius = max_vertex_norm(positions);
        if radius > 0.0 {
            self.zoom = FRAMING_FACTOR * radius;
        }
        self.zoom
    }
}

/// Largest Euclidean norm over a flat `[x, y, z, x, y, z, ..]` buffer
pub fn max_vertex_norm(positions: &[f32]) -> f32 {
    positions
        .chunks_exact(3)
        .map(|p| Vector3::new(p[0], p[1], p[2]).norm())
        .fold(0.0, f32::max)
}
