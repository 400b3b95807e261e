/// STLView Core Library - gradient coloring and real-time transforms
///
/// This library turns a parsed triangle mesh into per-vertex-colored buffers
/// and keeps the model, view and projection matrices of a spinning viewer up
/// to date. It performs no GPU calls; any backend can consume its output.

pub mod color;
pub mod colorize;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod projection;
pub mod session;
pub mod stl;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use color::{Color, ColorInterpolation};
pub use colorize::{colorize, MeshBuffers};
pub use config::ViewerConfig;
pub use error::{ColorizeError, GradientError, SessionError, StlError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use gradient::Gradient;
pub use projection::Camera;
pub use session::{RenderBackend, ViewerSession};
pub use transform::{Axis, RotationState, TransformPipeline};
pub use viewport::ViewportState;
