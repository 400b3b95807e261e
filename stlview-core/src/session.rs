/// Viewer session: owns all render-loop state and maps input events onto it
use nalgebra::Matrix4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::RangeInclusive;

use crate::colorize::{colorize, MeshBuffers};
use crate::config::ViewerConfig;
use crate::error::SessionError;
use crate::geometry::Mesh;
use crate::gradient::{random_anchor_count, Gradient};
use crate::stl;
use crate::transform::{Axis, TransformPipeline};
use crate::viewport::ViewportState;

/// Receiver of everything a rendering backend needs to upload.
///
/// Implementations copy the data into GPU buffers and uniforms, a terminal
/// framebuffer, or whatever else they draw with.
pub trait RenderBackend {
    fn upload_mesh(&mut self, buffers: &MeshBuffers);
    fn set_projection(&mut self, projection: &Matrix4<f32>);
    fn set_view(&mut self, view: &Matrix4<f32>);
    fn set_model(&mut self, model: &Matrix4<f32>);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn upload_mesh(&mut self, buffers: &MeshBuffers) {
        (**self).upload_mesh(buffers)
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        (**self).set_projection(projection)
    }

    fn set_view(&mut self, view: &Matrix4<f32>) {
        (**self).set_view(view)
    }

    fn set_model(&mut self, model: &Matrix4<f32>) {
        (**self).set_model(model)
    }
}

/// State shared by the frame callback and the input handlers.
///
/// All handlers run to completion on one thread, so a mesh load replaces the
/// buffers and the zoom before the next frame sees either.
pub struct ViewerSession<B: RenderBackend> {
    backend: B,
    pipeline: TransformPipeline,
    viewport: ViewportState,
    mesh: MeshBuffers,
    rng: StdRng,
    anchor_range: RangeInclusive<usize>,
    last_timestamp: Option<f64>,
}

impl<B: RenderBackend> ViewerSession<B> {
    /// Start a session showing the demo cube and push the initial state.
    ///
    /// The demo cube is shown at the configured zoom. Framing the camera to
    /// the mesh radius only happens in `load_mesh`.
    pub fn new(config: ViewerConfig, backend: B) -> Result<Self, SessionError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            backend,
            pipeline: TransformPipeline::new(
                config.width,
                config.height,
                config.zoom,
                config.speeds,
            ),
            viewport: ViewportState::new(config.width, config.height, config.zoom),
            mesh: MeshBuffers::default(),
            rng,
            anchor_range: config.anchor_range,
            last_timestamp: None,
        };

        session.mesh = session.colorize_mesh(&Mesh::cube(config.demo_cube_size))?;
        session.backend.upload_mesh(&session.mesh);
        session.backend.set_projection(session.pipeline.projection());
        session.backend.set_view(session.pipeline.view());
        session.backend.set_model(session.pipeline.model());
        Ok(session)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Display-refresh callback; `timestamp` is in milliseconds
    pub fn on_frame(&mut self, timestamp: f64) {
        let delta = match self.last_timestamp {
            Some(last) => (timestamp - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);
        self.advance(delta as f32);
    }

    /// Integrate rotation over `delta_time` frame units and push the model
    pub fn advance(&mut self, delta_time: f32) {
        let model = self.pipeline.advance(delta_time);
        self.backend.set_model(model);
    }

    /// Height must be non-zero
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport.set_size(width, height);
        let projection = self.pipeline.set_viewport(width, height);
        self.backend.set_projection(projection);
    }

    pub fn on_speed_change(&mut self, axis: Axis, value: f32) {
        self.pipeline.set_speed(axis, value);
    }

    /// Wheel callback; positive deltas zoom in
    pub fn on_zoom(&mut self, delta_scroll: f32) {
        let zoom = self.viewport.apply_scroll(delta_scroll);
        self.push_zoom(zoom);
    }

    pub fn set_zoom(&mut self, distance: f32) {
        self.viewport.set_zoom(distance);
        self.push_zoom(distance);
    }

    /// Parse, color and install a new mesh.
    ///
    /// On error the previous mesh and matrices stay active.
    pub fn on_file_loaded(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let mesh = stl::parse_stl(bytes).map_err(|e| {
            log::warn!("rejected mesh upload: {e}");
            e
        })?;
        log::info!("parsed {} triangles", mesh.triangle_count());
        self.load_mesh(&mesh)
    }

    pub fn load_mesh(&mut self, mesh: &Mesh) -> Result<(), SessionError> {
        let buffers = self.colorize_mesh(mesh)?;

        let zoom = self.viewport.frame_positions(&buffers.positions);
        self.backend.upload_mesh(&buffers);
        self.mesh = buffers;
        self.push_zoom(zoom);
        Ok(())
    }

    fn colorize_mesh(&mut self, mesh: &Mesh) -> Result<MeshBuffers, SessionError> {
        let anchors = random_anchor_count(&mut self.rng, &self.anchor_range);
        let gradient = Gradient::random(&mut self.rng, anchors, mesh.triangle_count())?;
        let buffers = colorize(&mesh.triangles, &gradient)?;
        log::info!(
            "colored {} triangles with {} anchor colors",
            buffers.triangle_count(),
            anchors
        );
        Ok(buffers)
    }

    fn push_zoom(&mut self, zoom: f32) {
        let view = self.pipeline.set_zoom(zoom);
        self.backend.set_view(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingBackend {
        uploads: usize,
        projections: usize,
        views: usize,
        models: usize,
    }

    impl RenderBackend for CountingBackend {
        fn upload_mesh(&mut self, _buffers: &MeshBuffers) {
            self.uploads += 1;
        }

        fn set_projection(&mut self, _projection: &Matrix4<f32>) {
            self.projections += 1;
        }

        fn set_view(&mut self, _view: &Matrix4<f32>) {
            self.views += 1;
        }

        fn set_model(&mut self, _model: &Matrix4<f32>) {
            self.models += 1;
        }
    }

    #[test]
    fn test_new_session_pushes_everything_once() {
        let session =
            ViewerSession::new(ViewerConfig::default().with_seed(1), CountingBackend::default())
                .unwrap();
        let backend = session.backend();
        assert_eq!(
            (backend.uploads, backend.projections, backend.views, backend.models),
            (1, 1, 1, 1)
        );
        assert_eq!(session.mesh().triangle_count(), 12);
    }

    #[test]
    fn test_first_frame_does_not_rotate() {
        let mut session =
            ViewerSession::new(ViewerConfig::default().with_seed(1), CountingBackend::default())
                .unwrap();
        session.on_frame(12_345.0);
        assert_eq!(session.pipeline().rotation().angles.norm(), 0.0);

        session.on_frame(12_845.0);
        assert!((session.pipeline().rotation().angle(Axis::X) - 0.5).abs() < 1e-6);
        assert_eq!(session.backend().models, 3);
    }

    #[test]
    fn test_session_works_through_borrowed_backend() {
        let mut backend = CountingBackend::default();
        {
            let mut session =
                ViewerSession::new(ViewerConfig::default().with_seed(4), &mut backend).unwrap();
            session.on_resize(640, 480);
        }
        assert_eq!(backend.projections, 2);
    }
}
