/// STLView Web - WASM bindings around a viewer session
///
/// The JavaScript shell owns the WebGL context. Each frame it calls `frame`,
/// then re-uploads whatever the `take_*_dirty` flags report as changed.

use nalgebra::Matrix4;
use stlview_core::{Axis, MeshBuffers, RenderBackend, ViewerConfig, ViewerSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// Latest data pushed by the session, waiting to be uploaded by JavaScript
#[derive(Debug, Default)]
struct FrameBuffers {
    mesh: MeshBuffers,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    model: Matrix4<f32>,
    mesh_dirty: bool,
    projection_dirty: bool,
    view_dirty: bool,
}

impl RenderBackend for FrameBuffers {
    fn upload_mesh(&mut self, buffers: &MeshBuffers) {
        self.mesh = buffers.clone();
        self.mesh_dirty = true;
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
        self.projection_dirty = true;
    }

    fn set_view(&mut self, view: &Matrix4<f32>) {
        self.view = *view;
        self.view_dirty = true;
    }

    fn set_model(&mut self, model: &Matrix4<f32>) {
        self.model = *model;
    }
}

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedAxis {
    X,
    Y,
    Z,
}

impl From<SpeedAxis> for Axis {
    fn from(axis: SpeedAxis) -> Self {
        match axis {
            SpeedAxis::X => Axis::X,
            SpeedAxis::Y => Axis::Y,
            SpeedAxis::Z => Axis::Z,
        }
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    session: ViewerSession<FrameBuffers>,
    canvas: Option<HtmlCanvasElement>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach to the canvas with the given element id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebViewer, JsValue> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

        let (width, height) = fit_canvas(&canvas);
        let mut viewer = Self::headless(width, height.max(1))?;
        viewer.canvas = Some(canvas);
        Ok(viewer)
    }

    /// A viewer with a fixed viewport and no DOM canvas
    pub fn headless(width: u32, height: u32) -> Result<WebViewer, JsValue> {
        let config = ViewerConfig::default().with_size(width, height);
        let session = ViewerSession::new(config, FrameBuffers::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("viewer ready at {}x{}", width, height);
        Ok(WebViewer {
            session,
            canvas: None,
        })
    }

    /// Window resize callback: re-read the canvas size
    pub fn resize(&mut self) {
        if let Some(canvas) = &self.canvas {
            let (width, height) = fit_canvas(canvas);
            self.set_size(width, height);
        }
    }

    /// Ignores zero-height sizes, which have no aspect ratio
    pub fn set_size(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.session.on_resize(width, height);
    }

    /// `requestAnimationFrame` callback
    pub fn frame(&mut self, timestamp: f64) {
        self.session.on_frame(timestamp);
    }

    pub fn set_speed(&mut self, axis: SpeedAxis, value: f32) {
        self.session.on_speed_change(axis.into(), value);
    }

    pub fn speed(&self, axis: SpeedAxis) -> f32 {
        self.session.pipeline().rotation().speed(axis.into())
    }

    /// Wheel callback taking the event's `deltaY`
    pub fn zoom(&mut self, delta_y: f32) {
        self.session.on_zoom(delta_y);
    }

    pub fn current_zoom(&self) -> f32 {
        self.session.viewport().zoom()
    }

    /// FileReader load callback. On failure the previous mesh stays up.
    pub fn load_file(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.session.on_file_loaded(bytes).map_err(|e| {
            log::error!("{}", e);
            JsValue::from_str(&e.to_string())
        })
    }

    pub fn projection(&self) -> Vec<f32> {
        self.backend().projection.as_slice().to_vec()
    }

    pub fn view(&self) -> Vec<f32> {
        self.backend().view.as_slice().to_vec()
    }

    pub fn model(&self) -> Vec<f32> {
        self.backend().model.as_slice().to_vec()
    }

    pub fn positions(&self) -> Vec<f32> {
        self.backend().mesh.positions.clone()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.backend().mesh.colors.clone()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.backend().mesh.indices.clone()
    }

    pub fn index_count(&self) -> usize {
        self.backend().mesh.indices.len()
    }

    pub fn take_mesh_dirty(&mut self) -> bool {
        std::mem::take(&mut self.session.backend_mut().mesh_dirty)
    }

    pub fn take_projection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.session.backend_mut().projection_dirty)
    }

    pub fn take_view_dirty(&mut self) -> bool {
        std::mem::take(&mut self.session.backend_mut().view_dirty)
    }
}

impl WebViewer {
    fn backend(&self) -> &FrameBuffers {
        self.session.backend()
    }
}

/// Match the canvas drawing buffer to its CSS size
fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let width = canvas.client_width().max(0) as u32;
    let height = canvas.client_height().max(0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}
