// Session-level behavior driven through the public input surface.

use nalgebra::Matrix4;
use stlview_core::{
    Axis, MeshBuffers, RenderBackend, SessionError, StlError, ViewerConfig, ViewerSession,
};

#[derive(Default)]
struct RecordingBackend {
    mesh: Option<MeshBuffers>,
    projection: Option<Matrix4<f32>>,
    view: Option<Matrix4<f32>>,
    model: Option<Matrix4<f32>>,
}

impl RenderBackend for RecordingBackend {
    fn upload_mesh(&mut self, buffers: &MeshBuffers) {
        self.mesh = Some(buffers.clone());
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = Some(*projection);
    }

    fn set_view(&mut self, view: &Matrix4<f32>) {
        self.view = Some(*view);
    }

    fn set_model(&mut self, model: &Matrix4<f32>) {
        self.model = Some(*model);
    }
}

fn session() -> ViewerSession<RecordingBackend> {
    ViewerSession::new(ViewerConfig::default().with_seed(7), RecordingBackend::default())
        .expect("demo cube always colorizes")
}

/// Binary STL with one facet per entry of `facets` (three vertices each)
fn binary_stl(facets: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
    for facet in facets {
        data.extend_from_slice(&[0u8; 12]);
        for vertex in facet {
            for c in vertex {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&[0u8; 2]);
    }
    data
}

#[test]
fn the_demo_cube_keeps_the_configured_zoom() {
    let config = ViewerConfig::default().with_seed(7).with_zoom(5.0);
    let session = ViewerSession::new(config, RecordingBackend::default()).unwrap();

    assert_eq!(session.viewport().zoom(), 5.0);
    assert_eq!(session.mesh().triangle_count(), 12);
    let expected_view = stlview_core::Camera::new().view_matrix(5.0);
    assert_eq!(session.backend().view, Some(expected_view));
}

#[test]
fn loading_a_mesh_frames_it_at_three_times_its_radius() {
    let mut session = session();
    let bytes = binary_stl(&[
        [[0.0, 0.0, 0.0], [6.0, 0.0, 8.0], [1.0, 1.0, 1.0]],
        [[-2.0, 3.0, 0.0], [0.0, 0.0, 4.0], [1.0, 0.0, 0.0]],
    ]);

    session.on_file_loaded(&bytes).unwrap();

    assert_eq!(session.viewport().zoom(), 30.0);
    let uploaded = session.backend().mesh.as_ref().unwrap();
    assert_eq!(uploaded.triangle_count(), 2);
    assert_eq!(uploaded.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(uploaded, session.mesh());

    let expected_view = stlview_core::Camera::new().view_matrix(30.0);
    assert_eq!(session.backend().view, Some(expected_view));
}

#[test]
fn each_triangle_gets_one_gradient_color() {
    let mut session = session();
    let facets: Vec<[[f32; 3]; 3]> = (0..25)
        .map(|i| {
            let x = i as f32;
            [[x, 0.0, 0.0], [x, 1.0, 0.0], [x, 0.0, 1.0]]
        })
        .collect();
    session.on_file_loaded(&binary_stl(&facets)).unwrap();

    let mesh = session.mesh();
    assert_eq!(mesh.indices, (0..75).collect::<Vec<u32>>());
    for (_, color) in mesh.triangles() {
        assert!(color.iter().all(|c| (-1e-6..=1.0).contains(c)));
    }
    for triangle_colors in mesh.colors.chunks_exact(9) {
        assert_eq!(triangle_colors[..3], triangle_colors[3..6]);
        assert_eq!(triangle_colors[..3], triangle_colors[6..]);
    }
}

#[test]
fn a_bad_file_leaves_the_previous_mesh_in_place() {
    let mut session = session();
    let before = session.mesh().clone();
    let view_before = session.backend().view;
    let zoom_before = session.viewport().zoom();

    let err = session.on_file_loaded(b"not an stl").unwrap_err();

    assert!(matches!(err, SessionError::Parse(StlError::TooShort(10))));
    assert_eq!(
        err.to_string(),
        "could not parse file: file too small to be a valid STL (10 bytes)"
    );
    assert_eq!(session.mesh(), &before);
    assert_eq!(session.backend().mesh.as_ref(), Some(&before));
    assert_eq!(session.backend().view, view_before);
    assert_eq!(session.viewport().zoom(), zoom_before);
}

#[test]
fn resizing_only_touches_the_projection() {
    let mut session = session();
    session.on_frame(0.0);
    session.on_frame(250.0);
    session.on_zoom(120.0);

    session.on_resize(800, 400);
    let (view, model) = (session.backend().view, session.backend().model);
    let wide = session.backend().projection;

    session.on_resize(400, 400);

    assert_ne!(session.backend().projection, wide);
    assert_eq!(session.backend().view, view);
    assert_eq!(session.backend().model, model);
    assert_eq!(session.viewport().width(), 400);
    assert_eq!(session.viewport().height(), 400);
}

#[test]
fn split_frames_rotate_as_far_as_one_long_frame() {
    let mut split = session();
    split.on_frame(1_000.0);
    split.on_frame(1_016.0);
    split.on_frame(1_049.0);

    let mut whole = session();
    whole.on_frame(1_000.0);
    whole.on_frame(1_049.0);

    let a = split.pipeline().rotation().angles;
    let b = whole.pipeline().rotation().angles;
    assert!((a - b).norm() < 1e-6);
}

#[test]
fn speed_changes_apply_from_the_next_frame() {
    let mut session = session();
    session.on_frame(0.0);
    let model = session.backend().model;
    session.on_speed_change(Axis::Z, -1.0);
    assert_eq!(session.backend().model, model);

    session.on_frame(1_000.0);
    assert!((session.pipeline().rotation().angle(Axis::Z) + 2.0).abs() < 1e-6);
}

#[test]
fn wheel_scroll_zooms_relative_to_current_distance() {
    let mut session = session();
    session.set_zoom(10.0);
    session.on_zoom(500.0);
    assert!((session.viewport().zoom() - 5.0).abs() < 1e-5);
    session.on_zoom(-1000.0);
    assert!((session.viewport().zoom() - 10.0).abs() < 1e-5);
}

#[test]
fn oversized_wheel_deltas_keep_the_camera_usable() {
    let mut session = session();
    let view = session.backend().view;

    session.on_zoom(1000.0);
    session.on_zoom(1500.0);

    assert_eq!(session.viewport().zoom(), 3.0);
    let current = session.backend().view.unwrap();
    assert!(current.iter().all(|v| v.is_finite()));
    assert_eq!(Some(current), view);

    session.on_zoom(500.0);
    assert!((session.viewport().zoom() - 1.5).abs() < 1e-6);
}

#[test]
fn seeded_sessions_color_identically() {
    let bytes = binary_stl(&[[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]; 9]);
    let mut a = session();
    let mut b = session();
    a.on_file_loaded(&bytes).unwrap();
    b.on_file_loaded(&bytes).unwrap();
    assert_eq!(a.mesh().colors, b.mesh().colors);
}
