/// Truecolor ASCII rasterizer fed by a viewer session
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use stlview_core::geometry::face_normal;
use stlview_core::projection::project_to_screen;
use stlview_core::{Color as MeshColor, MeshBuffers, RenderBackend};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Share of a face's color kept even when it faces away from the viewer
const AMBIENT: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// Terminal framebuffer that draws whatever the session last uploaded
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    mesh: MeshBuffers,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    model: Matrix4<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
            mesh: MeshBuffers::default(),
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            model: Matrix4::identity(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Rasterize the current mesh with the current matrices
    pub fn render(&mut self) {
        let model_view = self.view * self.model;
        let mvp = self.projection * model_view;
        let (width, height) = (self.width as u32, self.height as u32);

        let mut faces = Vec::with_capacity(self.mesh.triangle_count());
        for (positions, rgb) in self.mesh.triangles() {
            let corners: Vec<Point3<f32>> = positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2]))
                .collect();

            let projected: Option<Vec<(f32, f32, f32)>> = corners
                .iter()
                .map(|p| project_to_screen(p, &mvp, width, height))
                .collect();
            let Some(screen) = projected else {
                continue; // Triangle is clipped
            };

            // Facing ratio in eye space, where the camera looks down -Z
            let eye: Vec<Point3<f32>> = corners
                .iter()
                .map(|p| model_view.transform_point(p))
                .collect();
            let facing = face_normal(&eye[0], &eye[1], &eye[2])
                .map(|n| n.z.abs())
                .unwrap_or(0.0);

            let color = MeshColor::new(rgb[0], rgb[1], rgb[2]);
            faces.push((screen, shade(color, facing)));
        }

        for (screen, cell) in faces {
            self.rasterize_triangle(&screen, cell);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32)], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as usize;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as usize;
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as isize).min(self.width as isize - 1);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as isize).min(self.height as isize - 1);
        if max_x < 0 || max_y < 0 {
            return;
        }

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y * self.width + x;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Number of cells covered by geometry in the last render
    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    fn upload_mesh(&mut self, buffers: &MeshBuffers) {
        log::debug!("terminal renderer received {} triangles", buffers.triangle_count());
        self.mesh = buffers.clone();
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
    }

    fn set_view(&mut self, view: &Matrix4<f32>) {
        self.view = *view;
    }

    fn set_model(&mut self, model: &Matrix4<f32>) {
        self.model = *model;
    }
}

/// Pick a glyph by how squarely the face points at the viewer and dim its color
fn shade(color: MeshColor, facing: f32) -> Cell {
    let facing = facing.clamp(0.0, 1.0);
    let index = (facing * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    let (r, g, b) = color.scale(AMBIENT + (1.0 - AMBIENT) * facing).to_rgb8();
    Cell {
        glyph: LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)],
        color: Color::Rgb { r, g, b },
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
