/// Flattening a colored triangle list into GPU-ready vertex buffers
use crate::error::ColorizeError;
use crate::geometry::Triangle;
use crate::gradient::Gradient;

/// Flat vertex data for a non-indexed-deduplicated triangle list.
///
/// `positions` and `colors` hold three floats per vertex, `indices` one entry
/// per vertex counting up from zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest distance of any vertex from the origin
    pub fn max_vertex_norm(&self) -> f32 {
        crate::viewport::max_vertex_norm(&self.positions)
    }

    /// Iterate `(positions, color)` per triangle, nine position floats each
    pub fn triangles(&self) -> impl Iterator<Item = (&[f32], &[f32])> {
        self.positions
            .chunks_exact(9)
            .zip(self.colors.chunks_exact(9))
            .map(|(p, c)| (p, &c[..3]))
    }
}

/// Give every vertex of triangle `i` the color `gradient[i]`
pub fn colorize(triangles: &[Triangle], gradient: &Gradient) -> Result<MeshBuffers, ColorizeError> {
    if gradient.len() != triangles.len() {
        return Err(ColorizeError::LengthMismatch {
            triangles: triangles.len(),
            colors: gradient.len(),
        });
    }

    let vertex_count = triangles
        .len()
        .checked_mul(3)
        .filter(|n| u32::try_from(*n).is_ok())
        .ok_or(ColorizeError::IndexOverflow {
            triangles: triangles.len(),
        })?;

    let mut buffers = MeshBuffers {
        positions: Vec::with_capacity(vertex_count * 3),
        colors: Vec::with_capacity(vertex_count * 3),
        indices: Vec::with_capacity(vertex_count),
    };

    let mut next_index = 0u32;
    for (triangle, color) in triangles.iter().zip(gradient.iter()) {
        let rgb = color.to_array();
        for vertex in &triangle.vertices {
            buffers.positions.extend_from_slice(vertex.position.coords.as_slice());
            buffers.colors.extend_from_slice(&rgb);
            buffers.indices.push(next_index);
            next_index += 1;
        }
    }

    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Mesh;
    use nalgebra::Point3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_buffer_layout() {
        let cube = Mesh::cube(2.0);
        let gradient = Gradient::random(&mut StdRng::seed_from_u64(11), 3, 12).unwrap();
        let buffers = colorize(&cube.triangles, &gradient).unwrap();

        assert_eq!(buffers.indices, (0..36).collect::<Vec<u32>>());
        assert_eq!(buffers.positions.len(), 3 * buffers.indices.len());
        assert_eq!(buffers.colors.len(), 3 * buffers.indices.len());
        assert_eq!(buffers.triangle_count(), 12);

        for (i, vertex_colors) in buffers.colors.chunks_exact(9).enumerate() {
            let expected = gradient[i].to_array();
            for rgb in vertex_colors.chunks_exact(3) {
                assert_eq!(rgb, &expected);
            }
        }
    }

    #[test]
    fn test_positions_are_not_deduplicated() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let triangles = vec![Triangle::from_points(a, b, c); 2];
        let gradient =
            Gradient::from_anchors(&[Color::new(0.0, 0.0, 0.0), Color::new(1.0, 1.0, 1.0)], 2)
                .unwrap();

        let buffers = colorize(&triangles, &gradient).unwrap();
        assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(buffers.positions[..9], buffers.positions[9..]);
        assert_eq!(&buffers.positions[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&buffers.positions[3..6], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let cube = Mesh::cube(1.0);
        let gradient = Gradient::random(&mut StdRng::seed_from_u64(2), 2, 11).unwrap();
        assert_eq!(
            colorize(&cube.triangles, &gradient),
            Err(ColorizeError::LengthMismatch {
                triangles: 12,
                colors: 11
            })
        );
    }

    #[test]
    fn test_empty_mesh() {
        let buffers = colorize(&[], &Gradient::default()).unwrap();
        assert!(buffers.is_empty());
        assert_eq!(buffers.max_vertex_norm(), 0.0);
    }
}
