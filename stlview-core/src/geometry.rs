/// Triangle soup geometry as handed over by the STL parser
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and facet normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn at(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle from bare positions, deriving the facet normal
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c).unwrap_or_else(Vector3::zeros);
        Self::new(
            Vertex::at(a, normal),
            Vertex::at(b, normal),
            Vertex::at(c, normal),
        )
    }

    /// Face normal from winding order, `None` for degenerate triangles
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = &self.vertices;
        face_normal(&v0.position, &v1.position, &v2.position)
    }
}

pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Option<Vector3<f32>> {
    (b - a).cross(&(c - a)).try_normalize(f32::EPSILON)
}

/// A 3D mesh composed of independent triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned cube centered on the origin, two triangles per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // Corners of each face, counter-clockwise seen from outside
        let faces: [[[f32; 3]; 4]; 6] = [
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        ];

        let mut mesh = Self::with_capacity(12);
        for [a, b, c, d] in faces {
            let [a, b, c, d] = [a, b, c, d].map(Point3::from);
            mesh.add_triangle(Triangle::from_points(a, b, c));
            mesh.add_triangle(Triangle::from_points(a, c, d));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_outward_normals() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangle_count(), 12);

        for triangle in &cube.triangles {
            let normal = triangle.calculate_normal().unwrap();
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
                / 3.0;
            assert!(normal.dot(&centroid) > 0.0);
            assert!((normal - triangle.vertices[0].normal).norm() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_triangle_has_no_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let triangle = Triangle::from_points(p, p, p);
        assert!(triangle.calculate_normal().is_none());
        assert_eq!(triangle.vertices[0].normal, Vector3::zeros());
    }
}
