use glam::Vec3;
use thiserror::Error;

use crate::layout::VertexLayout;

/// Largest vertex count addressable with 16-bit indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal: [0.0, 0.0, 0.0],
            uv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("{primitive} needs at least {min} segments, got {got}")]
    TooFewSegments {
        primitive: &'static str,
        min: u32,
        got: u32,
    },
    #[error("{primitive}: {field} must be {expected}, got {value}")]
    InvalidDimension {
        primitive: &'static str,
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
    #[error("{primitive} needs {count} vertices, more than 16-bit indices can address")]
    TooManyVertices {
        primitive: &'static str,
        count: usize,
    },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("{colors} colors for {vertices} vertices")]
    ColorCountMismatch { colors: usize, vertices: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    /// Optional per-vertex RGBA, carried through to the interleaved buffer.
    pub colors: Option<Vec<[f32; 4]>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertices_indices(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        Self {
            vertices,
            indices,
            colors: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    pub fn layout(&self) -> VertexLayout {
        if self.colors.is_some() {
            VertexLayout::LIT_COLORED
        } else {
            VertexLayout::LIT
        }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.len() > MAX_VERTICES {
            return Err(MeshError::TooManyVertices {
                primitive: "mesh",
                count: self.vertices.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        if let Some(colors) = &self.colors {
            if colors.len() != self.vertices.len() {
                return Err(MeshError::ColorCountMismatch {
                    colors: colors.len(),
                    vertices: self.vertices.len(),
                });
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.vertices.iter();
        let first = iter.next()?;
        let mut min = first.position;
        let mut max = first.position;

        for v in iter {
            let p = v.position;
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            min[2] = min[2].min(p[2]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
            max[2] = max[2].max(p[2]);
        }

        Some(Aabb { min, max })
    }

    /// Angle-weighted vertex normals from the triangle winding. Zero-area
    /// triangles contribute nothing.
    pub fn compute_normals(&mut self) -> bool {
        if self.indices.len() % 3 != 0 || self.vertices.is_empty() {
            return false;
        }

        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let i0 = tri[0] as usize;
            let i1 = tri[1] as usize;
            let i2 = tri[2] as usize;
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len()
            {
                continue;
            }

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let Some(face) = (p1 - p0).cross(p2 - p0).try_normalize() else {
                continue;
            };
            accum[i0] += face * (p1 - p0).angle_between(p2 - p0);
            accum[i1] += face * (p2 - p1).angle_between(p0 - p1);
            accum[i2] += face * (p0 - p2).angle_between(p1 - p2);
        }

        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            let len = n.length();
            vertex.normal = if len > 0.0 {
                (n / len).to_array()
            } else {
                [0.0, 0.0, 1.0]
            };
        }
        true
    }

    /// Welds normals of vertices sharing a position, so duplicated seam
    /// vertices shade identically.
    pub fn weld_seam_normals(&mut self, tolerance: f32) {
        let tol_sq = tolerance * tolerance;
        let count = self.vertices.len();
        let mut summed: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|v| Vec3::from(v.normal))
            .collect();

        for a in 0..count {
            let pa = Vec3::from(self.vertices[a].position);
            for b in (a + 1)..count {
                let pb = Vec3::from(self.vertices[b].position);
                if pa.distance_squared(pb) <= tol_sq {
                    let na = Vec3::from(self.vertices[a].normal);
                    let nb = Vec3::from(self.vertices[b].normal);
                    summed[a] += nb;
                    summed[b] += na;
                }
            }
        }

        for (vertex, n) in self.vertices.iter_mut().zip(summed) {
            if let Some(n) = n.try_normalize() {
                vertex.normal = n.to_array();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::with_vertices_indices(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn bounds_for_simple_points() {
        let mesh = Mesh::with_vertices_indices(
            vec![
                Vertex::new([1.0, -2.0, 0.5], [0.0, 0.0]),
                Vertex::new([-3.0, 4.0, 2.0], [0.0, 0.0]),
            ],
            vec![0, 1, 0],
        );
        let bounds = mesh.bounds().expect("bounds");
        assert_eq!(bounds.min, [-3.0, -2.0, 0.5]);
        assert_eq!(bounds.max, [1.0, 4.0, 2.0]);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn normals_for_triangle() {
        let mut mesh = triangle();
        assert!(mesh.compute_normals());
        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn normals_rejects_partial_triangles() {
        let mut mesh = triangle();
        mesh.indices.push(0);
        assert!(!mesh.compute_normals());
    }

    #[test]
    fn validate_catches_out_of_range_index() {
        let mut mesh = triangle();
        mesh.indices = vec![0, 1, 3];
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn validate_catches_color_mismatch() {
        let mut mesh = triangle();
        mesh.colors = Some(vec![[1.0; 4]]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::ColorCountMismatch { .. })
        ));
    }

    #[test]
    fn layout_follows_colors() {
        let mut mesh = triangle();
        assert_eq!(mesh.layout(), VertexLayout::LIT);
        mesh.colors = Some(vec![[1.0; 4]; 3]);
        assert_eq!(mesh.layout(), VertexLayout::LIT_COLORED);
    }

    #[test]
    fn welding_averages_coincident_vertices() {
        let mut mesh = Mesh::with_vertices_indices(
            vec![
                Vertex {
                    position: [0.0, 0.0, 0.0],
                    normal: [1.0, 0.0, 0.0],
                    uv: [0.0, 0.0],
                },
                Vertex {
                    position: [0.0, 0.0, 0.0],
                    normal: [0.0, 1.0, 0.0],
                    uv: [1.0, 0.0],
                },
            ],
            Vec::new(),
        );
        mesh.weld_seam_normals(1e-5);
        let expected = std::f32::consts::FRAC_1_SQRT_2;
        for v in &mesh.vertices {
            assert!((v.normal[0] - expected).abs() < 1e-5);
            assert!((v.normal[1] - expected).abs() < 1e-5);
        }
    }
}
