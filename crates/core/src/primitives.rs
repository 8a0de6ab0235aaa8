//! Procedural meshes for the curved primitives and the table plane.
//!
//! All generators emit counter-clockwise triangles when seen from outside the
//! surface, 16-bit indices, and genuine per-vertex normals.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, MeshError, Vertex, MAX_VERTICES};

const SEAM_TOLERANCE: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderSpec {
    /// Center of the first ring; its z is the base height.
    pub center: [f32; 3],
    pub radius: f32,
    pub segments: u32,
    /// Offset along +z of the second ring. Zero gives a flat disc.
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorusSpec {
    pub major_radius: f32,
    pub minor_radius: f32,
    pub major_segments: u32,
    pub minor_segments: u32,
    pub center: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereSpec {
    pub center: [f32; 3],
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
}

pub fn make_cylinder(spec: &CylinderSpec) -> Result<Mesh, MeshError> {
    const NAME: &str = "cylinder";
    check_segments(NAME, spec.segments, 3)?;
    check_positive(NAME, "radius", spec.radius)?;
    if !spec.length.is_finite() || spec.length < 0.0 {
        return Err(MeshError::InvalidDimension {
            primitive: NAME,
            field: "length",
            expected: "finite and non-negative",
            value: spec.length,
        });
    }

    let n = spec.segments as usize;
    let ring_len = n + 1;
    check_vertex_count(NAME, 2 * ring_len)?;

    let [cx, cy, base_z] = spec.center;
    let r = spec.radius;
    let mut vertices = Vec::with_capacity(2 * ring_len);
    // Caps and walls share the ring vertices. Walls get the radial normal;
    // a zero-length shell is a disc and faces along z instead.
    let flat = spec.length == 0.0;
    for (z, cap_normal) in [(base_z, -1.0), (base_z + spec.length, 1.0)] {
        for i in 0..=n {
            let theta = TAU * (i % n) as f32 / n as f32;
            let (sin, cos) = theta.sin_cos();
            let x = r * cos;
            let y = r * sin;
            // Planar projection of the ring onto the unit square.
            let uv = [(x + r) / (2.0 * r), (y + r) / (2.0 * r)];
            let mut vertex = Vertex::new([cx + x, cy + y, z], uv);
            vertex.normal = if flat {
                [0.0, 0.0, cap_normal]
            } else {
                [cos, sin, 0.0]
            };
            vertices.push(vertex);
        }
    }

    let top = 0u16;
    let bottom = ring_len as u16;
    let n16 = n as u16;
    let mut indices = Vec::with_capacity(12 * n - 12);

    // A fan from ring vertex 0 needs n - 2 triangles to cover the n-gon.
    for i in 1..n16 - 1 {
        indices.extend_from_slice(&[top, top + i + 1, top + i]);
    }
    for i in 1..n16 - 1 {
        indices.extend_from_slice(&[bottom, bottom + i, bottom + i + 1]);
    }
    for i in 0..n16 {
        let t0 = top + i;
        let t1 = top + i + 1;
        let b0 = bottom + i;
        let b1 = bottom + i + 1;
        indices.extend_from_slice(&[t0, t1, b1, t0, b1, b0]);
    }

    let mesh = Mesh::with_vertices_indices(vertices, indices);
    tracing::debug!(
        segments = spec.segments,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "cylinder generated"
    );
    Ok(mesh)
}

pub fn make_torus(spec: &TorusSpec) -> Result<Mesh, MeshError> {
    const NAME: &str = "torus";
    check_segments(NAME, spec.major_segments, 3)?;
    check_segments(NAME, spec.minor_segments, 3)?;
    check_positive(NAME, "major_radius", spec.major_radius)?;
    check_positive(NAME, "minor_radius", spec.minor_radius)?;

    let major = spec.major_segments as usize;
    let minor = spec.minor_segments as usize;
    let row_len = minor + 1;
    check_vertex_count(NAME, (major + 1) * row_len)?;

    let center = Vec3::from(spec.center);
    let big_r = spec.major_radius;
    let small_r = spec.minor_radius;
    let mut vertices = Vec::with_capacity((major + 1) * row_len);
    for i in 0..=major {
        let u = TAU * (i % major) as f32 / major as f32;
        for j in 0..=minor {
            let v = TAU * (j % minor) as f32 / minor as f32;
            let ring = big_r + small_r * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), small_r * v.sin()) + center;
            let uv = [i as f32 / major as f32, j as f32 / minor as f32];
            vertices.push(Vertex::new(position.to_array(), uv));
        }
    }

    let mut indices = Vec::with_capacity(6 * major * minor);
    for i in 0..major {
        for j in 0..minor {
            let a = (i * row_len + j) as u16;
            let b = ((i + 1) * row_len + j) as u16;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    let mut mesh = Mesh::with_vertices_indices(vertices, indices);
    mesh.compute_normals();
    mesh.weld_seam_normals(SEAM_TOLERANCE);
    tracing::debug!(
        major = spec.major_segments,
        minor = spec.minor_segments,
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        "torus generated"
    );
    Ok(mesh)
}

pub fn make_sphere(spec: &SphereSpec) -> Result<Mesh, MeshError> {
    const NAME: &str = "sphere";
    check_segments(NAME, spec.sectors, 3)?;
    check_segments(NAME, spec.stacks, 2)?;
    check_positive(NAME, "radius", spec.radius)?;

    let sectors = spec.sectors as usize;
    let stacks = spec.stacks as usize;
    let row_len = sectors + 1;
    check_vertex_count(NAME, (stacks + 1) * row_len)?;

    let center = Vec3::from(spec.center);
    let mut vertices = Vec::with_capacity((stacks + 1) * row_len);
    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - PI * i as f32 / stacks as f32;
        let (ring, z) = (stack_angle.cos(), stack_angle.sin());
        for j in 0..=sectors {
            let sector_angle = TAU * (j % sectors) as f32 / sectors as f32;
            let normal = Vec3::new(ring * sector_angle.cos(), ring * sector_angle.sin(), z);
            vertices.push(Vertex {
                position: (center + normal * spec.radius).to_array(),
                normal: normal.to_array(),
                uv: [j as f32 / sectors as f32, i as f32 / stacks as f32],
            });
        }
    }

    let mut indices = Vec::with_capacity(6 * sectors * (stacks - 1));
    for i in 0..stacks {
        let k1 = (i * row_len) as u16;
        let k2 = k1 + row_len as u16;
        for j in 0..sectors as u16 {
            if i != 0 {
                indices.extend_from_slice(&[k1 + j, k2 + j, k1 + j + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + j + 1, k2 + j, k2 + j + 1]);
            }
        }
    }

    tracing::debug!(
        sectors = spec.sectors,
        stacks = spec.stacks,
        vertices = vertices.len(),
        indices = indices.len(),
        "sphere generated"
    );
    Ok(Mesh::with_vertices_indices(vertices, indices))
}

/// The table top: a literal quad on z = 0 with an RGBA channel per corner.
pub fn make_table_plane() -> Mesh {
    let corners = [
        ([-4.0, -5.0, 0.0], [1.0, 1.0, 1.0, 1.0], [0.0, 0.0]),
        ([2.5, -5.0, 0.0], [1.0, 1.0, 1.0, 1.0], [0.0, 1.0]),
        ([2.5, 2.0, 0.0], [0.0, 0.0, 0.0, 1.0], [1.0, 0.0]),
        ([-4.0, 2.0, 0.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0]),
    ];

    let mut mesh = Mesh::new();
    let mut colors = Vec::with_capacity(corners.len());
    for (position, color, uv) in corners {
        mesh.vertices.push(Vertex {
            position,
            normal: [0.0, 0.0, 1.0],
            uv,
        });
        colors.push(color);
    }
    mesh.colors = Some(colors);
    mesh.indices = vec![0, 2, 3, 0, 1, 2];
    mesh
}

fn check_segments(primitive: &'static str, got: u32, min: u32) -> Result<(), MeshError> {
    if got < min {
        return Err(MeshError::TooFewSegments {
            primitive,
            min,
            got,
        });
    }
    Ok(())
}

fn check_positive(primitive: &'static str, field: &'static str, value: f32) -> Result<(), MeshError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MeshError::InvalidDimension {
            primitive,
            field,
            expected: "finite and positive",
            value,
        });
    }
    Ok(())
}

fn check_vertex_count(primitive: &'static str, count: usize) -> Result<(), MeshError> {
    if count > MAX_VERTICES {
        return Err(MeshError::TooManyVertices { primitive, count });
    }
    Ok(())
}
