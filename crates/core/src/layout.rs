//! Interleaved vertex layouts shared by the mesher and the GPU backend.
//!
//! Offsets and strides are counted in `f32`s; use [`VertexLayout::stride_bytes`]
//! and [`VertexAttribute::offset_bytes`] when handing them to a graphics API.

use thiserror::Error;

use crate::mesh::Mesh;

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Normal,
    Uv,
    Color,
}

impl AttributeKind {
    pub fn components(self) -> usize {
        match self {
            AttributeKind::Position | AttributeKind::Normal => 3,
            AttributeKind::Uv => 2,
            AttributeKind::Color => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub kind: AttributeKind,
    /// Shader input slot.
    pub location: u32,
    pub offset: usize,
}

impl VertexAttribute {
    pub const fn new(kind: AttributeKind, location: u32, offset: usize) -> Self {
        Self {
            kind,
            location,
            offset,
        }
    }

    pub fn components(&self) -> usize {
        self.kind.components()
    }

    pub fn offset_bytes(&self) -> usize {
        self.offset * FLOAT_BYTES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub stride: usize,
    pub attributes: &'static [VertexAttribute],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("attribute at location {location} runs past the vertex stride")]
    OutOfBounds { location: u32 },
    #[error("attributes at locations {first} and {second} overlap")]
    Overlap { first: u32, second: u32 },
    #[error("location {0} is bound more than once")]
    DuplicateLocation(u32),
}

impl VertexLayout {
    /// Position, normal, uv. Used for every generated primitive.
    pub const LIT: VertexLayout = VertexLayout {
        stride: 8,
        attributes: &[
            VertexAttribute::new(AttributeKind::Position, 0, 0),
            VertexAttribute::new(AttributeKind::Normal, 1, 3),
            VertexAttribute::new(AttributeKind::Uv, 2, 6),
        ],
    };

    /// [`VertexLayout::LIT`] followed by an RGBA color the shader ignores.
    pub const LIT_COLORED: VertexLayout = VertexLayout {
        stride: 12,
        attributes: &[
            VertexAttribute::new(AttributeKind::Position, 0, 0),
            VertexAttribute::new(AttributeKind::Normal, 1, 3),
            VertexAttribute::new(AttributeKind::Uv, 2, 6),
            VertexAttribute::new(AttributeKind::Color, 3, 8),
        ],
    };

    pub fn stride_bytes(&self) -> usize {
        self.stride * FLOAT_BYTES
    }

    pub fn attribute(&self, kind: AttributeKind) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|attr| attr.kind == kind)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for (i, a) in self.attributes.iter().enumerate() {
            if a.offset + a.components() > self.stride {
                return Err(LayoutError::OutOfBounds {
                    location: a.location,
                });
            }
            for b in &self.attributes[i + 1..] {
                if a.location == b.location {
                    return Err(LayoutError::DuplicateLocation(a.location));
                }
                let a_end = a.offset + a.components();
                let b_end = b.offset + b.components();
                if a.offset < b_end && b.offset < a_end {
                    return Err(LayoutError::Overlap {
                        first: a.location,
                        second: b.location,
                    });
                }
            }
        }
        Ok(())
    }

    /// Packs the mesh into `vertex_count * stride` floats. Attributes the mesh
    /// lacks (colors on an uncolored mesh) are written as opaque white.
    pub fn interleave(&self, mesh: &Mesh) -> Vec<f32> {
        let mut data = vec![0.0; mesh.vertices.len() * self.stride];
        for (index, (vertex, slot)) in mesh
            .vertices
            .iter()
            .zip(data.chunks_exact_mut(self.stride))
            .enumerate()
        {
            for attr in self.attributes {
                let dst = &mut slot[attr.offset..attr.offset + attr.components()];
                match attr.kind {
                    AttributeKind::Position => dst.copy_from_slice(&vertex.position),
                    AttributeKind::Normal => dst.copy_from_slice(&vertex.normal),
                    AttributeKind::Uv => dst.copy_from_slice(&vertex.uv),
                    AttributeKind::Color => {
                        let color = mesh
                            .colors
                            .as_ref()
                            .and_then(|colors| colors.get(index))
                            .copied()
                            .unwrap_or([1.0; 4]);
                        dst.copy_from_slice(&color);
                    }
                }
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;

    #[test]
    fn presets_are_valid() {
        assert_eq!(VertexLayout::LIT.validate(), Ok(()));
        assert_eq!(VertexLayout::LIT_COLORED.validate(), Ok(()));
        assert_eq!(VertexLayout::LIT.stride_bytes(), 32);
        assert_eq!(VertexLayout::LIT_COLORED.stride_bytes(), 48);
    }

    #[test]
    fn attribute_slots_are_fixed() {
        let layout = VertexLayout::LIT;
        assert_eq!(layout.attribute(AttributeKind::Position).unwrap().location, 0);
        assert_eq!(layout.attribute(AttributeKind::Normal).unwrap().location, 1);
        assert_eq!(layout.attribute(AttributeKind::Uv).unwrap().location, 2);
        assert_eq!(layout.attribute(AttributeKind::Uv).unwrap().offset_bytes(), 24);
        assert!(layout.attribute(AttributeKind::Color).is_none());
    }

    #[test]
    fn validate_rejects_overlap_and_overflow() {
        const ALIASED: VertexLayout = VertexLayout {
            stride: 5,
            attributes: &[
                VertexAttribute::new(AttributeKind::Position, 0, 0),
                VertexAttribute::new(AttributeKind::Normal, 1, 3),
                VertexAttribute::new(AttributeKind::Uv, 2, 3),
            ],
        };
        assert_eq!(
            ALIASED.validate(),
            Err(LayoutError::OutOfBounds { location: 1 })
        );

        const OVERLAPPING: VertexLayout = VertexLayout {
            stride: 8,
            attributes: &[
                VertexAttribute::new(AttributeKind::Position, 0, 0),
                VertexAttribute::new(AttributeKind::Uv, 1, 2),
            ],
        };
        assert_eq!(
            OVERLAPPING.validate(),
            Err(LayoutError::Overlap {
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn layout_errors_describe_the_location() {
        let err = LayoutError::Overlap {
            first: 0,
            second: 1,
        };
        assert_eq!(err.to_string(), "attributes at locations 0 and 1 overlap");
        assert!(LayoutError::OutOfBounds { location: 2 }
            .to_string()
            .contains("location 2"));
    }

    #[test]
    fn interleave_places_attributes_at_offsets() {
        let mut mesh = Mesh::with_vertices_indices(
            vec![
                Vertex {
                    position: [1.0, 2.0, 3.0],
                    normal: [0.0, 0.0, 1.0],
                    uv: [0.25, 0.75],
                },
                Vertex::new([4.0, 5.0, 6.0], [1.0, 0.0]),
            ],
            vec![],
        );
        let lit = VertexLayout::LIT.interleave(&mesh);
        assert_eq!(lit.len(), 16);
        assert_eq!(&lit[0..8], &[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.25, 0.75]);
        assert_eq!(&lit[8..11], &[4.0, 5.0, 6.0]);

        mesh.colors = Some(vec![[0.0, 0.0, 0.0, 1.0], [0.5, 0.5, 0.5, 1.0]]);
        let colored = VertexLayout::LIT_COLORED.interleave(&mesh);
        assert_eq!(colored.len(), 24);
        assert_eq!(&colored[8..12], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&colored[20..24], &[0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn missing_colors_default_to_white() {
        let mesh = Mesh::with_vertices_indices(vec![Vertex::default()], vec![]);
        let data = VertexLayout::LIT_COLORED.interleave(&mesh);
        assert_eq!(&data[8..12], &[1.0; 4]);
    }
}
