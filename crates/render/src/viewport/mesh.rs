use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;

use crate::scene::{RenderAttribute, RenderMesh};

/// Identifies the vertex layout a pipeline was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LayoutKey {
    pub(crate) stride_bytes: u64,
    pub(crate) attributes: Vec<RenderAttribute>,
}

impl LayoutKey {
    pub(crate) fn of(mesh: &RenderMesh) -> Self {
        Self {
            stride_bytes: mesh.stride_bytes,
            attributes: mesh.attributes.clone(),
        }
    }

    pub(crate) fn wgpu_attributes(&self) -> Result<Vec<wgpu::VertexAttribute>, String> {
        self.attributes
            .iter()
            .map(|attr| {
                let format = vertex_format(attr.components).ok_or_else(|| {
                    format!(
                        "attribute at location {} has unsupported width {}",
                        attr.location, attr.components
                    )
                })?;
                if attr.offset_bytes + format.size() > self.stride_bytes {
                    return Err(format!(
                        "attribute at location {} overruns the {}-byte stride",
                        attr.location, self.stride_bytes
                    ));
                }
                Ok(wgpu::VertexAttribute {
                    format,
                    offset: attr.offset_bytes,
                    shader_location: attr.location,
                })
            })
            .collect()
    }
}

pub(crate) fn vertex_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) layout: LayoutKey,
}

pub(crate) fn upload_mesh(device: &wgpu::Device, label: &str, mesh: &RenderMesh) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("still_life_{label}_vertices")),
        contents: bytemuck::cast_slice(&mesh.vertex_data),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("still_life_{label}_indices")),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
        layout: LayoutKey::of(mesh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(location: u32, offset_bytes: u64, components: u32) -> RenderAttribute {
        RenderAttribute {
            location,
            offset_bytes,
            components,
        }
    }

    #[test]
    fn lit_layout_converts() {
        let key = LayoutKey {
            stride_bytes: 32,
            attributes: vec![attr(0, 0, 3), attr(1, 12, 3), attr(2, 24, 2)],
        };
        let attrs = key.wgpu_attributes().unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[2].offset, 24);
        assert_eq!(attrs[2].shader_location, 2);
    }

    #[test]
    fn overrunning_attribute_is_rejected() {
        let key = LayoutKey {
            stride_bytes: 20,
            attributes: vec![attr(0, 0, 3), attr(1, 12, 3)],
        };
        assert!(key.wgpu_attributes().is_err());
    }

    #[test]
    fn unsupported_width_is_rejected() {
        assert!(vertex_format(5).is_none());
        let key = LayoutKey {
            stride_bytes: 64,
            attributes: vec![attr(0, 0, 5)],
        };
        assert!(key.wgpu_attributes().is_err());
    }
}
