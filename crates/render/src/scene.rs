use glam::Mat4;

const FLOAT_BYTES: u64 = std::mem::size_of::<f32>() as u64;

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderAttribute {
    pub location: u32,
    pub offset_bytes: u64,
    pub components: u32,
}

#[derive(Debug, Clone)]
pub struct RenderMesh {
    pub vertex_data: Vec<f32>,
    pub stride_bytes: u64,
    pub attributes: Vec<RenderAttribute>,
    pub indices: Vec<u16>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        if self.stride_bytes == 0 {
            return 0;
        }
        (self.vertex_data.len() as u64 * FLOAT_BYTES / self.stride_bytes) as usize
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    MirroredRepeat,
    ClampToEdge,
}

/// RGBA8 image with its full mip chain, level 0 first.
#[derive(Debug, Clone)]
pub struct RenderTexture {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub mips: Vec<Vec<u8>>,
    pub wrap: TextureWrap,
}

#[derive(Debug, Clone)]
pub struct RenderObject {
    pub label: String,
    pub mesh: RenderMesh,
    /// Index into [`RenderScene::textures`].
    pub texture: usize,
    pub model: Mat4,
    pub base_color: [f32; 3],
}

/// Everything uploaded to the GPU once per scene version. A `None` texture
/// slot is drawn with a black placeholder.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    pub objects: Vec<RenderObject>,
    pub textures: Vec<Option<RenderTexture>>,
}

impl RenderScene {
    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_stride() {
        let mesh = RenderMesh {
            vertex_data: vec![0.0; 24],
            stride_bytes: 32,
            attributes: vec![RenderAttribute {
                location: 0,
                offset_bytes: 0,
                components: 3,
            }],
            indices: vec![0, 1, 2],
        };
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);

        let scene = RenderScene {
            objects: vec![RenderObject {
                label: "tri".to_string(),
                mesh,
                texture: 0,
                model: Mat4::IDENTITY,
                base_color: [1.0; 3],
            }],
            textures: vec![None],
        };
        assert_eq!(scene.vertex_count(), 3);
        assert_eq!(scene.triangle_count(), 1);
    }
}
