use std::path::Path;

use glam::Vec3;
use render::{
    FlyCamera, FrameParams, LightParams, PhongParams, RenderAttribute, RenderMesh, RenderObject,
    RenderScene, RenderTexture, TextureWrap, ViewportProjection,
};
use still_life_core::{
    CameraSettings, Mesh, ProjectionMode, StillLifeScene, TextureError, TextureImage,
    TextureSlot, ViewerSettings, WrapMode,
};

pub(crate) fn mesh_to_render(mesh: &Mesh) -> RenderMesh {
    let layout = mesh.layout();
    RenderMesh {
        vertex_data: layout.interleave(mesh),
        stride_bytes: layout.stride_bytes() as u64,
        attributes: layout
            .attributes
            .iter()
            .map(|attr| RenderAttribute {
                location: attr.location,
                offset_bytes: attr.offset_bytes() as u64,
                components: attr.components() as u32,
            })
            .collect(),
        indices: mesh.indices.clone(),
    }
}

pub(crate) fn texture_to_render(slot: TextureSlot, image: &TextureImage) -> RenderTexture {
    RenderTexture {
        label: format!("still_life_{slot:?}_texture").to_lowercase(),
        width: image.width,
        height: image.height,
        mips: image.mip_chain().into_iter().map(|level| level.rgba).collect(),
        wrap: match slot.wrap() {
            WrapMode::MirroredRepeat => TextureWrap::MirroredRepeat,
            WrapMode::ClampToEdge => TextureWrap::ClampToEdge,
        },
    }
}

/// Decodes every texture slot from `dir`, in slot order.
pub(crate) fn load_textures(dir: &Path) -> Vec<(TextureSlot, Result<TextureImage, TextureError>)> {
    TextureSlot::ALL
        .iter()
        .map(|&slot| (slot, TextureImage::load(&dir.join(slot.file_name()))))
        .collect()
}

/// Failed slots become `None` and are drawn with the renderer's black fallback.
pub(crate) fn render_textures(
    loaded: &[(TextureSlot, Result<TextureImage, TextureError>)],
) -> Vec<Option<RenderTexture>> {
    loaded
        .iter()
        .map(|(slot, result)| match result {
            Ok(image) => {
                tracing::info!(
                    "loaded {} for {slot:?}: {}x{} {:?}",
                    image.name,
                    image.width,
                    image.height,
                    image.format
                );
                Some(texture_to_render(*slot, image))
            }
            Err(err) => {
                tracing::warn!("{err}; {slot:?} will render black");
                None
            }
        })
        .collect()
}

pub(crate) fn scene_to_render(
    scene: &StillLifeScene,
    textures: &[Option<RenderTexture>],
) -> RenderScene {
    RenderScene {
        objects: scene
            .instances
            .iter()
            .map(|instance| RenderObject {
                label: instance.object.label().replace(' ', "_"),
                mesh: mesh_to_render(&instance.mesh),
                texture: instance.texture.index(),
                model: instance.model,
                base_color: [1.0, 1.0, 1.0],
            })
            .collect(),
        textures: textures.to_vec(),
    }
}

pub(crate) fn viewport_projection(mode: ProjectionMode) -> ViewportProjection {
    match mode {
        ProjectionMode::Perspective => ViewportProjection::Perspective,
        ProjectionMode::Orthographic => ViewportProjection::Orthographic,
    }
}

pub(crate) fn camera_from_settings(settings: &CameraSettings) -> FlyCamera {
    FlyCamera {
        position: Vec3::from(settings.position),
        yaw: settings.yaw,
        pitch: settings.pitch,
        zoom: settings.zoom,
        speed: settings.speed,
        sensitivity: settings.sensitivity,
    }
}

pub(crate) fn store_camera(camera: &FlyCamera, settings: &mut CameraSettings) {
    settings.position = camera.position.to_array();
    settings.yaw = camera.yaw;
    settings.pitch = camera.pitch;
    settings.zoom = camera.zoom;
    settings.speed = camera.speed;
    settings.sensitivity = camera.sensitivity;
}

pub(crate) fn frame_params(settings: &ViewerSettings, camera: FlyCamera) -> FrameParams {
    let light = |l: &still_life_core::Light| LightParams {
        position: l.position,
        color: l.color,
    };
    let [ambient, diffuse, specular] = settings.lights.ordered();
    let phong = &settings.phong;
    FrameParams {
        camera,
        projection: viewport_projection(settings.projection),
        lights: [light(ambient), light(diffuse), light(specular)],
        uv_scale: settings.uv_scale,
        phong: PhongParams {
            ambient_strength: phong.ambient_strength,
            diffuse_bias: phong.diffuse_bias,
            diffuse_weight: phong.diffuse_weight,
            specular_intensity: phong.specular_intensity,
            highlight_size: phong.highlight_size,
        },
    }
}
