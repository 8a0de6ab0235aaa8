mod layout;
mod mesh;
mod primitives;
mod scene;
mod settings;
mod shading;
mod texture;

pub use layout::{AttributeKind, LayoutError, VertexAttribute, VertexLayout};
pub use mesh::{Aabb, Mesh, MeshError, Vertex, MAX_VERTICES};
pub use primitives::{
    make_cylinder, make_sphere, make_table_plane, make_torus, CylinderSpec, SphereSpec, TorusSpec,
};
pub use scene::{
    build_scene, scene_transform, SceneInstance, SceneObject, StillLifeScene, TextureSlot,
};
pub use settings::{
    CameraSettings, PanelSettings, ProjectionMode, SceneSettings, SettingsError, ViewerSettings,
    SETTINGS_FILE,
};
pub use shading::{sample_uv, Fragment, Light, LightRole, Lights, PhongModel};
pub use texture::{mip_level_count, MipLevel, TexelFormat, TextureError, TextureImage, WrapMode};
