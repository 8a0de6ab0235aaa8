use glam::{Mat4, Vec3};

use crate::mesh::{Mesh, MeshError};
use crate::primitives::{
    make_cylinder, make_sphere, make_table_plane, make_torus, CylinderSpec, SphereSpec, TorusSpec,
};
use crate::settings::SceneSettings;
use crate::texture::WrapMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObject {
    Bowl,
    BowlBase,
    Ramekin,
    VaseMouth,
    VaseStem,
    VaseBase,
    Table,
    RamekinLip,
}

impl SceneObject {
    pub const ALL: [SceneObject; 8] = [
        SceneObject::Bowl,
        SceneObject::BowlBase,
        SceneObject::Ramekin,
        SceneObject::VaseMouth,
        SceneObject::VaseStem,
        SceneObject::VaseBase,
        SceneObject::Table,
        SceneObject::RamekinLip,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SceneObject::Bowl => "bowl",
            SceneObject::BowlBase => "bowl base",
            SceneObject::Ramekin => "ramekin",
            SceneObject::VaseMouth => "vase mouth",
            SceneObject::VaseStem => "vase stem",
            SceneObject::VaseBase => "vase base",
            SceneObject::Table => "table",
            SceneObject::RamekinLip => "ramekin lip",
        }
    }

    pub fn texture(self) -> TextureSlot {
        match self {
            SceneObject::Bowl | SceneObject::BowlBase => TextureSlot::Mortar,
            SceneObject::Ramekin => TextureSlot::Porcelain,
            SceneObject::VaseMouth | SceneObject::VaseStem | SceneObject::VaseBase => {
                TextureSlot::Glass
            }
            SceneObject::Table => TextureSlot::Wood,
            SceneObject::RamekinLip => TextureSlot::WoodClamped,
        }
    }
}

/// The five texture bindings. Wood appears twice with different addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Mortar,
    Wood,
    Glass,
    Porcelain,
    WoodClamped,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::Mortar,
        TextureSlot::Wood,
        TextureSlot::Glass,
        TextureSlot::Porcelain,
        TextureSlot::WoodClamped,
    ];

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Mortar => 0,
            TextureSlot::Wood => 1,
            TextureSlot::Glass => 2,
            TextureSlot::Porcelain => 3,
            TextureSlot::WoodClamped => 4,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Mortar => "mortar.jpg",
            TextureSlot::Wood | TextureSlot::WoodClamped => "wood.jpg",
            TextureSlot::Glass => "glass.jpg",
            TextureSlot::Porcelain => "porcelain.jpg",
        }
    }

    pub fn wrap(self) -> WrapMode {
        match self {
            TextureSlot::WoodClamped => WrapMode::ClampToEdge,
            _ => WrapMode::MirroredRepeat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneInstance {
    pub object: SceneObject,
    pub mesh: Mesh,
    pub texture: TextureSlot,
    pub model: Mat4,
}

#[derive(Debug, Clone, Default)]
pub struct StillLifeScene {
    pub instances: Vec<SceneInstance>,
}

impl StillLifeScene {
    pub fn total_vertices(&self) -> usize {
        self.instances.iter().map(|i| i.mesh.vertex_count()).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.instances.iter().map(|i| i.mesh.triangle_count()).sum()
    }

    pub fn get(&self, object: SceneObject) -> Option<&SceneInstance> {
        self.instances.iter().find(|i| i.object == object)
    }
}

/// Model matrix shared by every object: tilt the table toward the viewer and
/// push the whole arrangement back into the frustum.
pub fn scene_transform() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.40, 0.20, -2.0))
        * Mat4::from_axis_angle(Vec3::NEG_X, 1.1)
        * Mat4::from_scale(Vec3::splat(0.5))
}

pub fn build_scene(settings: &SceneSettings) -> Result<StillLifeScene, MeshError> {
    let segments = settings.cylinder_segments;
    let cylinder = |center: [f32; 3], radius: f32, length: f32| {
        make_cylinder(&CylinderSpec {
            center,
            radius,
            segments,
            length,
        })
    };

    let model = scene_transform();
    let mut instances = Vec::with_capacity(SceneObject::ALL.len());
    for object in SceneObject::ALL {
        let mesh = match object {
            SceneObject::Bowl => cylinder([-2.0, -2.0, 0.5], 1.5, 1.5)?,
            SceneObject::BowlBase => cylinder([-2.0, -2.0, 0.0], 1.0, 1.5)?,
            SceneObject::Ramekin => cylinder([-0.5, -3.4, 0.0], 0.5, 0.5)?,
            SceneObject::VaseMouth => make_torus(&TorusSpec {
                major_radius: 0.5,
                minor_radius: 0.1,
                major_segments: 16,
                minor_segments: 16,
                center: [0.75, -1.9, 3.2],
            })?,
            SceneObject::VaseStem => cylinder([0.75, -1.9, 2.0], 0.45, 1.2)?,
            SceneObject::VaseBase => make_sphere(&SphereSpec {
                center: [0.75, -1.9, 1.2],
                radius: 1.2,
                sectors: 100,
                stacks: 20,
            })?,
            SceneObject::Table => make_table_plane(),
            // Sits just above the ramekin's top cap to avoid z-fighting.
            SceneObject::RamekinLip => cylinder([-0.5, -3.4, 0.501], 0.41, 0.0)?,
        };
        mesh.validate()?;
        instances.push(SceneInstance {
            object,
            mesh,
            texture: object.texture(),
            model,
        });
    }

    let scene = StillLifeScene { instances };
    tracing::info!(
        instances = scene.instances.len(),
        vertices = scene.total_vertices(),
        triangles = scene.total_triangles(),
        "scene assembled"
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_scene() -> StillLifeScene {
        build_scene(&SceneSettings::default()).expect("scene")
    }

    #[test]
    fn eight_instances_in_draw_order() {
        let scene = default_scene();
        let order: Vec<SceneObject> = scene.instances.iter().map(|i| i.object).collect();
        assert_eq!(order, SceneObject::ALL.to_vec());
    }

    #[test]
    fn texture_mapping_is_fixed() {
        let scene = default_scene();
        let slot = |o| scene.get(o).unwrap().texture;
        assert_eq!(slot(SceneObject::Bowl), TextureSlot::Mortar);
        assert_eq!(slot(SceneObject::BowlBase), TextureSlot::Mortar);
        assert_eq!(slot(SceneObject::Ramekin), TextureSlot::Porcelain);
        assert_eq!(slot(SceneObject::VaseMouth), TextureSlot::Glass);
        assert_eq!(slot(SceneObject::VaseBase), TextureSlot::Glass);
        assert_eq!(slot(SceneObject::Table), TextureSlot::Wood);
        assert_eq!(slot(SceneObject::RamekinLip), TextureSlot::WoodClamped);
    }

    #[test]
    fn texture_slots_share_wood_file() {
        assert_eq!(TextureSlot::Wood.file_name(), TextureSlot::WoodClamped.file_name());
        assert_eq!(TextureSlot::WoodClamped.wrap(), WrapMode::ClampToEdge);
        for slot in &TextureSlot::ALL[..4] {
            assert_eq!(slot.wrap(), WrapMode::MirroredRepeat);
        }
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn every_instance_shares_the_scene_transform() {
        let scene = default_scene();
        let expected = scene_transform();
        for instance in &scene.instances {
            assert_eq!(instance.model, expected);
        }
        let origin = expected.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.40, 0.20, -2.0)).length() < 1e-6);
    }

    #[test]
    fn meshes_validate_and_fit_u16() {
        let scene = default_scene();
        for instance in &scene.instances {
            assert_eq!(instance.mesh.validate(), Ok(()), "{}", instance.object.label());
            assert!(instance.mesh.triangle_count() > 0);
        }
        assert!(scene.get(SceneObject::Table).unwrap().mesh.colors.is_some());
    }

    #[test]
    fn segment_count_drives_cylinders() {
        let settings = SceneSettings {
            cylinder_segments: 12,
            ..SceneSettings::default()
        };
        let scene = build_scene(&settings).unwrap();
        let bowl = scene.get(SceneObject::Bowl).unwrap();
        assert_eq!(bowl.mesh.vertex_count(), 2 * 13);
        assert_eq!(bowl.mesh.index_count(), 12 * 12 - 12);
    }

    #[test]
    fn too_few_segments_is_rejected() {
        let settings = SceneSettings {
            cylinder_segments: 2,
            ..SceneSettings::default()
        };
        assert!(matches!(
            build_scene(&settings),
            Err(MeshError::TooFewSegments { .. })
        ));
    }
}
