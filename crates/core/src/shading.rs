//! CPU reference of the fragment shader's three-light Phong model.
//!
//! The GPU shader reads the same [`PhongModel`] and [`Light`] values from its
//! uniforms, so this module is what the viewport is expected to produce.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRole {
    Ambient,
    Diffuse,
    Specular,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Exactly one light per role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lights {
    pub ambient: Light,
    pub diffuse: Light,
    pub specular: Light,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: Light {
                position: [0.0, 0.0, 4.0],
                color: [1.0, 0.9, 0.9],
            },
            diffuse: Light {
                position: [2.0, 1.0, -4.0],
                color: [0.7, 0.0, 0.0],
            },
            specular: Light {
                position: [-2.0, 0.0, -5.0],
                color: [1.0, 1.0, 1.0],
            },
        }
    }
}

impl Lights {
    pub fn get(&self, role: LightRole) -> &Light {
        match role {
            LightRole::Ambient => &self.ambient,
            LightRole::Diffuse => &self.diffuse,
            LightRole::Specular => &self.specular,
        }
    }

    pub fn get_mut(&mut self, role: LightRole) -> &mut Light {
        match role {
            LightRole::Ambient => &mut self.ambient,
            LightRole::Diffuse => &mut self.diffuse,
            LightRole::Specular => &mut self.specular,
        }
    }

    /// Lights in uniform order: ambient, diffuse, specular.
    pub fn ordered(&self) -> [&Light; 3] {
        [&self.ambient, &self.diffuse, &self.specular]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhongModel {
    pub ambient_strength: f32,
    /// Flat offset added to every diffuse channel.
    pub diffuse_bias: f32,
    /// How many times the diffuse term enters the sum.
    pub diffuse_weight: f32,
    pub specular_intensity: f32,
    pub highlight_size: f32,
}

impl Default for PhongModel {
    fn default() -> Self {
        Self {
            ambient_strength: 0.30,
            diffuse_bias: 0.35,
            diffuse_weight: 2.0,
            specular_intensity: 0.6,
            highlight_size: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

pub fn sample_uv(uv: Vec2, uv_scale: Vec2) -> Vec2 {
    uv * uv_scale
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

impl PhongModel {
    pub fn ambient(&self, lights: &Lights) -> Vec3 {
        self.ambient_strength * Vec3::from(lights.ambient.color)
    }

    pub fn diffuse(&self, fragment: &Fragment, lights: &Lights) -> Vec3 {
        let norm = fragment.normal.normalize_or_zero();
        let to_light = (Vec3::from(lights.diffuse.position) - fragment.position).normalize_or_zero();
        let impact = norm.dot(to_light).max(0.0);
        impact * Vec3::from(lights.diffuse.color) + Vec3::splat(self.diffuse_bias)
    }

    pub fn specular(&self, fragment: &Fragment, lights: &Lights, view_pos: Vec3) -> Vec3 {
        let norm = fragment.normal.normalize_or_zero();
        let to_light =
            (Vec3::from(lights.specular.position) - fragment.position).normalize_or_zero();
        let view_dir = (view_pos - fragment.position).normalize_or_zero();
        let reflect_dir = reflect(-to_light, norm);
        let component = view_dir.dot(reflect_dir).max(0.0).powf(self.highlight_size);
        self.specular_intensity * component * Vec3::from(lights.specular.color)
    }

    /// Lit color of one fragment; `texel` is the texture sample at the scaled
    /// uv and `base_color` the per-object tint.
    pub fn shade(
        &self,
        fragment: &Fragment,
        lights: &Lights,
        view_pos: Vec3,
        texel: Vec4,
        base_color: Vec3,
    ) -> Vec4 {
        let light = self.ambient(lights)
            + self.diffuse_weight * self.diffuse(fragment, lights)
            + self.specular(fragment, lights, view_pos);
        (light * texel.truncate() * base_color).extend(1.0)
    }

    /// Largest value any output channel can reach with a white texel.
    pub fn channel_upper_bound(&self, lights: &Lights) -> f32 {
        let max = |c: [f32; 3]| c.iter().copied().fold(0.0f32, f32::max);
        self.ambient_strength * max(lights.ambient.color)
            + self.diffuse_weight * (max(lights.diffuse.color) + self.diffuse_bias)
            + self.specular_intensity * max(lights.specular.color)
    }
}
