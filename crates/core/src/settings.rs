use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shading::{Lights, PhongModel};

pub const SETTINGS_FILE: &str = "still_life.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub window_size: [f32; 2],
    pub camera: CameraSettings,
    pub projection: ProjectionMode,
    pub uv_scale: [f32; 2],
    pub lights: Lights,
    pub phong: PhongModel,
    pub scene: SceneSettings,
    pub panels: PanelSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_size: [800.0, 600.0],
            camera: CameraSettings::default(),
            projection: ProjectionMode::Perspective,
            uv_scale: [5.0, 5.0],
            lights: Lights::default(),
            phong: PhongModel::default(),
            scene: SceneSettings::default(),
            panels: PanelSettings::default(),
        }
    }
}

impl ViewerSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing files are not an error; anything else unreadable is logged
    /// and replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                tracing::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        std::fs::write(path, text).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectionMode::Perspective => "Perspective",
            ProjectionMode::Orthographic => "Orthographic",
        }
    }
}

/// Starting pose and motion tuning of the fly camera. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            speed: 2.5,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub cylinder_segments: u32,
    pub texture_dir: PathBuf,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            cylinder_segments: 100,
            texture_dir: PathBuf::from("textures"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub show_controls: bool,
    pub show_console: bool,
    pub show_stats: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            show_controls: true,
            show_console: true,
            show_stats: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_view() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.camera.position, [0.0, 0.0, 3.0]);
        assert_eq!(settings.camera.yaw, -90.0);
        assert_eq!(settings.projection, ProjectionMode::Perspective);
        assert_eq!(settings.uv_scale, [5.0, 5.0]);
        assert_eq!(settings.scene.cylinder_segments, 100);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ViewerSettings =
            serde_json::from_str(r#"{"projection":"orthographic","camera":{"zoom":30.0}}"#)
                .unwrap();
        assert_eq!(settings.projection, ProjectionMode::Orthographic);
        assert_eq!(settings.camera.zoom, 30.0);
        assert_eq!(settings.camera.speed, 2.5);
        assert_eq!(settings.phong, PhongModel::default());
    }

    #[test]
    fn json_round_trip() {
        let mut settings = ViewerSettings::default();
        settings.lights.diffuse.color = [0.1, 0.2, 0.3];
        settings.scene.texture_dir = PathBuf::from("assets/tex");
        let text = serde_json::to_string(&settings).unwrap();
        let back: ViewerSettings = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "still_life_settings_{}.json",
            std::process::id()
        ));
        let mut settings = ViewerSettings::default();
        settings.phong.diffuse_weight = 1.0;
        settings.save(&path).unwrap();
        let loaded = ViewerSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "still_life_broken_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ViewerSettings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
        assert_eq!(ViewerSettings::load_or_default(&path), ViewerSettings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn projection_toggles() {
        assert_eq!(
            ProjectionMode::Perspective.toggled(),
            ProjectionMode::Orthographic
        );
        assert_eq!(
            ProjectionMode::Orthographic.toggled(),
            ProjectionMode::Perspective
        );
    }
}
