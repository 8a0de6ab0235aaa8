use std::sync::{Arc, Mutex};
use std::time::Instant;

use egui::epaint::{PaintCallback, Rect};
use egui_wgpu::Callback;

use crate::camera::{FlyCamera, ViewportProjection};
use crate::scene::RenderScene;

mod callback;
mod mesh;
mod pipeline;
mod texture;

use callback::ViewportCallback;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    pub ambient_strength: f32,
    pub diffuse_bias: f32,
    pub diffuse_weight: f32,
    pub specular_intensity: f32,
    pub highlight_size: f32,
}

/// Per-frame inputs to the viewport: camera, projection, the ambient,
/// diffuse and specular lights (in that order) and shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub camera: FlyCamera,
    pub projection: ViewportProjection,
    pub lights: [LightParams; 3],
    pub uv_scale: [f32; 2],
    pub phong: PhongParams,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            camera: FlyCamera::default(),
            projection: ViewportProjection::Perspective,
            lights: [
                LightParams {
                    position: [0.0, 0.0, 4.0],
                    color: [1.0, 0.9, 0.9],
                },
                LightParams {
                    position: [2.0, 1.0, -4.0],
                    color: [0.7, 0.0, 0.0],
                },
                LightParams {
                    position: [-2.0, 0.0, -5.0],
                    color: [1.0, 1.0, 1.0],
                },
            ],
            uv_scale: [5.0, 5.0],
            phong: PhongParams {
                ambient_strength: 0.30,
                diffuse_bias: 0.35,
                diffuse_weight: 2.0,
                specular_intensity: 0.6,
                highlight_size: 6.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub object_count: u32,
    pub texture_count: u32,
    pub draw_calls: u32,
}

struct ViewportStatsState {
    last_frame: Option<Instant>,
    stats: ViewportStats,
}

impl ViewportStatsState {
    fn record_frame(&mut self, now: Instant) {
        if let Some(last) = self.last_frame {
            let dt = (now - last).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                let frame_ms = dt * 1000.0;
                let alpha = 0.1;
                if self.stats.fps == 0.0 {
                    self.stats.fps = fps;
                    self.stats.frame_time_ms = frame_ms;
                } else {
                    self.stats.fps += (fps - self.stats.fps) * alpha;
                    self.stats.frame_time_ms += (frame_ms - self.stats.frame_time_ms) * alpha;
                }
            }
        }
        self.last_frame = Some(now);
    }
}

struct ViewportSceneState {
    version: u64,
    scene: Option<RenderScene>,
}

pub struct ViewportRenderer {
    target_format: egui_wgpu::wgpu::TextureFormat,
    stats: Arc<Mutex<ViewportStatsState>>,
    scene: Arc<Mutex<ViewportSceneState>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl ViewportRenderer {
    pub fn new(target_format: egui_wgpu::wgpu::TextureFormat) -> Self {
        Self {
            target_format,
            stats: Arc::new(Mutex::new(ViewportStatsState {
                last_frame: None,
                stats: ViewportStats::default(),
            })),
            scene: Arc::new(Mutex::new(ViewportSceneState {
                version: 0,
                scene: None,
            })),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn paint_callback(&self, rect: Rect, params: FrameParams) -> PaintCallback {
        Callback::new_paint_callback(
            rect,
            ViewportCallback {
                target_format: self.target_format,
                rect,
                params,
                stats: self.stats.clone(),
                scene: self.scene.clone(),
                failure: self.failure.clone(),
            },
        )
    }

    pub fn stats_snapshot(&self) -> ViewportStats {
        self.stats
            .lock()
            .map(|state| state.stats)
            .unwrap_or_default()
    }

    /// Queues `scene` for upload on the next prepared frame.
    pub fn set_scene(&self, scene: RenderScene) {
        if let Ok(mut state) = self.scene.lock() {
            state.version = state.version.wrapping_add(1);
            state.scene = Some(scene);
        }
    }

    /// Set once the GPU rejected a shader or pipeline; nothing is drawn after.
    pub fn failure(&self) -> Option<String> {
        self.failure.lock().ok().and_then(|failure| failure.clone())
    }
}
