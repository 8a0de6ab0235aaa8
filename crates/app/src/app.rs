use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eframe::egui;
use render::{FlyCamera, RenderScene, RenderTexture, ViewportRenderer};
use still_life_core::{build_scene, LightRole, ViewerSettings};
use tracing_subscriber::filter::LevelFilter;

use crate::console::{ConsoleBuffer, LogLevel};
use crate::input;

mod convert;

pub(crate) use convert::load_textures;
use convert::{
    camera_from_settings, frame_params, render_textures, scene_to_render, store_camera,
};

pub(crate) struct StillLifeApp {
    settings: ViewerSettings,
    settings_path: PathBuf,
    camera: FlyCamera,
    console: ConsoleBuffer,
    log_level: LogLevel,
    viewport_renderer: Option<ViewportRenderer>,
    textures: Vec<Option<RenderTexture>>,
    pending_scene: Option<RenderScene>,
    segments_edit: u32,
    failed: Arc<AtomicBool>,
}

impl StillLifeApp {
    /// Decodes the textures once and builds the initial scene. Invalid mesh
    /// parameters fail startup.
    pub(crate) fn new(
        settings: ViewerSettings,
        settings_path: PathBuf,
        console: ConsoleBuffer,
        log_level: LogLevel,
        failed: Arc<AtomicBool>,
    ) -> Result<Self, String> {
        let textures = render_textures(&load_textures(&settings.scene.texture_dir));
        let scene = build_scene(&settings.scene).map_err(|err| format!("scene: {err}"))?;
        let pending_scene = Some(scene_to_render(&scene, &textures));
        Ok(Self {
            camera: camera_from_settings(&settings.camera),
            segments_edit: settings.scene.cylinder_segments,
            settings,
            settings_path,
            console,
            log_level,
            viewport_renderer: None,
            textures,
            pending_scene,
            failed,
        })
    }

    fn rebuild_scene(&mut self) {
        let mut scene_settings = self.settings.scene.clone();
        scene_settings.cylinder_segments = self.segments_edit;
        match build_scene(&scene_settings) {
            Ok(scene) => {
                self.settings.scene = scene_settings;
                self.pending_scene = Some(scene_to_render(&scene, &self.textures));
            }
            Err(err) => {
                tracing::error!("scene rebuild rejected: {}", err);
                self.segments_edit = self.settings.scene.cylinder_segments;
            }
        }
    }

    fn save_settings(&mut self) {
        store_camera(&self.camera, &mut self.settings.camera);
        match self.settings.save(&self.settings_path) {
            Ok(()) => tracing::info!("settings saved to {}", self.settings_path.display()),
            Err(err) => tracing::error!("failed to save settings: {}", err),
        }
    }

    fn reset_camera(&mut self) {
        self.camera = camera_from_settings(&ViewerSettings::default().camera);
        tracing::debug!("camera reset");
    }

    fn set_log_level(&mut self, new_level: LevelFilter) {
        if new_level != self.log_level.get() {
            self.log_level.set(new_level);
        }
    }

    fn sync_wgpu_renderer(&mut self, frame: &eframe::Frame) {
        let Some(render_state) = frame.wgpu_render_state() else {
            return;
        };

        if self.viewport_renderer.is_none() {
            self.viewport_renderer = Some(ViewportRenderer::new(render_state.target_format));
        }

        if let (Some(renderer), Some(scene)) = (&self.viewport_renderer, self.pending_scene.take())
        {
            renderer.set_scene(scene);
        }
    }

    /// A pipeline or upload failure is unrecoverable: log once and close.
    fn check_renderer_failure(&self, ctx: &egui::Context) {
        let Some(message) = self.viewport_renderer.as_ref().and_then(|r| r.failure()) else {
            return;
        };
        if !self.failed.swap(true, Ordering::SeqCst) {
            tracing::error!("renderer failed, closing: {}", message);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save settings").clicked() {
                        self.save_settings();
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close();
                    }
                });

                ui.separator();
                ui.label("still life");
                ui.separator();
                let panels = &mut self.settings.panels;
                ui.checkbox(&mut panels.show_controls, "Controls");
                ui.checkbox(&mut panels.show_console, "Console");
                ui.checkbox(&mut panels.show_stats, "Stats");
            });
        });
    }

    fn view_section(&mut self, ui: &mut egui::Ui) {
        let projection = &mut self.settings.projection;
        if ui
            .button(format!("Projection: {} (P)", projection.label()))
            .clicked()
        {
            *projection = projection.toggled();
        }

        ui.horizontal(|ui| {
            ui.label("UV scale");
            for value in &mut self.settings.uv_scale {
                ui.add(egui::DragValue::new(value).speed(0.05).range(0.01..=64.0));
            }
        });
        ui.add(egui::Slider::new(&mut self.camera.speed, 0.1..=20.0).text("Move speed"));
        ui.add(egui::Slider::new(&mut self.camera.sensitivity, 0.01..=1.0).text("Look speed"));
        ui.label(format!(
            "Camera ({:.2}, {:.2}, {:.2})  yaw {:.1}  pitch {:.1}  fov {:.1}",
            self.camera.position.x,
            self.camera.position.y,
            self.camera.position.z,
            self.camera.yaw,
            self.camera.pitch,
            self.camera.zoom
        ));
        if ui.button("Reset camera").clicked() {
            self.reset_camera();
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Cylinder segments");
            ui.add(egui::DragValue::new(&mut self.segments_edit).range(3..=2000));
        });
        if self.segments_edit != self.settings.scene.cylinder_segments
            && ui.button("Rebuild meshes").clicked()
        {
            self.rebuild_scene();
        }
    }

    fn lighting_section(&mut self, ui: &mut egui::Ui) {
        for (role, label) in [
            (LightRole::Ambient, "Ambient"),
            (LightRole::Diffuse, "Diffuse"),
            (LightRole::Specular, "Specular"),
        ] {
            let light = self.settings.lights.get_mut(role);
            ui.horizontal(|ui| {
                ui.label(label);
                ui.color_edit_button_rgb(&mut light.color);
                for axis in &mut light.position {
                    ui.add(egui::DragValue::new(axis).speed(0.05));
                }
            });
        }
    }

    fn shading_section(&mut self, ui: &mut egui::Ui) {
        let phong = &mut self.settings.phong;
        ui.add(egui::Slider::new(&mut phong.ambient_strength, 0.0..=1.0).text("Ambient"));
        ui.add(egui::Slider::new(&mut phong.diffuse_bias, 0.0..=1.0).text("Diffuse bias"));
        ui.add(egui::Slider::new(&mut phong.diffuse_weight, 0.0..=4.0).text("Diffuse weight"));
        ui.add(
            egui::Slider::new(&mut phong.specular_intensity, 0.0..=2.0).text("Specular"),
        );
        ui.add(
            egui::Slider::new(&mut phong.highlight_size, 1.0..=128.0)
                .logarithmic(true)
                .text("Highlight size"),
        );
        if ui.button("Restore defaults").clicked() {
            *phong = Default::default();
        }
    }

    fn debug_section(&mut self, ui: &mut egui::Ui) {
        let current = self.log_level.get();
        egui::ComboBox::from_label("Log level")
            .selected_text(format!("{:?}", current))
            .show_ui(ui, |ui| {
                for level in [
                    LevelFilter::ERROR,
                    LevelFilter::WARN,
                    LevelFilter::INFO,
                    LevelFilter::DEBUG,
                    LevelFilter::TRACE,
                ] {
                    if ui
                        .selectable_label(current == level, format!("{:?}", level))
                        .clicked()
                    {
                        self.set_log_level(level);
                    }
                }
            });
        if ui.button("Save settings").clicked() {
            self.save_settings();
        }
        ui.label(format!("Settings: {}", self.settings_path.display()));
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        let panels = self.settings.panels;
        if !panels.show_controls && !panels.show_console {
            return;
        }

        egui::SidePanel::right("side_panels")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                if panels.show_controls {
                    egui::CollapsingHeader::new("View")
                        .default_open(true)
                        .show(ui, |ui| self.view_section(ui));
                    egui::CollapsingHeader::new("Lighting")
                        .default_open(true)
                        .show(ui, |ui| self.lighting_section(ui));
                    egui::CollapsingHeader::new("Shading")
                        .default_open(false)
                        .show(ui, |ui| self.shading_section(ui));
                    egui::CollapsingHeader::new("Debug")
                        .default_open(false)
                        .show(ui, |ui| self.debug_section(ui));
                }

                if panels.show_console {
                    egui::CollapsingHeader::new("Console")
                        .default_open(true)
                        .show(ui, |ui| {
                            egui::ScrollArea::vertical()
                                .stick_to_bottom(true)
                                .show(ui, |ui| {
                                    for line in self.console.snapshot() {
                                        ui.label(line);
                                    }
                                });
                        });
                }
            });
    }

    fn viewport(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());
        input::handle_viewport_input(&response, &mut self.camera);

        let Some(renderer) = &self.viewport_renderer else {
            ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "WGPU not ready",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
            return;
        };

        let callback = renderer.paint_callback(rect, frame_params(&self.settings, self.camera));
        ui.painter().add(egui::Shape::Callback(callback));

        if self.settings.panels.show_stats {
            let stats = renderer.stats_snapshot();
            let text = format!(
                "FPS: {:.1}\nFrame: {:.2} ms\nVerts: {}\nTris: {}\nObjects: {}\nTextures: {}\nDraws: {}\n{}",
                stats.fps,
                stats.frame_time_ms,
                stats.vertex_count,
                stats.triangle_count,
                stats.object_count,
                stats.texture_count,
                stats.draw_calls,
                self.settings.projection.label()
            );
            let font_id = egui::FontId::monospace(12.0);
            let galley =
                ui.fonts_mut(|f| f.layout_no_wrap(text, font_id, egui::Color32::WHITE));
            let padding = egui::vec2(6.0, 4.0);
            let bg_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(8.0, 8.0),
                galley.size() + padding * 2.0,
            );
            let painter = ui.painter();
            painter.rect_filled(bg_rect, 4.0, egui::Color32::from_black_alpha(160));
            painter.galley(bg_rect.min + padding, galley, egui::Color32::WHITE);
        }
    }
}

impl eframe::App for StillLifeApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.sync_wgpu_renderer(frame);
        self.check_renderer_failure(ctx);

        let actions = input::handle_keyboard(ctx, &mut self.camera);
        if actions.toggle_projection {
            self.settings.projection = self.settings.projection.toggled();
            tracing::info!("projection: {}", self.settings.projection.label());
        }
        if actions.quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        self.top_bar(ctx);
        self.side_panel(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.viewport(ui));

        ctx.request_repaint();
    }
}
