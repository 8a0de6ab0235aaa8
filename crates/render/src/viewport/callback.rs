use std::sync::{Arc, Mutex};
use std::time::Instant;

use egui::epaint::Rect;
use egui_wgpu::wgpu;
use egui_wgpu::{CallbackResources, CallbackTrait};

use super::pipeline::{
    apply_scene_to_pipeline, ensure_offscreen_targets, FrameUniforms, PipelineState,
};
use super::{FrameParams, ViewportSceneState, ViewportStatsState};

pub(super) struct ViewportCallback {
    pub(super) target_format: wgpu::TextureFormat,
    pub(super) rect: Rect,
    pub(super) params: FrameParams,
    pub(super) stats: Arc<Mutex<ViewportStatsState>>,
    pub(super) scene: Arc<Mutex<ViewportSceneState>>,
    pub(super) failure: Arc<Mutex<Option<String>>>,
}

impl ViewportCallback {
    fn failed(&self) -> bool {
        self.failure
            .lock()
            .map(|failure| failure.is_some())
            .unwrap_or(true)
    }

    fn record_failure(&self, message: String) {
        tracing::error!("viewport disabled: {message}");
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message);
        }
    }
}

impl CallbackTrait for ViewportCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if self.failed() {
            return Vec::new();
        }

        if callback_resources.get::<PipelineState>().is_none() {
            match PipelineState::new(device, queue, self.target_format) {
                Ok(pipeline) => {
                    callback_resources.insert(pipeline);
                }
                Err(err) => {
                    self.record_failure(err);
                    return Vec::new();
                }
            }
        }

        let Some(pipeline) = callback_resources.get_mut::<PipelineState>() else {
            return Vec::new();
        };

        let width = (self.rect.width() * screen_descriptor.pixels_per_point)
            .round()
            .max(1.0) as u32;
        let height = (self.rect.height() * screen_descriptor.pixels_per_point)
            .round()
            .max(1.0) as u32;
        ensure_offscreen_targets(device, pipeline, width, height);

        if let Ok(scene_state) = self.scene.lock() {
            if scene_state.version != pipeline.scene_version {
                match &scene_state.scene {
                    Some(scene) => {
                        if let Err(err) = apply_scene_to_pipeline(device, queue, pipeline, scene) {
                            self.record_failure(err);
                            return Vec::new();
                        }
                    }
                    None => {
                        pipeline.objects.clear();
                        pipeline.vertex_count = 0;
                        pipeline.triangle_count = 0;
                    }
                }
                pipeline.scene_version = scene_state.version;
            }
        }

        let aspect = width as f32 / height as f32;
        let uniforms = FrameUniforms::from_params(&self.params, aspect);
        queue.write_buffer(&pipeline.frame_buffer, 0, bytemuck::bytes_of(&uniforms));

        if let Ok(mut stats_state) = self.stats.lock() {
            stats_state.record_frame(Instant::now());
            stats_state.stats.vertex_count = pipeline.vertex_count;
            stats_state.stats.triangle_count = pipeline.triangle_count;
            stats_state.stats.object_count = pipeline.objects.len() as u32;
            stats_state.stats.texture_count = pipeline.textures.len() as u32;
            stats_state.stats.draw_calls = pipeline.objects.len() as u32;
        }

        let mut render_pass = egui_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("still_life_offscreen"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &pipeline.offscreen_view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &pipeline.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        render_pass.set_bind_group(0, &pipeline.frame_bind_group, &[]);
        for object in &pipeline.objects {
            let Some((_, scene_pipeline)) = pipeline.scene_pipelines.get(object.pipeline_index)
            else {
                continue;
            };
            render_pass.set_pipeline(scene_pipeline);
            render_pass.set_bind_group(1, &object.bind_group, &[]);
            render_pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                object.mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            render_pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
        }

        Vec::new()
    }

    fn paint(
        &self,
        info: egui::epaint::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &CallbackResources,
    ) {
        let viewport = info.viewport_in_pixels();
        if viewport.width_px <= 0 || viewport.height_px <= 0 {
            return;
        }

        let clip = info.clip_rect_in_pixels();
        if clip.width_px <= 0 || clip.height_px <= 0 {
            return;
        }

        let Some(pipeline) = callback_resources.get::<PipelineState>() else {
            return;
        };

        render_pass.set_viewport(
            viewport.left_px as f32,
            viewport.top_px as f32,
            viewport.width_px as f32,
            viewport.height_px as f32,
            0.0,
            1.0,
        );
        render_pass.set_scissor_rect(
            clip.left_px.max(0) as u32,
            clip.top_px.max(0) as u32,
            clip.width_px.max(0) as u32,
            clip.height_px.max(0) as u32,
        );
        render_pass.set_pipeline(&pipeline.blit_pipeline);
        render_pass.set_bind_group(0, &pipeline.blit_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}
