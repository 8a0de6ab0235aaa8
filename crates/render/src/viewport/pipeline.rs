use std::borrow::Cow;

use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;

use crate::scene::RenderScene;

use super::mesh::{upload_mesh, GpuMesh, LayoutKey};
use super::texture::{fallback_texture, upload_texture, GpuTexture};
use super::FrameParams;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

pub(crate) const SCENE_SHADER: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_positions: array<vec4<f32>, 3>,
    light_colors: array<vec4<f32>, 3>,
    uv_scale: vec4<f32>,
    // ambient strength, diffuse bias, diffuse weight, specular intensity
    phong: vec4<f32>,
    // x: highlight size
    phong_extra: vec4<f32>,
};

struct ObjectUniforms {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    base_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> object_data: ObjectUniforms;

@group(1) @binding(1)
var base_texture: texture_2d<f32>;

@group(1) @binding(2)
var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object_data.model * vec4<f32>(input.position, 1.0);
    out.world_pos = world.xyz;
    out.normal = (object_data.normal_matrix * vec4<f32>(input.normal, 0.0)).xyz;
    out.uv = input.uv;
    out.clip_position = frame.projection * frame.view * world;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(base_texture, base_sampler, input.uv * frame.uv_scale.xy);
    let norm = normalize(input.normal);

    let ambient = frame.phong.x * frame.light_colors[0].xyz;

    let to_diffuse = normalize(frame.light_positions[1].xyz - input.world_pos);
    let impact = max(dot(norm, to_diffuse), 0.0);
    let diffuse = impact * frame.light_colors[1].xyz + vec3<f32>(frame.phong.y);

    let to_specular = normalize(frame.light_positions[2].xyz - input.world_pos);
    let view_dir = normalize(frame.camera_pos.xyz - input.world_pos);
    let reflect_dir = reflect(-to_specular, norm);
    let highlight = pow(max(dot(view_dir, reflect_dir), 0.0), frame.phong_extra.x);
    let specular = frame.phong.w * highlight * frame.light_colors[2].xyz;

    let light = ambient + frame.phong.z * diffuse + specular;
    return vec4<f32>(light * texel.rgb * object_data.base_color.rgb, 1.0);
}
"#;

pub(crate) const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var blit_tex: texture_2d<f32>;

@group(0) @binding(1)
var blit_sampler: sampler;

struct BlitOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@builtin(vertex_index) index: u32) -> BlitOut {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );
    var out: BlitOut;
    out.position = vec4<f32>(positions[index], 0.0, 1.0);
    out.uv = uvs[index];
    return out;
}

@fragment
fn fs_blit(input: BlitOut) -> @location(0) vec4<f32> {
    return textureSample(blit_tex, blit_sampler, input.uv);
}
"#;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) projection: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    pub(crate) light_positions: [[f32; 4]; 3],
    pub(crate) light_colors: [[f32; 4]; 3],
    pub(crate) uv_scale: [f32; 4],
    pub(crate) phong: [f32; 4],
    pub(crate) phong_extra: [f32; 4],
}

impl FrameUniforms {
    pub(crate) fn from_params(params: &FrameParams, aspect: f32) -> Self {
        let extend = |v: [f32; 3]| [v[0], v[1], v[2], 1.0];
        let phong = &params.phong;
        Self {
            view: params.camera.view_matrix().to_cols_array_2d(),
            projection: params
                .camera
                .projection_matrix(params.projection, aspect)
                .to_cols_array_2d(),
            camera_pos: params.camera.position.extend(1.0).to_array(),
            light_positions: params.lights.map(|l| extend(l.position)),
            light_colors: params.lights.map(|l| extend(l.color)),
            uv_scale: [params.uv_scale[0], params.uv_scale[1], 0.0, 0.0],
            phong: [
                phong.ambient_strength,
                phong.diffuse_bias,
                phong.diffuse_weight,
                phong.specular_intensity,
            ],
            phong_extra: [phong.highlight_size, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) normal_matrix: [[f32; 4]; 4],
    pub(crate) base_color: [f32; 4],
}

impl ObjectUniforms {
    pub(crate) fn new(model: glam::Mat4, base_color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color: [base_color[0], base_color[1], base_color[2], 1.0],
        }
    }
}

pub(crate) struct GpuObject {
    pub(crate) mesh: GpuMesh,
    pub(crate) pipeline_index: usize,
    _uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) struct PipelineState {
    target_format: wgpu::TextureFormat,
    scene_shader: wgpu::ShaderModule,
    scene_pipeline_layout: wgpu::PipelineLayout,
    object_layout: wgpu::BindGroupLayout,
    pub(crate) scene_pipelines: Vec<(LayoutKey, wgpu::RenderPipeline)>,
    pub(crate) frame_buffer: wgpu::Buffer,
    pub(crate) frame_bind_group: wgpu::BindGroup,
    pub(crate) blit_pipeline: wgpu::RenderPipeline,
    pub(crate) blit_bind_group: wgpu::BindGroup,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
    _offscreen_texture: wgpu::Texture,
    pub(crate) offscreen_view: wgpu::TextureView,
    _depth_texture: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    offscreen_size: [u32; 2],
    pub(crate) objects: Vec<GpuObject>,
    pub(crate) textures: Vec<GpuTexture>,
    fallback: GpuTexture,
    pub(crate) scene_version: u64,
    pub(crate) vertex_count: u32,
    pub(crate) triangle_count: u32,
}

/// Runs `f` inside a validation error scope so shader and pipeline errors
/// come back as values instead of reaching the uncaptured-error handler.
fn with_validation<T>(
    device: &wgpu::Device,
    what: &str,
    f: impl FnOnce() -> Result<T, String>,
) -> Result<T, String> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let result = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(format!("{what}: {err}")),
        None => result,
    }
}

impl PipelineState {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, String> {
        with_validation(device, "viewport pipeline", || {
            Ok(Self::build(device, queue, target_format))
        })
    }

    fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("still_life_scene_shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(SCENE_SHADER)),
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("still_life_frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::from_params(
                &FrameParams::default(),
                1.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("still_life_frame_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("still_life_frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("still_life_object_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let scene_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("still_life_scene_pipeline_layout"),
                bind_group_layouts: &[&frame_layout, &object_layout],
                push_constant_ranges: &[],
            });

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("still_life_blit_shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(BLIT_SHADER)),
        });

        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("still_life_blit_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("still_life_blit_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let blit_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("still_life_blit_pipeline_layout"),
                bind_group_layouts: &[&blit_bind_group_layout],
                push_constant_ranges: &[],
            });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("still_life_blit_pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_blit"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_blit"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (offscreen_texture, offscreen_view, depth_texture, depth_view) =
            create_offscreen_targets(device, target_format, 1, 1);
        let blit_bind_group =
            create_blit_bind_group(device, &blit_bind_group_layout, &offscreen_view, &blit_sampler);

        Self {
            target_format,
            scene_shader,
            scene_pipeline_layout,
            object_layout,
            scene_pipelines: Vec::new(),
            frame_buffer,
            frame_bind_group,
            blit_pipeline,
            blit_bind_group,
            blit_bind_group_layout,
            blit_sampler,
            _offscreen_texture: offscreen_texture,
            offscreen_view,
            _depth_texture: depth_texture,
            depth_view,
            offscreen_size: [1, 1],
            objects: Vec::new(),
            textures: Vec::new(),
            fallback: fallback_texture(device, queue),
            scene_version: 0,
            vertex_count: 0,
            triangle_count: 0,
        }
    }

    /// Index of the pipeline for `key`, compiling it on first use.
    fn scene_pipeline(&mut self, device: &wgpu::Device, key: &LayoutKey) -> Result<usize, String> {
        if let Some(index) = self.scene_pipelines.iter().position(|(k, _)| k == key) {
            return Ok(index);
        }

        let attributes = key.wgpu_attributes()?;
        let pipeline = with_validation(device, "scene pipeline", || {
            Ok(
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("still_life_scene_pipeline"),
                    layout: Some(&self.scene_pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &self.scene_shader,
                        entry_point: Some("vs_main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        buffers: &[wgpu::VertexBufferLayout {
                            array_stride: key.stride_bytes,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &attributes,
                        }],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &self.scene_shader,
                        entry_point: Some("fs_main"),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: self.target_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                }),
            )
        })?;

        tracing::debug!(
            stride = key.stride_bytes,
            attributes = key.attributes.len(),
            "compiled scene pipeline"
        );
        self.scene_pipelines.push((key.clone(), pipeline));
        Ok(self.scene_pipelines.len() - 1)
    }

    pub(crate) fn texture_for(&self, index: Option<usize>) -> &GpuTexture {
        index
            .and_then(|i| self.textures.get(i))
            .unwrap_or(&self.fallback)
    }
}

/// Replaces every GPU mesh and texture with the contents of `scene`.
pub(crate) fn apply_scene_to_pipeline(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &mut PipelineState,
    scene: &RenderScene,
) -> Result<(), String> {
    pipeline.objects.clear();
    pipeline.textures.clear();

    // Slot i of the scene maps to textures[slot_map[i]]; failed uploads fall back.
    let mut slot_map = Vec::with_capacity(scene.textures.len());
    for slot in &scene.textures {
        let uploaded = match slot {
            Some(texture) => match upload_texture(device, queue, texture) {
                Ok(gpu) => {
                    pipeline.textures.push(gpu);
                    Some(pipeline.textures.len() - 1)
                }
                Err(err) => {
                    tracing::warn!("texture upload failed: {err}");
                    None
                }
            },
            None => None,
        };
        slot_map.push(uploaded);
    }

    let mut vertex_count = 0;
    let mut triangle_count = 0;
    for object in &scene.objects {
        let mesh = upload_mesh(device, &object.label, &object.mesh);
        let pipeline_index = pipeline.scene_pipeline(device, &mesh.layout)?;
        let texture_index = slot_map.get(object.texture).copied().flatten();
        if texture_index.is_none() {
            tracing::warn!(
                "{} has no usable texture in slot {}, drawing with fallback",
                object.label,
                object.texture
            );
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("still_life_{}_uniforms", object.label)),
            contents: bytemuck::bytes_of(&ObjectUniforms::new(object.model, object.base_color)),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let texture = pipeline.texture_for(texture_index);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("still_life_{}_bind_group", object.label)),
            layout: &pipeline.object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        vertex_count += object.mesh.vertex_count() as u32;
        triangle_count += object.mesh.triangle_count() as u32;
        pipeline.objects.push(GpuObject {
            mesh,
            pipeline_index,
            _uniform_buffer: uniform_buffer,
            bind_group,
        });
    }

    pipeline.vertex_count = vertex_count;
    pipeline.triangle_count = triangle_count;
    tracing::info!(
        objects = pipeline.objects.len(),
        textures = pipeline.textures.len(),
        vertices = vertex_count,
        triangles = triangle_count,
        "scene uploaded"
    );
    Ok(())
}

fn create_blit_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("still_life_blit_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_offscreen_targets(
    device: &wgpu::Device,
    target_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (
    wgpu::Texture,
    wgpu::TextureView,
    wgpu::Texture,
    wgpu::TextureView,
) {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    let offscreen_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("still_life_offscreen"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: target_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let offscreen_view = offscreen_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("still_life_depth"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (offscreen_texture, offscreen_view, depth_texture, depth_view)
}

pub(crate) fn ensure_offscreen_targets(
    device: &wgpu::Device,
    pipeline: &mut PipelineState,
    width: u32,
    height: u32,
) {
    let width = width.max(1);
    let height = height.max(1);
    if pipeline.offscreen_size == [width, height] {
        return;
    }

    let (offscreen_texture, offscreen_view, depth_texture, depth_view) =
        create_offscreen_targets(device, pipeline.target_format, width, height);
    pipeline.blit_bind_group = create_blit_bind_group(
        device,
        &pipeline.blit_bind_group_layout,
        &offscreen_view,
        &pipeline.blit_sampler,
    );
    pipeline._offscreen_texture = offscreen_texture;
    pipeline.offscreen_view = offscreen_view;
    pipeline._depth_texture = depth_texture;
    pipeline.depth_view = depth_view;
    pipeline.offscreen_size = [width, height];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FlyCamera, ViewportProjection};

    fn validate(source: &str) {
        let module = naga::front::wgsl::parse_str(source).expect("wgsl parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("wgsl validates");
    }

    #[test]
    fn scene_shader_is_valid_wgsl() {
        validate(SCENE_SHADER);
    }

    #[test]
    fn blit_shader_is_valid_wgsl() {
        validate(BLIT_SHADER);
    }

    #[test]
    fn uniform_sizes_match_shader_structs() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 288);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 144);
    }

    #[test]
    fn frame_uniforms_pack_lights_in_role_order() {
        let params = FrameParams::default();
        let uniforms = FrameUniforms::from_params(&params, 1.0);
        assert_eq!(uniforms.light_positions[0], [0.0, 0.0, 4.0, 1.0]);
        assert_eq!(uniforms.light_colors[1], [0.7, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.light_positions[2], [-2.0, 0.0, -5.0, 1.0]);
        assert_eq!(uniforms.uv_scale[..2], [5.0, 5.0]);
        assert_eq!(uniforms.phong, [0.30, 0.35, 2.0, 0.6]);
        assert_eq!(uniforms.phong_extra[0], 6.0);
        assert_eq!(uniforms.camera_pos, [0.0, 0.0, 3.0, 1.0]);
    }

    #[test]
    fn projection_mode_reaches_uniforms() {
        let mut params = FrameParams::default();
        let persp = FrameUniforms::from_params(&params, 1.5);
        params.projection = ViewportProjection::Orthographic;
        let ortho = FrameUniforms::from_params(&params, 1.5);
        assert_ne!(persp.projection, ortho.projection);
        assert_eq!(persp.view, ortho.view);
        assert_eq!(
            persp.view,
            FlyCamera::default().view_matrix().to_cols_array_2d()
        );
    }

    #[test]
    fn normal_matrix_undoes_scale() {
        let model = glam::Mat4::from_scale(glam::Vec3::splat(0.5));
        let uniforms = ObjectUniforms::new(model, [1.0, 0.5, 0.25]);
        assert_eq!(uniforms.normal_matrix[0][0], 2.0);
        assert_eq!(uniforms.base_color, [1.0, 0.5, 0.25, 1.0]);
    }
}
