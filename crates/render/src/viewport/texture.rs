use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;

use crate::scene::{RenderTexture, TextureWrap};

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub(crate) struct GpuTexture {
    pub(crate) _texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
}

pub(crate) fn address_mode(wrap: TextureWrap) -> wgpu::AddressMode {
    match wrap {
        TextureWrap::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        TextureWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

/// Concatenates the mip levels, checking each against its expected size.
pub(crate) fn mip_bytes(texture: &RenderTexture) -> Result<Vec<u8>, String> {
    let mut data = Vec::new();
    for (level, bytes) in texture.mips.iter().enumerate() {
        let width = (texture.width >> level).max(1) as usize;
        let height = (texture.height >> level).max(1) as usize;
        if bytes.len() != width * height * 4 {
            return Err(format!(
                "{}: mip {level} has {} bytes, expected {}",
                texture.label,
                bytes.len(),
                width * height * 4
            ));
        }
        data.extend_from_slice(bytes);
    }
    if data.is_empty() {
        return Err(format!("{}: no mip levels", texture.label));
    }
    Ok(data)
}

pub(crate) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &RenderTexture,
) -> Result<GpuTexture, String> {
    let data = mip_bytes(texture)?;
    let gpu_texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(&texture.label),
            size: wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: texture.mips.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &data,
    );
    Ok(finish(device, gpu_texture, texture.wrap, &texture.label))
}

/// 1x1 black texture bound where a texture failed to load.
pub(crate) fn fallback_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("still_life_fallback_texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &[0, 0, 0, 255],
    );
    finish(
        device,
        texture,
        TextureWrap::ClampToEdge,
        "still_life_fallback_texture",
    )
}

fn finish(
    device: &wgpu::Device,
    texture: wgpu::Texture,
    wrap: TextureWrap,
    label: &str,
) -> GpuTexture {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mode = address_mode(wrap);
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    GpuTexture {
        _texture: texture,
        view,
        sampler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(width: u32, height: u32, mips: Vec<Vec<u8>>) -> RenderTexture {
        RenderTexture {
            label: "test".to_string(),
            width,
            height,
            mips,
            wrap: TextureWrap::MirroredRepeat,
        }
    }

    #[test]
    fn wrap_modes_map_to_address_modes() {
        assert_eq!(
            address_mode(TextureWrap::MirroredRepeat),
            wgpu::AddressMode::MirrorRepeat
        );
        assert_eq!(
            address_mode(TextureWrap::ClampToEdge),
            wgpu::AddressMode::ClampToEdge
        );
    }

    #[test]
    fn mip_bytes_concatenates_levels() {
        let tex = texture(2, 2, vec![vec![1; 16], vec![2; 4]]);
        let data = mip_bytes(&tex).unwrap();
        assert_eq!(data.len(), 20);
        assert_eq!(data[16], 2);
    }

    #[test]
    fn mip_bytes_rejects_wrong_sizes() {
        assert!(mip_bytes(&texture(2, 2, vec![vec![0; 15]])).is_err());
        assert!(mip_bytes(&texture(2, 2, Vec::new())).is_err());
    }
}
