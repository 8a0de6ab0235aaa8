use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    MirroredRepeat,
    ClampToEdge,
}

/// Storage format picked from the decoded channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    Rgb8,
    Rgba8,
}

impl TexelFormat {
    pub fn channels(self) -> usize {
        match self {
            TexelFormat::Rgb8 => 3,
            TexelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{name}: images with {channels} channels are not supported")]
    UnsupportedChannels { name: String, channels: u8 },
    #[error("{name}: image is empty")]
    Empty { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A decoded image, flipped so row 0 is the bottom of the picture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("texture");
        Self::decode(name, &bytes)
    }

    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
            name: name.to_string(),
            source,
        })?;
        Self::from_image(name, img)
    }

    pub fn from_image(name: &str, img: DynamicImage) -> Result<Self, TextureError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(TextureError::Empty {
                name: name.to_string(),
            });
        }

        let channels = img.color().channel_count();
        let img = img.flipv();
        let (format, pixels) = match channels {
            3 => (TexelFormat::Rgb8, img.to_rgb8().into_raw()),
            4 => (TexelFormat::Rgba8, img.to_rgba8().into_raw()),
            other => {
                return Err(TextureError::UnsupportedChannels {
                    name: name.to_string(),
                    channels: other,
                })
            }
        };

        Ok(Self {
            name: name.to_string(),
            width: img.width(),
            height: img.height(),
            format,
            pixels,
        })
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.format {
            TexelFormat::Rgba8 => self.pixels.clone(),
            TexelFormat::Rgb8 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        }
    }

    /// RGBA levels from full size down to 1x1.
    pub fn mip_chain(&self) -> Vec<MipLevel> {
        let base = MipLevel {
            width: self.width,
            height: self.height,
            rgba: self.to_rgba8(),
        };
        let Some(source) = RgbaImage::from_raw(self.width, self.height, base.rgba.clone()) else {
            return vec![base];
        };

        let count = mip_level_count(self.width, self.height);
        let mut levels = Vec::with_capacity(count as usize);
        levels.push(base);
        for level in 1..count {
            let width = (self.width >> level).max(1);
            let height = (self.height >> level).max(1);
            let scaled = image::imageops::resize(&source, width, height, FilterType::Triangle);
            levels.push(MipLevel {
                width,
                height,
                rgba: scaled.into_raw(),
            });
        }
        levels
    }
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}
