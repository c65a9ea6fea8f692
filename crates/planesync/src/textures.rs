use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::EngineError;

/// Faint white texel used for slots whose image failed to load.
pub const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 25];

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: PLACEHOLDER_TEXEL.to_vec(),
        }
    }
}

/// Source of decoded image data, one call per image.
pub trait TextureLoader {
    fn load(&mut self, src: &str) -> Result<TextureData>;
}

/// Loads images from disk with the `image` crate.
///
/// Relative sources resolve against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder {
    base_dir: Option<PathBuf>,
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn decode_bytes(bytes: &[u8]) -> Result<TextureData> {
        let image = image::load_from_memory(bytes).context("failed to decode image bytes")?;
        Ok(into_texture_data(image))
    }
}

impl TextureLoader for ImageDecoder {
    fn load(&mut self, src: &str) -> Result<TextureData> {
        let path = self.resolve(src);
        let bytes = fs::read(&path)
            .with_context(|| format!("failed to open image at {}", path.display()))?;
        Self::decode_bytes(&bytes).with_context(|| format!("failed to load {}", path.display()))
    }
}

fn into_texture_data(image: image::DynamicImage) -> TextureData {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    TextureData {
        width,
        height,
        rgba: rgba.into_raw(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureSlot {
    pub label: String,
    pub data: TextureData,
    pub placeholder: bool,
}

/// Fixed-length, index-ordered texture array bound as `uImageArray`.
#[derive(Debug, Clone, Default)]
pub struct TextureArrayRegistry {
    slots: Vec<TextureSlot>,
}

impl TextureArrayRegistry {
    /// Loads one texture per source, in order. Failed loads become
    /// placeholders so every index stays populated.
    pub fn load<'a, I>(sources: I, loader: &mut dyn TextureLoader) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut slots = Vec::new();
        for (index, src) in sources.into_iter().enumerate() {
            let slot = match loader.load(src) {
                Ok(data) => TextureSlot {
                    label: src.to_string(),
                    data,
                    placeholder: false,
                },
                Err(error) => {
                    let failure = EngineError::TextureLoad {
                        index,
                        src: src.to_string(),
                        reason: format!("{error:#}"),
                    };
                    tracing::warn!(error = %failure, "using placeholder texture");
                    TextureSlot {
                        label: format!("placeholder #{index}"),
                        data: TextureData::placeholder(),
                        placeholder: true,
                    }
                }
            };
            slots.push(slot);
        }

        let registry = Self { slots };
        tracing::debug!(
            textures = registry.len(),
            placeholders = registry.placeholder_count(),
            "texture array loaded"
        );
        registry
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TextureSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureSlot> {
        self.slots.iter()
    }

    pub fn placeholder_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.placeholder).count()
    }

    /// Largest width and height across all layers; the size an array
    /// texture must have to hold every slot.
    pub fn layer_extent(&self) -> (u32, u32) {
        self.slots.iter().fold((1, 1), |(width, height), slot| {
            (width.max(slot.data.width), height.max(slot.data.height))
        })
    }
}
