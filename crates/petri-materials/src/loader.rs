use petri_core::error::CoreError;
use petri_core::material::MaterialTexture;
use petri_core::types::Rgba32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An RGBA color as written in RON: `(r, g, b, a)`.
pub type ColorDef = (u8, u8, u8, u8);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse materials RON: {0}")]
    MaterialParseError(String),
}

/// How a material's texture is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureDef {
    /// A single texel of one color.
    Solid(u8, u8, u8, u8),
    /// A square checkerboard.
    Checker {
        size: u32,
        square: u32,
        a: ColorDef,
        b: ColorDef,
    },
    /// A square base color sprinkled with accent texels from a seeded hash.
    Speckle {
        size: u32,
        base: ColorDef,
        accent: ColorDef,
        seed: u32,
    },
    /// Explicit row-major texels packed as `r | g << 8 | b << 16 | a << 24`.
    Pixels {
        width: u32,
        height: u32,
        pixels: Vec<u32>,
    },
}

impl TextureDef {
    /// Texture dimensions as declared, without building it.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            TextureDef::Solid(..) => (1, 1),
            TextureDef::Checker { size, .. } | TextureDef::Speckle { size, .. } => (*size, *size),
            TextureDef::Pixels { width, height, .. } => (*width, *height),
        }
    }

    pub fn build(&self) -> Result<MaterialTexture, CoreError> {
        match self {
            &TextureDef::Solid(r, g, b, a) => MaterialTexture::solid(1, 1, Rgba32::new(r, g, b, a)),
            &TextureDef::Checker { size, square, a, b } => {
                MaterialTexture::checker(size, square, color(a), color(b))
            }
            &TextureDef::Speckle {
                size,
                base,
                accent,
                seed,
            } => {
                let pixels = (0..size)
                    .flat_map(|row| {
                        (0..size).map(move |column| {
                            if speckle_hash(column, row, seed) & 3 == 0 {
                                color(accent)
                            } else {
                                color(base)
                            }
                        })
                    })
                    .collect();
                MaterialTexture::new(size, size, pixels)
            }
            TextureDef::Pixels {
                width,
                height,
                pixels,
            } => MaterialTexture::new(
                *width,
                *height,
                pixels.iter().map(|&p| Rgba32::from_packed(p)).collect(),
            ),
        }
    }
}

/// A material as declared in a RON source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: u32,
    pub name: String,
    pub texture: TextureDef,
}

fn color((r, g, b, a): ColorDef) -> Rgba32 {
    Rgba32::new(r, g, b, a)
}

fn speckle_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77) ^ seed;
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h
}

/// Parse a single materials RON string.
pub fn load_materials_from_str(ron_str: &str) -> Result<Vec<MaterialDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::MaterialParseError(e.to_string()))
}

/// Load and merge multiple material sources, in order.
pub fn load_all_materials(sources: &[&str]) -> Result<Vec<MaterialDef>, LoadError> {
    let mut all_materials = Vec::new();
    for source in sources {
        all_materials.extend(load_materials_from_str(source)?);
    }
    Ok(all_materials)
}
