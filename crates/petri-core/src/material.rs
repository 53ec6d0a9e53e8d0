use std::sync::{Arc, OnceLock};

use crate::constants::{AIR_MATERIAL_NAME, MISSING_TEXTURE_SIZE};
use crate::error::CoreError;
use crate::math::{known_texel, missing_texel};
use crate::types::{MaterialId, Rgba32, WorldPixel};

/// A material's color texture, stored row-major (`pixels[row * width + column]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialTexture {
    width: u32,
    height: u32,
    pixels: Vec<Rgba32>,
}

impl MaterialTexture {
    /// Build a texture from row-major pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba32>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::EmptyTexture { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CoreError::PixelCountMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A texture where every texel is `color`.
    pub fn solid(width: u32, height: u32, color: Rgba32) -> Result<Self, CoreError> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    /// A square checkerboard of `square`-sized cells alternating `a` and `b`.
    pub fn checker(size: u32, square: u32, a: Rgba32, b: Rgba32) -> Result<Self, CoreError> {
        let square = square.max(1);
        let pixels = (0..size)
            .flat_map(|row| {
                (0..size).map(move |column| {
                    if ((row / square) + (column / square)) % 2 == 0 {
                        a
                    } else {
                        b
                    }
                })
            })
            .collect();
        Self::new(size, size, pixels)
    }

    /// The shared magenta/black placeholder used for unrecognized materials.
    pub fn missing_placeholder() -> Arc<MaterialTexture> {
        static PLACEHOLDER: OnceLock<Arc<MaterialTexture>> = OnceLock::new();
        PLACEHOLDER
            .get_or_init(|| {
                let size = MISSING_TEXTURE_SIZE;
                let pixels = (0..size * size)
                    .map(|i| {
                        let (row, column) = (i / size, i % size);
                        if ((row / (size / 2)) + (column / (size / 2))) % 2 == 0 {
                            Rgba32::new(255, 0, 255, 255)
                        } else {
                            Rgba32::new(0, 0, 0, 255)
                        }
                    })
                    .collect();
                Arc::new(MaterialTexture {
                    width: size,
                    height: size,
                    pixels,
                })
            })
            .clone()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba32] {
        &self.pixels
    }

    /// Whether both dimensions are powers of two (required for known materials).
    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }

    /// Texel at `(row, column)`. Out-of-range indices wrap.
    #[inline]
    pub fn texel(&self, row: u32, column: u32) -> Rgba32 {
        let row = (row % self.height) as usize;
        let column = (column % self.width) as usize;
        self.pixels[row * self.width as usize + column]
    }
}

/// A resolved material: canonical identity, display name and color texture.
///
/// Descriptors compare by identity, name and missing flag; the texture is not
/// part of equality.
#[derive(Debug, Clone)]
pub struct MaterialDescriptor {
    pub id: MaterialId,
    pub name: String,
    /// Set when the provider did not recognize `name`.
    pub missing: bool,
    pub texture: Arc<MaterialTexture>,
}

impl PartialEq for MaterialDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.missing == other.missing && self.name == other.name
    }
}

impl Eq for MaterialDescriptor {}

impl MaterialDescriptor {
    /// A recognized material. Its texture must be power-of-two sized.
    pub fn known(
        id: MaterialId,
        name: impl Into<String>,
        texture: Arc<MaterialTexture>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if !texture.is_power_of_two() {
            return Err(CoreError::NonPowerOfTwoTexture {
                name,
                width: texture.width,
                height: texture.height,
            });
        }
        Ok(Self {
            id,
            name,
            missing: false,
            texture,
        })
    }

    /// Placeholder for a name the provider does not know.
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            id: MaterialId::MISSING,
            name: name.into(),
            missing: true,
            texture: MaterialTexture::missing_placeholder(),
        }
    }

    /// Color this material shows at an absolute world pixel.
    #[inline]
    pub fn sample(&self, world: WorldPixel) -> Rgba32 {
        let tex = &self.texture;
        if self.missing {
            let (row, column) = missing_texel(world, tex.width, tex.height);
            tex.texel(row, column)
        } else {
            let (column, row) = known_texel(world, tex.width, tex.height);
            tex.texel(row, column)
        }
    }
}

/// Maps material names to canonical descriptors.
///
/// Implementations are shared read-only between concurrent chunk decodes.
/// Unrecognized names must degrade to [`MaterialDescriptor::missing`], never fail.
pub trait MaterialProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Arc<MaterialDescriptor>;

    /// Resolve a chunk's name table, preserving order.
    fn resolve_all(&self, names: &[String]) -> Vec<Arc<MaterialDescriptor>> {
        names.iter().map(|name| self.resolve(name)).collect()
    }

    /// The empty material occupying chunk-local slot 0 of fresh chunks.
    fn air(&self) -> Arc<MaterialDescriptor> {
        self.resolve(AIR_MATERIAL_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn gradient(width: u32, height: u32) -> MaterialTexture {
        let pixels = (0..height)
            .flat_map(|row| (0..width).map(move |col| Rgba32::new(col as u8, row as u8, 0, 255)))
            .collect();
        MaterialTexture::new(width, height, pixels).expect("valid texture")
    }

    #[test]
    fn test_texture_rejects_bad_pixel_count() {
        let result = MaterialTexture::new(4, 4, vec![Rgba32::TRANSPARENT; 15]);
        assert!(matches!(result, Err(CoreError::PixelCountMismatch { expected: 16, actual: 15, .. })));
    }

    #[test]
    fn test_texture_rejects_empty() {
        let result = MaterialTexture::new(0, 4, Vec::new());
        assert!(matches!(result, Err(CoreError::EmptyTexture { .. })));
    }

    #[test]
    fn test_known_requires_power_of_two() {
        let tex = Arc::new(gradient(6, 8));
        let result = MaterialDescriptor::known(MaterialId(1), "sand", tex);
        assert!(matches!(result, Err(CoreError::NonPowerOfTwoTexture { .. })));
    }

    #[test]
    fn test_known_sample_swaps_row_and_column() {
        let tex = Arc::new(gradient(64, 64));
        let mat = MaterialDescriptor::known(MaterialId(3), "rock", tex).expect("valid");
        // world (1, 2) -> column 6, row 12
        assert_eq!(mat.sample(IVec2::new(1, 2)), Rgba32::new(6, 12, 0, 255));
    }

    #[test]
    fn test_missing_sample_mirrors_across_origin() {
        let mat = MaterialDescriptor::missing("mystery_goo");
        assert!(mat.missing);
        assert_eq!(mat.id, MaterialId::MISSING);
        for (x, y) in [(1, 5), (7, 2), (12, 30)] {
            assert_eq!(
                mat.sample(IVec2::new(x, y)),
                mat.sample(IVec2::new(-x, -y)),
                "({x}, {y})"
            );
        }
    }

    #[test]
    fn test_placeholder_is_shared() {
        let a = MaterialTexture::missing_placeholder();
        let b = MaterialTexture::missing_placeholder();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.width(), a.height());
    }

    #[test]
    fn test_descriptor_equality_ignores_texture() {
        let a = MaterialDescriptor::known(MaterialId(2), "water", Arc::new(gradient(4, 4)))
            .expect("valid");
        let mut b = a.clone();
        b.texture = Arc::new(gradient(8, 8));
        assert_eq!(a, b);
        assert_ne!(a, MaterialDescriptor::missing("water"));
    }

    #[test]
    fn test_checker_alternates() {
        let black = Rgba32::new(0, 0, 0, 255);
        let white = Rgba32::new(255, 255, 255, 255);
        let tex = MaterialTexture::checker(4, 2, black, white).expect("valid");
        assert_eq!(tex.texel(0, 0), black);
        assert_eq!(tex.texel(0, 2), white);
        assert_eq!(tex.texel(2, 2), black);
    }
}
