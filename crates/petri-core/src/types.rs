use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Newtype for canonical (global) material identifiers, as assigned by the
/// material provider. Distinct from a chunk-local material index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Identity carried by "missing" placeholder descriptors. Never registered
    /// in a chunk's reverse material index.
    pub const MISSING: MaterialId = MaterialId(u32::MAX);
}

/// Chunk coordinate in chunk-space (each unit = 512 cells).
pub type ChunkCoord = IVec2;

/// Absolute world coordinate in pixel (cell) space.
pub type WorldPixel = IVec2;

/// An 8-bit-per-channel RGBA color.
///
/// The packed `u32` form places red in the lowest byte and alpha in the
/// highest, which is how custom colors and texture pixels are stored on disk.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
pub struct Rgba32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba32 {
    /// Fully transparent black. Raster cells default to this.
    pub const TRANSPARENT: Rgba32 = Rgba32::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack from the on-disk representation.
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: packed as u8,
            g: (packed >> 8) as u8,
            b: (packed >> 16) as u8,
            a: (packed >> 24) as u8,
        }
    }

    /// Pack into the on-disk representation.
    pub const fn packed(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16) | ((self.a as u32) << 24)
    }
}

impl From<[u8; 4]> for Rgba32 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba32> for [u8; 4] {
    fn from(c: Rgba32) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}
