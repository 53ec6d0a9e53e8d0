//! Single source of truth for chunk format constants.
//! Shared by the codec, the world crate and the material registry.

/// Width of a chunk in cells.
pub const CHUNK_WIDTH: usize = 512;

/// Height of a chunk in cells.
pub const CHUNK_HEIGHT: usize = 512;

/// Total cells per chunk (512^2).
pub const CELLS_PER_CHUNK: usize = CHUNK_WIDTH * CHUNK_HEIGHT;

/// The only chunk format version this codec reads and writes.
pub const CHUNK_FORMAT_VERSION: i32 = 24;

/// Bit 7 of a packed cell byte marks a custom-colored cell.
pub const CUSTOM_COLOR_FLAG: u8 = 0x80;

/// Low 7 bits of a packed cell byte hold the chunk-local material index.
pub const MATERIAL_INDEX_MASK: u8 = 0x7F;

/// Maximum entries in a chunk-local material table, air slot included.
/// Bounded by the single byte each cell uses for its index.
pub const MAX_CHUNK_MATERIALS: usize = 256;

/// Table slots a cell can actually reference once packed. Edits never
/// append past this, even though a stored table may list more names.
pub const MAX_ADDRESSABLE_MATERIALS: usize = MATERIAL_INDEX_MASK as usize + 1;

/// Chunk-local index reserved for air. Air cells are never drawn.
pub const AIR_INDEX: u8 = 0;

/// Canonical name of the empty material.
pub const AIR_MATERIAL_NAME: &str = "air";

/// Material textures are sampled at 6 texels per world pixel.
pub const MATERIAL_TEXTURE_SCALE: i32 = 6;

/// Side length of the placeholder texture used for unrecognized materials.
pub const MISSING_TEXTURE_SIZE: u32 = 8;
