use crate::constants::{CHUNK_HEIGHT, CHUNK_WIDTH, MATERIAL_TEXTURE_SCALE};
use crate::types::{ChunkCoord, WorldPixel};
use glam::IVec2;

/// Wrap `value` into `[0, mask]` for a power-of-two range `mask + 1`.
///
/// Equivalent to `value.rem_euclid(mask + 1)` for every `i32`, including
/// negative inputs, with no branch on the sign.
#[inline]
pub fn wrap_to_range(value: i32, mask: i32) -> i32 {
    ((value & mask) + (mask + 1)) & mask
}

/// Texel for a known material at a world pixel: `(column, row)`.
///
/// World coordinates are scaled by the texture supersampling factor and then
/// wrapped into the texture by its power-of-two masks.
#[inline]
pub fn known_texel(world: WorldPixel, width: u32, height: u32) -> (u32, u32) {
    let wx = world.x.wrapping_mul(MATERIAL_TEXTURE_SCALE);
    let wy = world.y.wrapping_mul(MATERIAL_TEXTURE_SCALE);
    let column = wrap_to_range(wx, width as i32 - 1);
    let row = wrap_to_range(wy, height as i32 - 1);
    (column as u32, row as u32)
}

/// Texel for a missing-material placeholder at a world pixel: `(row, column)`.
///
/// Placeholders tile by absolute value, so the pattern mirrors across the
/// origin. The X coordinate selects the row.
#[inline]
pub fn missing_texel(world: WorldPixel, width: u32, height: u32) -> (u32, u32) {
    let row = world.x.unsigned_abs() % width;
    let column = world.y.unsigned_abs() % height;
    (row, column)
}

/// Convert a chunk coordinate and local cell offset to an absolute world pixel.
pub fn chunk_local_to_world(chunk: ChunkCoord, local_x: usize, local_y: usize) -> WorldPixel {
    IVec2::new(
        chunk.x * CHUNK_WIDTH as i32 + local_x as i32,
        chunk.y * CHUNK_HEIGHT as i32 + local_y as i32,
    )
}

/// Convert a world pixel to its containing chunk coordinate.
pub fn world_to_chunk(world: WorldPixel) -> ChunkCoord {
    IVec2::new(
        world.x.div_euclid(CHUNK_WIDTH as i32),
        world.y.div_euclid(CHUNK_HEIGHT as i32),
    )
}

/// Convert a world pixel to its local cell offset within a chunk.
pub fn world_to_local(world: WorldPixel) -> (usize, usize) {
    (
        world.x.rem_euclid(CHUNK_WIDTH as i32) as usize,
        world.y.rem_euclid(CHUNK_HEIGHT as i32) as usize,
    )
}

/// Flat index of a cell in a chunk grid stored x-outer, y-inner.
#[inline]
pub const fn cell_index(x: usize, y: usize) -> usize {
    x * CHUNK_HEIGHT + y
}
