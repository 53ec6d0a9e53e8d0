//! Display raster reconstruction.
//!
//! The raster is a cache derived from a chunk's cells and material table. It
//! is never persisted. [`cell_color`] is the single per-cell rule, shared by
//! the decode walk and by [`reconstruct`].

use petri_core::constants::{AIR_INDEX, CELLS_PER_CHUNK, CHUNK_HEIGHT, CHUNK_WIDTH};
use petri_core::math::{cell_index, chunk_local_to_world};
use petri_core::types::{ChunkCoord, Rgba32, WorldPixel};

use crate::chunk::Cell;
use crate::material_map::MaterialMap;

/// A 512x512 RGBA buffer stored x-outer, y-inner like the cell table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pixels: Vec<Rgba32>,
}

impl Default for Raster {
    fn default() -> Self {
        Self::new()
    }
}

impl Raster {
    /// A fully transparent raster.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgba32::TRANSPARENT; CELLS_PER_CHUNK],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba32> {
        if x >= CHUNK_WIDTH || y >= CHUNK_HEIGHT {
            return None;
        }
        Some(self.pixels[cell_index(x, y)])
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, color: Rgba32) {
        self.pixels[cell_index(x, y)] = color;
    }

    pub fn pixels(&self) -> &[Rgba32] {
        &self.pixels
    }

    /// Raw bytes in storage order (x outer).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Whether every pixel is transparent black.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == Rgba32::TRANSPARENT)
    }

    /// RGBA bytes in image order (y outer, x inner), as image libraries expect.
    pub fn to_rgba_bytes_row_major(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CELLS_PER_CHUNK * 4);
        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_WIDTH {
                out.extend_from_slice(bytemuck::bytes_of(&self.pixels[cell_index(x, y)]));
            }
        }
        out
    }
}

/// Color shown for one cell, or `None` for air (left transparent).
///
/// A custom color always wins. Otherwise the cell's material texture is
/// sampled at the absolute world pixel.
#[inline]
pub fn cell_color(cell: &Cell, world: WorldPixel, materials: &MaterialMap) -> Option<Rgba32> {
    if let Some(color) = cell.custom_color {
        return Some(color);
    }
    if cell.material_index == AIR_INDEX {
        return None;
    }
    materials
        .get(cell.material_index)
        .map(|material| material.sample(world))
}

/// Recompute a whole raster from cells and materials.
pub fn reconstruct(position: ChunkCoord, cells: &[Cell], materials: &MaterialMap) -> Raster {
    let mut raster = Raster::new();
    for x in 0..CHUNK_WIDTH {
        for y in 0..CHUNK_HEIGHT {
            let world = chunk_local_to_world(position, x, y);
            if let Some(color) = cell_color(&cells[cell_index(x, y)], world, materials) {
                raster.set(x, y, color);
            }
        }
    }
    raster
}
