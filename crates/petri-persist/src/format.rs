use petri_core::constants::{CELLS_PER_CHUNK, CHUNK_FORMAT_VERSION, CHUNK_HEIGHT, CHUNK_WIDTH};
use petri_core::types::Rgba32;

use crate::physics::PhysicsObject;

/// Size of the chunk header in bytes: version, width, height.
pub const HEADER_SIZE: usize = 12;

/// Size of the packed cell table in bytes (one byte per cell).
pub const CELL_TABLE_SIZE: usize = CELLS_PER_CHUNK;

/// Size of one packed RGBA custom color.
pub const CUSTOM_COLOR_SIZE: usize = 4;

/// Minimum encoded size of one length-prefixed string.
pub const MIN_STRING_SIZE: usize = 4;

/// The three big-endian `i32` values opening every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub version: i32,
    pub width: i32,
    pub height: i32,
}

impl ChunkHeader {
    /// The only header this codec accepts and produces.
    pub const CURRENT: ChunkHeader = ChunkHeader {
        version: CHUNK_FORMAT_VERSION,
        width: CHUNK_WIDTH as i32,
        height: CHUNK_HEIGHT as i32,
    };
}

/// A chunk as it appears on disk, with nothing resolved or interpreted.
///
/// `cells` holds one packed byte per cell in x-outer, y-inner order: bits 0-6
/// are the chunk-local material index, bit 7 the custom-color flag.
/// `custom_colors` has one entry per flagged cell, in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord<P = PhysicsObject> {
    pub cells: Vec<u8>,
    pub material_names: Vec<String>,
    pub custom_colors: Vec<Rgba32>,
    pub physics_objects: Vec<P>,
    /// Trailing field of unknown purpose, round-tripped as read.
    pub reserved: i32,
}

impl<P> ChunkRecord<P> {
    /// An all-air record whose material table holds only `air_name`.
    pub fn empty(air_name: impl Into<String>) -> Self {
        Self {
            cells: vec![0u8; CELL_TABLE_SIZE],
            material_names: vec![air_name.into()],
            custom_colors: Vec::new(),
            physics_objects: Vec::new(),
            reserved: 0,
        }
    }
}
