//! In-memory chunks: cell table, material map, derived raster and the
//! loader that decodes chunks off the owning thread.

pub mod chunk;
pub mod chunk_map;
pub mod error;
pub mod material_map;
pub mod raster;
pub mod streaming;

pub use chunk::{Cell, Chunk, ReadyState};
pub use chunk_map::{ChunkMap, EditError};
pub use error::WorldError;
pub use material_map::MaterialMap;
pub use raster::{cell_color, reconstruct, Raster};
pub use streaming::{ChunkJob, ChunkLoader, LoadFailure};
