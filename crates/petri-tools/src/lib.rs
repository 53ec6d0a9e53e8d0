//! Support code for the `chunk-tool` binary.

pub mod render;
pub mod report;

use std::path::{Path, PathBuf};

use petri_core::types::ChunkCoord;
use petri_materials::{MaterialRegistry, RegistryError};
use petri_persist::{Decompressor, PersistError, Uncompressed};
use petri_world::{Chunk, WorldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Materials(#[from] RegistryError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("raster does not match chunk dimensions")]
    RasterSize,
}

/// The built-in material set, extended by a RON file when one is given.
pub fn load_registry(extra: Option<&Path>) -> Result<MaterialRegistry, ToolError> {
    match extra {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|source| ToolError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(MaterialRegistry::builtin_with(&[source.as_str()])?)
        }
        None => Ok(MaterialRegistry::builtin()?),
    }
}

/// Read and decode one chunk file.
pub fn load_chunk_file(
    path: &Path,
    position: ChunkCoord,
    registry: &MaterialRegistry,
) -> Result<Chunk, ToolError> {
    let bytes = Uncompressed.read_chunk_file(path)?;
    Ok(Chunk::decode(position, &bytes, registry)?)
}

/// Outcome of decoding and re-encoding a chunk file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReencodeOutcome {
    pub input_len: usize,
    pub output_len: usize,
    pub identical: bool,
}

/// Decode `bytes` and encode the result again.
pub fn reencode(
    bytes: &[u8],
    position: ChunkCoord,
    registry: &MaterialRegistry,
) -> Result<(Vec<u8>, ReencodeOutcome), ToolError> {
    let chunk = Chunk::decode(position, bytes, registry)?;
    let output = chunk.encode()?;
    let outcome = ReencodeOutcome {
        input_len: bytes.len(),
        output_len: output.len(),
        identical: output == bytes,
    };
    Ok((output, outcome))
}
