use std::path::Path;

use crate::error::PersistError;

/// Turns a chunk file on disk into the raw bytes the chunk codec reads.
///
/// Implementations are shared between loader threads.
pub trait Decompressor: Send + Sync {
    fn read_chunk_file(&self, path: &Path) -> Result<Vec<u8>, PersistError>;
}

/// Reads chunk files that are already stored decompressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncompressed;

impl Decompressor for Uncompressed {
    fn read_chunk_file(&self, path: &Path) -> Result<Vec<u8>, PersistError> {
        Ok(std::fs::read(path)?)
    }
}
