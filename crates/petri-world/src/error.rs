use petri_persist::PersistError;

/// Errors raised while decoding, editing or encoding a chunk.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("chunk format error: {0}")]
    Persist(#[from] PersistError),

    #[error("chunk material table is full ({capacity} entries)")]
    MaterialTableFull { capacity: usize },

    #[error("cell ({x}, {y}) is outside the chunk")]
    CellOutOfBounds { x: usize, y: usize },
}
