/// Errors that can occur while reading or writing chunk data.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("unexpected end of data: needed {requested} bytes, {available} available")]
    UnexpectedEof { requested: usize, available: usize },

    #[error("unsupported chunk format version {0} (expected 24)")]
    UnsupportedVersion(i32),

    #[error("invalid chunk dimensions {width}x{height} (expected 512x512)")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("invalid {what} count {count}")]
    InvalidCount { what: &'static str, count: i64 },

    #[error("string is not valid UTF-8 ({len} bytes)")]
    InvalidString { len: usize },

    #[error("cell material index {index} does not fit in 7 bits")]
    InvalidCellIndex { index: u8 },

    #[error("cell table has {actual} entries (expected {expected})")]
    InvalidCellTable { expected: usize, actual: usize },

    #[error("cell ({x}, {y}) references material {index} but the table has {table_len} entries")]
    CellMaterialOutOfRange {
        x: usize,
        y: usize,
        index: u8,
        table_len: usize,
    },

    #[error("{flagged} cells are flagged custom-colored but {stored} custom colors are stored")]
    CustomColorCountMismatch { flagged: usize, stored: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;
