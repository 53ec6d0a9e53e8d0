use thiserror::Error;

/// Errors raised while building core value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("texture must be non-empty (got {width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("texture {width}x{height} expects {expected} pixels, got {actual}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("material '{name}' texture {width}x{height} is not power-of-two sized")]
    NonPowerOfTwoTexture {
        name: String,
        width: u32,
        height: u32,
    },
}
