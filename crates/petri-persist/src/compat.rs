use crate::format::ChunkHeader;
use crate::error::PersistError;

/// Validate a chunk header.
///
/// Any version or dimension mismatch is fatal: this codec targets exactly
/// version 24 at 512x512.
pub fn validate_header(header: &ChunkHeader) -> Result<(), PersistError> {
    if header.version != ChunkHeader::CURRENT.version {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    if header.width != ChunkHeader::CURRENT.width || header.height != ChunkHeader::CURRENT.height {
        return Err(PersistError::InvalidDimensions {
            width: header.width,
            height: header.height,
        });
    }

    Ok(())
}
