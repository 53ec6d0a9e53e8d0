pub mod bytes;
pub mod compat;
pub mod decompress;
pub mod error;
pub mod format;
pub mod load;
pub mod physics;
pub mod save;

pub use bytes::{ByteReader, ByteWriter};
pub use decompress::{Decompressor, Uncompressed};
pub use error::PersistError;
pub use format::{ChunkHeader, ChunkRecord};
pub use load::{load_chunk, load_chunk_with};
pub use physics::{PhysicsObject, RecordCodec};
pub use save::{save_chunk, write_chunk};
