pub mod constants;
pub mod error;
pub mod material;
pub mod math;
pub mod types;

pub use error::CoreError;
pub use material::{MaterialDescriptor, MaterialProvider, MaterialTexture};
pub use types::{ChunkCoord, MaterialId, Rgba32, WorldPixel};
