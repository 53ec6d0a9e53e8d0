//! RON-configured material definitions and the registry that resolves
//! chunk material names against them.

pub mod loader;
pub mod registry;
pub mod validator;

pub use loader::{load_all_materials, load_materials_from_str, LoadError, MaterialDef, TextureDef};
pub use registry::{MaterialRegistry, RegistryError};
pub use validator::{validate_materials, ValidationError};
