use std::collections::HashMap;
use std::sync::Arc;

use petri_core::constants::AIR_MATERIAL_NAME;
use petri_core::error::CoreError;
use petri_core::material::{MaterialDescriptor, MaterialProvider, MaterialTexture};
use petri_core::types::MaterialId;
use thiserror::Error;

use crate::loader::{load_all_materials, LoadError, MaterialDef};
use crate::validator::{validate_materials, ValidationError};

const BUILTIN_MATERIALS: &str = include_str!("../data/materials.ron");

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{} invalid material definitions", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error("Material '{name}' texture could not be built: {source}")]
    Texture { name: String, source: CoreError },
}

/// Name-keyed material lookup built from RON definitions.
///
/// Read-only once built, so one registry can serve every loader thread.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    by_name: HashMap<String, Arc<MaterialDescriptor>>,
    air: Arc<MaterialDescriptor>,
}

impl MaterialRegistry {
    /// The material set shipped with the crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::builtin_with(&[])
    }

    /// The built-in set followed by extra RON sources.
    pub fn builtin_with(extra_sources: &[&str]) -> Result<Self, RegistryError> {
        let mut sources = vec![BUILTIN_MATERIALS];
        sources.extend_from_slice(extra_sources);
        Self::from_sources(&sources)
    }

    /// Parse, merge and validate RON sources in order.
    pub fn from_sources(sources: &[&str]) -> Result<Self, RegistryError> {
        let defs = load_all_materials(sources)?;
        Self::from_defs(&defs)
    }

    pub fn from_defs(defs: &[MaterialDef]) -> Result<Self, RegistryError> {
        validate_materials(defs).map_err(RegistryError::Invalid)?;

        let mut by_name = HashMap::with_capacity(defs.len());
        for def in defs {
            let texture = def
                .texture
                .build()
                .map_err(|source| RegistryError::Texture {
                    name: def.name.clone(),
                    source,
                })?;
            let descriptor =
                MaterialDescriptor::known(MaterialId(def.id), def.name.as_str(), Arc::new(texture))
                    .map_err(|source| RegistryError::Texture {
                        name: def.name.clone(),
                        source,
                    })?;
            by_name.insert(def.name.clone(), Arc::new(descriptor));
        }

        // Validation guarantees air is present.
        let air = match by_name.get(AIR_MATERIAL_NAME) {
            Some(air) => air.clone(),
            None => return Err(RegistryError::Invalid(vec![ValidationError::MissingAir])),
        };

        log::debug!("material registry built with {} materials", by_name.len());
        Ok(Self { by_name, air })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<MaterialDescriptor>> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn texture(&self, name: &str) -> Option<&Arc<MaterialTexture>> {
        self.by_name.get(name).map(|m| &m.texture)
    }
}

impl MaterialProvider for MaterialRegistry {
    fn resolve(&self, name: &str) -> Arc<MaterialDescriptor> {
        match self.by_name.get(name) {
            Some(material) => material.clone(),
            None => Arc::new(MaterialDescriptor::missing(name)),
        }
    }

    fn air(&self) -> Arc<MaterialDescriptor> {
        self.air.clone()
    }
}
