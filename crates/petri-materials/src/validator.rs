use std::collections::HashSet;

use petri_core::constants::AIR_MATERIAL_NAME;
use petri_core::types::MaterialId;
use thiserror::Error;

use crate::loader::{MaterialDef, TextureDef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate material ID {0}")]
    DuplicateMaterialId(u32),
    #[error("Duplicate material name '{0}'")]
    DuplicateMaterialName(String),
    #[error("Material '{name}' uses the reserved missing-material ID")]
    ReservedMaterialId { name: String },
    #[error("Material ID {id} has an empty name")]
    EmptyName { id: u32 },
    #[error("Material '{name}' texture {width}x{height} is not power-of-two sized")]
    NonPowerOfTwoTexture { name: String, width: u32, height: u32 },
    #[error("Material '{name}' texture declares {expected} pixels but lists {actual}")]
    PixelCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("No 'air' material defined")]
    MissingAir,
}

/// Validate material definitions before they are built into a registry.
pub fn validate_materials(defs: &[MaterialDef]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();
    for def in defs {
        if !seen_ids.insert(def.id) {
            errors.push(ValidationError::DuplicateMaterialId(def.id));
        }
        if !seen_names.insert(def.name.as_str()) {
            errors.push(ValidationError::DuplicateMaterialName(def.name.clone()));
        }
        if MaterialId(def.id) == MaterialId::MISSING {
            errors.push(ValidationError::ReservedMaterialId {
                name: def.name.clone(),
            });
        }
        if def.name.is_empty() {
            errors.push(ValidationError::EmptyName { id: def.id });
        }

        let (width, height) = def.texture.dimensions();
        if !width.is_power_of_two() || !height.is_power_of_two() {
            errors.push(ValidationError::NonPowerOfTwoTexture {
                name: def.name.clone(),
                width,
                height,
            });
        }
        if let TextureDef::Pixels { pixels, .. } = &def.texture {
            let expected = width as usize * height as usize;
            if pixels.len() != expected {
                errors.push(ValidationError::PixelCountMismatch {
                    name: def.name.clone(),
                    expected,
                    actual: pixels.len(),
                });
            }
        }
    }

    if !seen_names.contains(AIR_MATERIAL_NAME) {
        errors.push(ValidationError::MissingAir);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_material(id: u32, name: &str) -> MaterialDef {
        MaterialDef {
            id,
            name: name.into(),
            texture: TextureDef::Solid(1, 2, 3, 255),
        }
    }

    #[test]
    fn test_valid_set_passes() {
        let defs = vec![make_material(0, "air"), make_material(1, "rock")];
        assert!(validate_materials(&defs).is_ok());
    }

    #[test]
    fn test_duplicates_reported() {
        let defs = vec![
            make_material(0, "air"),
            make_material(1, "rock"),
            make_material(1, "rock"),
        ];
        let errors = validate_materials(&defs).expect_err("duplicates");
        assert!(errors.contains(&ValidationError::DuplicateMaterialId(1)));
        assert!(errors.contains(&ValidationError::DuplicateMaterialName("rock".into())));
    }

    #[test]
    fn test_missing_air_reported() {
        let defs = vec![make_material(1, "rock")];
        let errors = validate_materials(&defs).expect_err("no air");
        assert_eq!(errors, vec![ValidationError::MissingAir]);
    }

    #[test]
    fn test_texture_shape_reported() {
        let mut bad_size = make_material(1, "rock");
        bad_size.texture = TextureDef::Checker {
            size: 12,
            square: 3,
            a: (0, 0, 0, 255),
            b: (255, 255, 255, 255),
        };
        let mut bad_count = make_material(2, "wood");
        bad_count.texture = TextureDef::Pixels {
            width: 2,
            height: 2,
            pixels: vec![0; 5],
        };
        let defs = vec![make_material(0, "air"), bad_size, bad_count];
        let errors = validate_materials(&defs).expect_err("bad textures");
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::NonPowerOfTwoTexture { width: 12, .. }
        ));
        assert!(matches!(
            errors[1],
            ValidationError::PixelCountMismatch { expected: 4, actual: 5, .. }
        ));
    }

    #[test]
    fn test_reserved_id_reported() {
        let defs = vec![make_material(0, "air"), make_material(u32::MAX, "void")];
        let errors = validate_materials(&defs).expect_err("reserved");
        assert!(matches!(errors[0], ValidationError::ReservedMaterialId { .. }));
    }
}
