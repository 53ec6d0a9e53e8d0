use std::collections::HashMap;
use std::sync::Arc;

use petri_core::constants::{MAX_ADDRESSABLE_MATERIALS, MAX_CHUNK_MATERIALS};
use petri_core::material::MaterialDescriptor;
use petri_core::types::MaterialId;

use crate::error::WorldError;

/// A chunk's local material table plus its reverse index.
///
/// Entries are append-only: a cell's material index is a position in this
/// table, so nothing is ever removed or reordered. The reverse index maps a
/// recognized material's canonical id to its slot; missing placeholders are
/// never registered in it.
#[derive(Debug, Clone, Default)]
pub struct MaterialMap {
    entries: Vec<Arc<MaterialDescriptor>>,
    reverse: HashMap<MaterialId, u8>,
}

impl MaterialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-entry table holding `air` at slot 0.
    pub fn with_air(air: Arc<MaterialDescriptor>) -> Self {
        let mut reverse = HashMap::new();
        if !air.missing {
            reverse.insert(air.id, 0);
        }
        Self {
            entries: vec![air],
            reverse,
        }
    }

    /// Build from a resolved name table, keeping table order.
    ///
    /// If two entries share a canonical id the first one owns the reverse slot.
    pub fn from_resolved(materials: Vec<Arc<MaterialDescriptor>>) -> Result<Self, WorldError> {
        if materials.len() > MAX_CHUNK_MATERIALS {
            return Err(WorldError::MaterialTableFull {
                capacity: MAX_CHUNK_MATERIALS,
            });
        }

        let mut reverse = HashMap::with_capacity(materials.len());
        for (slot, material) in materials.iter().enumerate() {
            if !material.missing {
                reverse.entry(material.id).or_insert(slot as u8);
            }
        }

        Ok(Self {
            entries: materials,
            reverse,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slot: u8) -> Option<&Arc<MaterialDescriptor>> {
        self.entries.get(slot as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MaterialDescriptor>> {
        self.entries.iter()
    }

    /// Names in table order, as written to disk.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|m| m.name.clone()).collect()
    }

    /// Slot registered for a canonical material id.
    pub fn reverse_lookup(&self, id: MaterialId) -> Option<u8> {
        self.reverse.get(&id).copied()
    }

    /// Slot already holding `material`, compared by value.
    pub fn slot_of(&self, material: &MaterialDescriptor) -> Option<u8> {
        if !material.missing {
            if let Some(slot) = self.reverse_lookup(material.id) {
                if *self.entries[slot as usize] == *material {
                    return Some(slot);
                }
            }
        }
        self.entries
            .iter()
            .position(|m| **m == *material)
            .map(|i| i as u8)
    }

    /// Return the slot for `material`, appending it if the table lacks it.
    ///
    /// Only the first 128 slots fit in a packed cell, so a material that
    /// would land past them is rejected instead of producing an unsavable
    /// cell.
    pub fn intern(&mut self, material: Arc<MaterialDescriptor>) -> Result<u8, WorldError> {
        let full = WorldError::MaterialTableFull {
            capacity: MAX_ADDRESSABLE_MATERIALS,
        };
        if let Some(slot) = self.slot_of(&material) {
            if (slot as usize) < MAX_ADDRESSABLE_MATERIALS {
                return Ok(slot);
            }
            return Err(full);
        }

        if self.entries.len() >= MAX_ADDRESSABLE_MATERIALS {
            return Err(full);
        }

        let slot = self.entries.len() as u8;
        if !material.missing {
            self.reverse.entry(material.id).or_insert(slot);
        }
        self.entries.push(material);
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::material::MaterialTexture;
    use petri_core::types::Rgba32;

    fn known(id: u32, name: &str) -> Arc<MaterialDescriptor> {
        let tex = Arc::new(MaterialTexture::solid(4, 4, Rgba32::new(1, 2, 3, 255)).expect("tex"));
        Arc::new(MaterialDescriptor::known(MaterialId(id), name, tex).expect("known"))
    }

    #[test]
    fn test_from_resolved_skips_missing_in_reverse() {
        let map = MaterialMap::from_resolved(vec![
            known(0, "air"),
            Arc::new(MaterialDescriptor::missing("goo")),
            known(7, "sand"),
        ])
        .expect("map");
        assert_eq!(map.len(), 3);
        assert_eq!(map.reverse_lookup(MaterialId(0)), Some(0));
        assert_eq!(map.reverse_lookup(MaterialId(7)), Some(2));
        assert_eq!(map.reverse_lookup(MaterialId::MISSING), None);
    }

    #[test]
    fn test_duplicate_ids_first_writer_wins() {
        let map = MaterialMap::from_resolved(vec![known(0, "air"), known(3, "rock"), known(3, "rock")])
            .expect("map");
        assert_eq!(map.reverse_lookup(MaterialId(3)), Some(1));
    }

    #[test]
    fn test_intern_deduplicates() {
        let mut map = MaterialMap::from_resolved(vec![known(0, "air")]).expect("map");
        let sand = known(5, "sand");
        let water = known(6, "water");
        assert_eq!(map.intern(sand.clone()).expect("intern"), 1);
        assert_eq!(map.intern(sand.clone()).expect("intern"), 1);
        assert_eq!(map.intern(water).expect("intern"), 2);
        assert_eq!(map.intern(sand).expect("intern"), 1);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_intern_missing_by_value() {
        let mut map = MaterialMap::from_resolved(vec![known(0, "air")]).expect("map");
        let a = map.intern(Arc::new(MaterialDescriptor::missing("goo"))).expect("intern");
        let b = map.intern(Arc::new(MaterialDescriptor::missing("goo"))).expect("intern");
        let c = map.intern(Arc::new(MaterialDescriptor::missing("ooze"))).expect("intern");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_intern_overflow_rejected() {
        let mut map = MaterialMap::new();
        for id in 0..MAX_ADDRESSABLE_MATERIALS as u32 {
            map.intern(known(id, &format!("m{id}"))).expect("fits");
        }
        assert_eq!(map.len(), 128);
        let result = map.intern(known(9999, "one_too_many"));
        assert!(matches!(
            result,
            Err(WorldError::MaterialTableFull { capacity: 128 })
        ));
        assert_eq!(map.len(), 128);
        // Existing entries still resolve.
        assert_eq!(map.intern(known(3, "m3")).expect("existing"), 3);
    }

    #[test]
    fn test_intern_rejects_unaddressable_stored_slot() {
        let materials = (0..200).map(|id| known(id, &format!("m{id}"))).collect();
        let mut map = MaterialMap::from_resolved(materials).expect("stored table");
        assert_eq!(map.len(), 200);
        assert_eq!(map.intern(known(127, "m127")).expect("addressable"), 127);
        assert!(matches!(
            map.intern(known(150, "m150")),
            Err(WorldError::MaterialTableFull { capacity: 128 })
        ));
        assert_eq!(map.len(), 200);
    }

    #[test]
    fn test_with_air_single_entry() {
        let map = MaterialMap::with_air(known(0, "air"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.reverse_lookup(MaterialId(0)), Some(0));

        let map = MaterialMap::with_air(Arc::new(MaterialDescriptor::missing("air")));
        assert_eq!(map.names(), vec!["air".to_string()]);
        assert_eq!(map.reverse_lookup(MaterialId::MISSING), None);
    }

    #[test]
    fn test_from_resolved_overflow_rejected() {
        let materials = (0..257).map(|id| known(id, &format!("m{id}"))).collect();
        assert!(matches!(
            MaterialMap::from_resolved(materials),
            Err(WorldError::MaterialTableFull { .. })
        ));
    }
}
