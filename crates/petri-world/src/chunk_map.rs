use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petri_core::material::MaterialDescriptor;
use petri_core::math::{world_to_chunk, world_to_local};
use petri_core::types::{ChunkCoord, Rgba32, WorldPixel};

use crate::chunk::{Chunk, ReadyState};
use crate::error::WorldError;
use crate::streaming::ChunkLoader;

/// Errors from world-pixel addressed edits.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("no chunk loaded at {0}")]
    ChunkNotLoaded(ChunkCoord),

    #[error(transparent)]
    World(#[from] WorldError),
}

/// All loaded chunks, keyed by grid position.
///
/// Owned by a single thread; decoded chunks arrive through
/// [`ChunkMap::integrate`].
#[derive(Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Chunks edited since their raster was last rebuilt.
    dirty: HashSet<ChunkCoord>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chunk at its own position, returning any chunk it replaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let position = chunk.position();
        self.dirty.remove(&position);
        self.chunks.insert(position, chunk)
    }

    pub fn remove(&mut self, position: ChunkCoord) -> Option<Chunk> {
        self.dirty.remove(&position);
        self.chunks.remove(&position)
    }

    /// Move every chunk the loader has finished into the map.
    pub fn integrate(&mut self, loader: &ChunkLoader) -> usize {
        let mut count = 0;
        for chunk in loader.finished() {
            if let Some(old) = self.insert(chunk) {
                log::debug!("replaced chunk {}", old.position());
            }
            count += 1;
        }
        count
    }

    pub fn get(&self, position: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn get_mut(&mut self, position: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    pub fn contains(&self, position: ChunkCoord) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get counts: (not_ready, ready_as_air, ready_with_content)
    pub fn chunk_counts(&self) -> (usize, usize, usize) {
        let mut not_ready = 0;
        let mut air = 0;
        let mut content = 0;
        for chunk in self.chunks.values() {
            match chunk.ready_state() {
                ReadyState::NotReady => not_ready += 1,
                ReadyState::ReadyAsAir => air += 1,
                ReadyState::ReadyWithContent => content += 1,
            }
        }
        (not_ready, air, content)
    }

    /// Set the cell under a world pixel. The owning chunk is marked dirty.
    pub fn set_pixel(
        &mut self,
        world: WorldPixel,
        material: Arc<MaterialDescriptor>,
    ) -> Result<(), EditError> {
        let (position, x, y) = locate(world);
        let chunk = self
            .chunks
            .get_mut(&position)
            .ok_or(EditError::ChunkNotLoaded(position))?;
        chunk.set_pixel(x, y, material)?;
        self.dirty.insert(position);
        Ok(())
    }

    pub fn set_pixel_colored(
        &mut self,
        world: WorldPixel,
        material: Arc<MaterialDescriptor>,
        color: Rgba32,
    ) -> Result<(), EditError> {
        let (position, x, y) = locate(world);
        let chunk = self
            .chunks
            .get_mut(&position)
            .ok_or(EditError::ChunkNotLoaded(position))?;
        chunk.set_pixel_colored(x, y, material, color)?;
        self.dirty.insert(position);
        Ok(())
    }

    /// Material under a world pixel, if its chunk is loaded.
    pub fn get_pixel(&self, world: WorldPixel) -> Option<&Arc<MaterialDescriptor>> {
        let (position, x, y) = locate(world);
        self.chunks.get(&position)?.get_pixel(x, y)
    }

    pub fn is_dirty(&self, position: ChunkCoord) -> bool {
        self.dirty.contains(&position)
    }

    /// Rebuild the raster of every edited chunk. Returns how many were rebuilt.
    pub fn invalidate_dirty(&mut self) -> usize {
        let mut rebuilt = 0;
        for position in self.dirty.drain() {
            if let Some(chunk) = self.chunks.get_mut(&position) {
                chunk.invalidate();
                rebuilt += 1;
            }
        }
        rebuilt
    }
}

fn locate(world: WorldPixel) -> (ChunkCoord, usize, usize) {
    let (x, y) = world_to_local(world);
    (world_to_chunk(world), x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use petri_core::material::MaterialProvider;
    use petri_materials::MaterialRegistry;
    use petri_persist::{ChunkRecord, PhysicsObject};

    fn registry() -> Arc<MaterialRegistry> {
        Arc::new(MaterialRegistry::builtin().expect("builtin materials"))
    }

    #[test]
    fn test_world_pixel_routes_to_owning_chunk() {
        let registry = registry();
        let mut map = ChunkMap::new();
        map.insert(Chunk::new(IVec2::new(-1, 0), registry.as_ref()));
        map.insert(Chunk::new(IVec2::new(0, 0), registry.as_ref()));

        let sand = registry.resolve("sand");
        map.set_pixel(IVec2::new(-1, 3), sand.clone()).expect("set");

        let west = map.get(IVec2::new(-1, 0)).expect("west chunk");
        assert_eq!(west.get_pixel(511, 3), Some(&sand));
        let east = map.get(IVec2::ZERO).expect("east chunk");
        assert_eq!(east.get_pixel(0, 3).expect("air").name, "air");

        assert_eq!(map.get_pixel(IVec2::new(-1, 3)), Some(&sand));
        assert!(map.is_dirty(IVec2::new(-1, 0)));
        assert!(!map.is_dirty(IVec2::ZERO));
    }

    #[test]
    fn test_edit_unloaded_chunk() {
        let registry = registry();
        let mut map = ChunkMap::new();
        let result = map.set_pixel(IVec2::new(5000, 5000), registry.resolve("sand"));
        assert!(matches!(result, Err(EditError::ChunkNotLoaded(p)) if p == IVec2::new(9, 9)));
        assert!(map.get_pixel(IVec2::new(5000, 5000)).is_none());
    }

    #[test]
    fn test_invalidate_dirty_updates_counts() {
        let registry = registry();
        let mut map = ChunkMap::new();
        map.insert(Chunk::new(IVec2::ZERO, registry.as_ref()));
        map.insert(Chunk::new(IVec2::new(1, 0), registry.as_ref()));
        assert_eq!(map.chunk_counts(), (2, 0, 0));

        map.set_pixel_colored(IVec2::new(2, 2), registry.resolve("rock"), Rgba32::new(1, 2, 3, 4))
            .expect("set");
        assert_eq!(map.invalidate_dirty(), 1);
        assert_eq!(map.invalidate_dirty(), 0);
        assert_eq!(map.chunk_counts(), (1, 0, 1));

        let chunk = map.get(IVec2::ZERO).expect("chunk");
        assert_eq!(chunk.raster().get(2, 2), Some(Rgba32::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_integrate_drains_loader() {
        let registry = registry();
        let loader = ChunkLoader::new(registry);
        let record: ChunkRecord<PhysicsObject> = ChunkRecord::empty("air");
        let bytes = petri_persist::save_chunk(&record).expect("save");
        for x in 0..3 {
            loader.load_bytes(IVec2::new(x, 0), &bytes).expect("load");
        }

        let mut map = ChunkMap::new();
        assert_eq!(map.integrate(&loader), 3);
        assert_eq!(map.len(), 3);
        assert_eq!(map.chunk_counts(), (0, 3, 0));
        assert_eq!(map.integrate(&loader), 0);
    }
}
