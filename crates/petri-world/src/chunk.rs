use std::io::Write;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use petri_core::constants::*;
use petri_core::material::{MaterialDescriptor, MaterialProvider};
use petri_core::math::{cell_index, chunk_local_to_world};
use petri_core::types::{ChunkCoord, Rgba32};
use petri_persist::{ChunkRecord, PersistError, PhysicsObject};

use crate::error::WorldError;
use crate::material_map::MaterialMap;
use crate::raster::{self, Raster};

/// Whether a chunk's raster is ready to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Created but never decoded or invalidated.
    NotReady,
    /// Every cell is air with no custom color; nothing needs uploading.
    ReadyAsAir,
    /// At least one cell draws something.
    ReadyWithContent,
}

/// One grid position's persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Index into the chunk's material table.
    pub material_index: u8,
    /// Explicit color overriding the material texture.
    pub custom_color: Option<Rgba32>,
}

impl Cell {
    pub fn has_custom_color(&self) -> bool {
        self.custom_color.is_some()
    }

    /// Pack into the on-disk byte. Indices above 127 would collide with the
    /// custom-color bit and are rejected.
    pub fn pack(&self) -> Result<u8, PersistError> {
        if self.material_index & !MATERIAL_INDEX_MASK != 0 {
            return Err(PersistError::InvalidCellIndex {
                index: self.material_index,
            });
        }
        let flag = if self.has_custom_color() {
            CUSTOM_COLOR_FLAG
        } else {
            0
        };
        Ok(self.material_index | flag)
    }
}

/// One 512x512 tile of the world.
///
/// Cells, the material table, physics objects and the reserved field are the
/// persisted state. The raster, ready state and world transform are derived.
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkCoord,
    cells: Vec<Cell>,
    materials: MaterialMap,
    raster: Raster,
    physics_objects: Vec<PhysicsObject>,
    reserved: i32,
    ready_state: ReadyState,
    world_transform: Mat4,
}

impl Chunk {
    /// An all-air chunk whose material table holds only the provider's air.
    pub fn new(position: ChunkCoord, provider: &dyn MaterialProvider) -> Self {
        Self {
            position,
            cells: vec![Cell::default(); CELLS_PER_CHUNK],
            materials: MaterialMap::with_air(provider.air()),
            raster: Raster::new(),
            physics_objects: Vec::new(),
            reserved: 0,
            ready_state: ReadyState::NotReady,
            world_transform: Mat4::IDENTITY,
        }
    }

    /// Decode a chunk from decompressed bytes.
    ///
    /// Pure with respect to shared state: safe to call concurrently with the
    /// same provider. On failure no chunk is produced.
    pub fn decode(
        position: ChunkCoord,
        bytes: &[u8],
        provider: &dyn MaterialProvider,
    ) -> Result<Self, WorldError> {
        let record = petri_persist::load_chunk(bytes)?;
        Self::from_record(position, record, provider)
    }

    /// Build a chunk from a parsed record, resolving its material names and
    /// reconstructing the raster in a single scan.
    pub fn from_record(
        position: ChunkCoord,
        record: ChunkRecord,
        provider: &dyn MaterialProvider,
    ) -> Result<Self, WorldError> {
        let resolved = provider.resolve_all(&record.material_names);
        let missing = resolved.iter().filter(|m| m.missing).count();
        if missing > 0 {
            log::warn!(
                "chunk {position}: {missing} of {} materials not recognized",
                resolved.len()
            );
        }
        let materials = MaterialMap::from_resolved(resolved)?;

        let mut cells = Vec::with_capacity(CELLS_PER_CHUNK);
        let mut raster = Raster::new();
        let mut colors = record.custom_colors.iter().copied();
        let mut any_content = false;

        for x in 0..CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                let packed = record.cells[cell_index(x, y)];
                let custom_color = if packed & CUSTOM_COLOR_FLAG != 0 {
                    // Counts were matched against flags when the record was parsed.
                    colors.next()
                } else {
                    None
                };
                let cell = Cell {
                    material_index: packed & MATERIAL_INDEX_MASK,
                    custom_color,
                };

                if cell.has_custom_color() || cell.material_index != AIR_INDEX {
                    any_content = true;
                }

                let world = chunk_local_to_world(position, x, y);
                if let Some(color) = raster::cell_color(&cell, world, &materials) {
                    raster.set(x, y, color);
                }

                cells.push(cell);
            }
        }

        let (ready_state, world_transform) = if any_content {
            (ReadyState::ReadyWithContent, placement_transform(position))
        } else {
            (ReadyState::ReadyAsAir, Mat4::IDENTITY)
        };

        log::debug!(
            "decoded chunk {position}: {} materials, {} physics objects, {:?}",
            materials.len(),
            record.physics_objects.len(),
            ready_state
        );

        Ok(Self {
            position,
            cells,
            materials,
            raster,
            physics_objects: record.physics_objects,
            reserved: record.reserved,
            ready_state,
            world_transform,
        })
    }

    /// Snapshot persisted state as an on-disk record. The raster is not used.
    pub fn to_record(&self) -> Result<ChunkRecord, WorldError> {
        let mut cells = Vec::with_capacity(CELLS_PER_CHUNK);
        let mut custom_colors = Vec::new();
        for cell in &self.cells {
            cells.push(cell.pack()?);
            if let Some(color) = cell.custom_color {
                custom_colors.push(color);
            }
        }

        Ok(ChunkRecord {
            cells,
            material_names: self.materials.names(),
            custom_colors,
            physics_objects: self.physics_objects.clone(),
            reserved: self.reserved,
        })
    }

    /// Serialize persisted state to bytes.
    pub fn encode(&self) -> Result<Vec<u8>, WorldError> {
        Ok(petri_persist::save_chunk(&self.to_record()?)?)
    }

    /// Serialize persisted state into an I/O sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(), WorldError> {
        petri_persist::write_chunk(sink, &self.to_record()?)?;
        Ok(())
    }

    /// Recompute the raster from persisted state after edits.
    ///
    /// Edits never refresh the raster on their own, so a batch of edits costs
    /// a single recompute.
    pub fn invalidate(&mut self) {
        self.raster = raster::reconstruct(self.position, &self.cells, &self.materials);
        self.ready_state = ReadyState::ReadyWithContent;
        self.world_transform = placement_transform(self.position);
    }

    /// Set a cell to `material`, clearing any custom color.
    pub fn set_pixel(
        &mut self,
        x: usize,
        y: usize,
        material: Arc<MaterialDescriptor>,
    ) -> Result<(), WorldError> {
        self.write_cell(x, y, material, None)
    }

    /// Set a cell to `material` drawn with an explicit color.
    pub fn set_pixel_colored(
        &mut self,
        x: usize,
        y: usize,
        material: Arc<MaterialDescriptor>,
        color: Rgba32,
    ) -> Result<(), WorldError> {
        self.write_cell(x, y, material, Some(color))
    }

    /// Material of the cell at `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&Arc<MaterialDescriptor>> {
        let cell = self.cell(x, y)?;
        self.materials.get(cell.material_index)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= CHUNK_WIDTH || y >= CHUNK_HEIGHT {
            return None;
        }
        Some(&self.cells[cell_index(x, y)])
    }

    fn write_cell(
        &mut self,
        x: usize,
        y: usize,
        material: Arc<MaterialDescriptor>,
        custom_color: Option<Rgba32>,
    ) -> Result<(), WorldError> {
        if x >= CHUNK_WIDTH || y >= CHUNK_HEIGHT {
            return Err(WorldError::CellOutOfBounds { x, y });
        }
        let material_index = self.materials.intern(material)?;
        self.cells[cell_index(x, y)] = Cell {
            material_index,
            custom_color,
        };
        Ok(())
    }

    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn materials(&self) -> &MaterialMap {
        &self.materials
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn physics_objects(&self) -> &[PhysicsObject] {
        &self.physics_objects
    }

    pub fn reserved(&self) -> i32 {
        self.reserved
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Transform placing a unit quad over this chunk in world pixels.
    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    /// Number of cells carrying a custom color.
    pub fn custom_color_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_custom_color()).count()
    }
}

/// Scale a unit quad to chunk size and move it to the chunk's world origin.
fn placement_transform(position: ChunkCoord) -> Mat4 {
    let size = Vec3::new(CHUNK_WIDTH as f32, CHUNK_HEIGHT as f32, 1.0);
    let origin = Vec3::new(
        position.x as f32 * CHUNK_WIDTH as f32,
        position.y as f32 * CHUNK_HEIGHT as f32,
        0.0,
    );
    Mat4::from_translation(origin) * Mat4::from_scale(size)
}
