use std::path::Path;

use petri_core::constants::AIR_INDEX;
use petri_core::types::MaterialId;
use petri_world::{Chunk, ReadyState};

/// One entry of a chunk's material table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaterialEntry {
    pub slot: u8,
    pub id: MaterialId,
    pub name: String,
    pub missing: bool,
}

/// Summary of a decoded chunk, as printed by `chunk-tool info`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChunkReport {
    pub position: [i32; 2],
    pub ready_state: String,
    pub materials: Vec<MaterialEntry>,
    pub non_air_cells: usize,
    pub custom_color_count: usize,
    pub physics_object_count: usize,
    pub reserved: i32,
}

impl ChunkReport {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let materials = chunk
            .materials()
            .iter()
            .enumerate()
            .map(|(slot, m)| MaterialEntry {
                slot: slot as u8,
                id: m.id,
                name: m.name.clone(),
                missing: m.missing,
            })
            .collect();

        let ready_state = match chunk.ready_state() {
            ReadyState::NotReady => "not_ready",
            ReadyState::ReadyAsAir => "air",
            ReadyState::ReadyWithContent => "content",
        };

        Self {
            position: chunk.position().to_array(),
            ready_state: ready_state.to_string(),
            materials,
            non_air_cells: chunk
                .cells()
                .iter()
                .filter(|c| c.material_index != AIR_INDEX)
                .count(),
            custom_color_count: chunk.custom_color_count(),
            physics_object_count: chunk.physics_objects().len(),
            reserved: chunk.reserved(),
        }
    }

    /// Names the loaded material set did not recognize.
    pub fn missing_materials(&self) -> impl Iterator<Item = &str> {
        self.materials
            .iter()
            .filter(|m| m.missing)
            .map(|m| m.name.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Save a report to a JSON file.
pub fn save_report(path: &Path, report: &ChunkReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = report.to_json().map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use petri_core::material::MaterialProvider;
    use petri_core::types::Rgba32;
    use petri_materials::MaterialRegistry;

    #[test]
    fn test_report_counts() {
        let registry = MaterialRegistry::builtin().expect("builtin materials");
        let mut chunk = Chunk::new(IVec2::new(-2, 7), &registry);
        chunk.set_pixel(0, 0, registry.resolve("sand")).expect("set");
        chunk
            .set_pixel_colored(0, 1, registry.resolve("mystery_ooze"), Rgba32::new(1, 2, 3, 4))
            .expect("set");
        chunk.invalidate();

        let report = ChunkReport::from_chunk(&chunk);
        assert_eq!(report.position, [-2, 7]);
        assert_eq!(report.ready_state, "content");
        assert_eq!(report.non_air_cells, 2);
        assert_eq!(report.custom_color_count, 1);
        assert_eq!(report.materials.len(), 3);
        assert_eq!(report.missing_materials().collect::<Vec<_>>(), vec!["mystery_ooze"]);
    }

    #[test]
    fn test_report_json_roundtrip() {
        let registry = MaterialRegistry::builtin().expect("builtin materials");
        let chunk = Chunk::new(IVec2::ZERO, &registry);
        let report = ChunkReport::from_chunk(&chunk);
        let json = report.to_json().expect("json");
        assert!(json.contains("\"ready_state\": \"not_ready\""));
        let parsed: ChunkReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, report);
    }
}
