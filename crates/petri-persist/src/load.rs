use petri_core::constants::{CHUNK_HEIGHT, CUSTOM_COLOR_FLAG, MATERIAL_INDEX_MASK};
use petri_core::types::Rgba32;

use crate::bytes::ByteReader;
use crate::compat;
use crate::error::{PersistError, PersistResult};
use crate::format::*;
use crate::physics::{PhysicsObject, RecordCodec};

/// Parse a decompressed chunk using the default physics-object codec.
pub fn load_chunk(bytes: &[u8]) -> PersistResult<ChunkRecord<PhysicsObject>> {
    load_chunk_with(bytes)
}

/// Parse a decompressed chunk, reading physics objects with `P`.
///
/// Decoding is all-or-nothing: any short read, bad count or inconsistent
/// cell table fails the whole chunk. Material names must be UTF-8; a name
/// that is not fails with [`PersistError::InvalidString`].
pub fn load_chunk_with<P: RecordCodec>(bytes: &[u8]) -> PersistResult<ChunkRecord<P>> {
    let mut reader = ByteReader::new(bytes);

    let header = ChunkHeader {
        version: reader.read_be_i32()?,
        width: reader.read_be_i32()?,
        height: reader.read_be_i32()?,
    };
    compat::validate_header(&header)?;

    let cells = reader.read_bytes(CELL_TABLE_SIZE)?.to_vec();

    let material_count = reader.read_count("material", MIN_STRING_SIZE)?;
    let mut material_names = Vec::with_capacity(material_count);
    for _ in 0..material_count {
        material_names.push(reader.read_string()?);
    }

    let color_count = reader.read_count("custom color", CUSTOM_COLOR_SIZE)?;
    let mut custom_colors = Vec::with_capacity(color_count);
    for _ in 0..color_count {
        custom_colors.push(Rgba32::from_packed(reader.read_be_u32()?));
    }

    validate_cells(&cells, material_names.len(), custom_colors.len())?;

    let object_count = reader.read_count("physics object", P::MIN_ENCODED_SIZE)?;
    let mut physics_objects = Vec::with_capacity(object_count);
    for _ in 0..object_count {
        physics_objects.push(P::decode(&mut reader)?);
    }

    let reserved = if reader.remaining() >= 4 {
        reader.read_be_i32()?
    } else {
        0
    };
    if !reader.is_empty() {
        log::debug!("ignoring {} trailing bytes after chunk data", reader.remaining());
    }

    log::debug!(
        "decoded chunk record: {} materials, {} custom colors, {} physics objects",
        material_names.len(),
        custom_colors.len(),
        physics_objects.len()
    );

    Ok(ChunkRecord {
        cells,
        material_names,
        custom_colors,
        physics_objects,
        reserved,
    })
}

/// Check that every cell references an existing material and that flagged
/// cells and stored custom colors pair up one-to-one.
pub(crate) fn validate_cells(
    cells: &[u8],
    material_count: usize,
    color_count: usize,
) -> PersistResult<()> {
    if cells.len() != CELL_TABLE_SIZE {
        return Err(PersistError::InvalidCellTable {
            expected: CELL_TABLE_SIZE,
            actual: cells.len(),
        });
    }

    let mut flagged = 0usize;
    for (i, &packed) in cells.iter().enumerate() {
        if packed & CUSTOM_COLOR_FLAG != 0 {
            flagged += 1;
        }
        let index = packed & MATERIAL_INDEX_MASK;
        if index as usize >= material_count {
            return Err(PersistError::CellMaterialOutOfRange {
                x: i / CHUNK_HEIGHT,
                y: i % CHUNK_HEIGHT,
                index,
                table_len: material_count,
            });
        }
    }

    if flagged != color_count {
        return Err(PersistError::CustomColorCountMismatch {
            flagged,
            stored: color_count,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::ByteWriter;
    use crate::save::save_chunk;

    fn record_with_content() -> ChunkRecord {
        let mut record = ChunkRecord::empty("air");
        record.material_names.push("sand".into());
        record.material_names.push("water".into());
        record.cells[0] = 1;
        record.cells[CHUNK_HEIGHT] = 2 | CUSTOM_COLOR_FLAG;
        record.cells[5] = CUSTOM_COLOR_FLAG;
        // Scan order: (0, 5) comes before (1, 0).
        record.custom_colors = vec![Rgba32::new(1, 2, 3, 4), Rgba32::new(255, 0, 0, 255)];
        record.reserved = 7;
        record
    }

    #[test]
    fn test_load_save_roundtrip() {
        let record = record_with_content();
        let bytes = save_chunk(&record).expect("save");
        let loaded = load_chunk(&bytes).expect("load");
        assert_eq!(loaded, record);
        assert_eq!(save_chunk(&loaded).expect("re-save"), bytes);
    }

    #[test]
    fn test_air_only_exact_length() {
        let record: ChunkRecord = ChunkRecord::empty("air");
        let bytes = save_chunk(&record).expect("save");
        // header + cells + material count + "air" + color count + object count + reserved
        assert_eq!(bytes.len(), 12 + 262_144 + 4 + (4 + 3) + 4 + 4 + 4);
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut bytes = save_chunk(&ChunkRecord::<PhysicsObject>::empty("air")).expect("save");
        bytes[0..4].copy_from_slice(&25i32.to_be_bytes());
        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::UnsupportedVersion(25))
        ));
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let mut bytes = save_chunk(&ChunkRecord::<PhysicsObject>::empty("air")).expect("save");
        bytes[8..12].copy_from_slice(&256i32.to_be_bytes());
        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_truncated_cell_table_rejected() {
        let bytes = save_chunk(&ChunkRecord::<PhysicsObject>::empty("air")).expect("save");
        assert!(matches!(
            load_chunk(&bytes[..1000]),
            Err(PersistError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_truncation_anywhere_fails() {
        let bytes = save_chunk(&record_with_content()).expect("save");
        // Everything before the optional reserved field is mandatory.
        for cut in [0, 11, 12 + 100, bytes.len() - 20, bytes.len() - 9, bytes.len() - 5] {
            assert!(load_chunk(&bytes[..cut]).is_err(), "cut at {cut} should fail");
        }
    }

    #[test]
    fn test_missing_reserved_defaults_to_zero() {
        let mut record = record_with_content();
        record.reserved = 0;
        let bytes = save_chunk(&record).expect("save");
        let loaded = load_chunk(&bytes[..bytes.len() - 4]).expect("load without reserved");
        assert_eq!(loaded.reserved, 0);
        assert_eq!(loaded.material_names, record.material_names);
    }

    #[test]
    fn test_custom_color_count_mismatch_rejected() {
        let mut record = record_with_content();
        record.custom_colors.pop();
        // Build the stream by hand since save_chunk validates too.
        let mut writer = ByteWriter::new();
        writer.write_be_i32(24);
        writer.write_be_i32(512);
        writer.write_be_i32(512);
        writer.write_bytes(&record.cells);
        writer.write_count("material", 3).expect("count");
        for name in &record.material_names {
            writer.write_string(name).expect("name");
        }
        writer.write_count("custom color", 1).expect("count");
        writer.write_be_u32(record.custom_colors[0].packed());
        writer.write_be_i32(0);
        writer.write_be_i32(0);
        let bytes = writer.finish();

        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::CustomColorCountMismatch {
                flagged: 2,
                stored: 1
            })
        ));
    }

    #[test]
    fn test_cell_material_out_of_range_rejected() {
        let mut writer = ByteWriter::new();
        writer.write_be_i32(24);
        writer.write_be_i32(512);
        writer.write_be_i32(512);
        let mut cells = vec![0u8; CELL_TABLE_SIZE];
        cells[CHUNK_HEIGHT * 3 + 4] = 9;
        writer.write_bytes(&cells);
        writer.write_count("material", 1).expect("count");
        writer.write_string("air").expect("name");
        writer.write_be_i32(0);
        writer.write_be_i32(0);
        let bytes = writer.finish();

        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::CellMaterialOutOfRange {
                x: 3,
                y: 4,
                index: 9,
                table_len: 1
            })
        ));
    }

    #[test]
    fn test_negative_material_count_rejected() {
        let mut writer = ByteWriter::new();
        writer.write_be_i32(24);
        writer.write_be_i32(512);
        writer.write_be_i32(512);
        writer.write_bytes(&vec![0u8; CELL_TABLE_SIZE]);
        writer.write_be_i32(-3);
        let bytes = writer.finish();

        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::InvalidCount { count: -3, .. })
        ));
    }

    #[test]
    fn test_non_utf8_material_name_rejected() {
        let mut writer = ByteWriter::new();
        writer.write_be_i32(24);
        writer.write_be_i32(512);
        writer.write_be_i32(512);
        writer.write_bytes(&vec![0u8; CELL_TABLE_SIZE]);
        writer.write_count("material", 2).expect("count");
        writer.write_string("air").expect("name");
        writer.write_be_i32(3);
        writer.write_bytes(&[b'g', 0xFF, b'o']);
        writer.write_be_i32(0);
        writer.write_be_i32(0);
        let bytes = writer.finish();

        assert!(matches!(
            load_chunk(&bytes),
            Err(PersistError::InvalidString { len: 3 })
        ));
    }
}
