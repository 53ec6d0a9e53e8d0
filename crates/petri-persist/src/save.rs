use std::io::Write;

use crate::bytes::ByteWriter;
use crate::error::PersistResult;
use crate::format::*;
use crate::load::validate_cells;
use crate::physics::RecordCodec;

/// Serialize a chunk record into the version 24 binary format.
///
/// Layout: header (12B) + cell table (262144B) + material names +
/// custom colors + physics objects + reserved (4B).
pub fn save_chunk<P: RecordCodec>(record: &ChunkRecord<P>) -> PersistResult<Vec<u8>> {
    validate_cells(
        &record.cells,
        record.material_names.len(),
        record.custom_colors.len(),
    )?;

    let names_size: usize = record
        .material_names
        .iter()
        .map(|n| MIN_STRING_SIZE + n.len())
        .sum();
    let mut writer = ByteWriter::with_capacity(
        HEADER_SIZE
            + CELL_TABLE_SIZE
            + 4
            + names_size
            + 4
            + record.custom_colors.len() * CUSTOM_COLOR_SIZE
            + 4
            + record.physics_objects.len() * P::MIN_ENCODED_SIZE
            + 4,
    );

    let header = ChunkHeader::CURRENT;
    writer.write_be_i32(header.version);
    writer.write_be_i32(header.width);
    writer.write_be_i32(header.height);

    writer.write_bytes(&record.cells);

    writer.write_count("material", record.material_names.len())?;
    for name in &record.material_names {
        writer.write_string(name)?;
    }

    writer.write_count("custom color", record.custom_colors.len())?;
    for color in &record.custom_colors {
        writer.write_be_u32(color.packed());
    }

    writer.write_count("physics object", record.physics_objects.len())?;
    for object in &record.physics_objects {
        object.encode(&mut writer)?;
    }

    writer.write_be_i32(record.reserved);

    Ok(writer.finish())
}

/// Serialize a chunk record into an I/O sink. Sink errors propagate unchanged.
pub fn write_chunk<P: RecordCodec, W: Write>(
    sink: &mut W,
    record: &ChunkRecord<P>,
) -> PersistResult<()> {
    let bytes = save_chunk(record)?;
    sink.write_all(&bytes)?;
    Ok(())
}
