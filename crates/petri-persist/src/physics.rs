use petri_core::types::Rgba32;

use crate::bytes::{ByteReader, ByteWriter};
use crate::error::{PersistError, PersistResult};

/// A record stored verbatim in a chunk stream.
///
/// Chunk decoding does not interpret records; it only needs to read and write
/// them in place.
pub trait RecordCodec: Sized {
    /// Smallest encoded size, used to bound counts before allocating.
    const MIN_ENCODED_SIZE: usize;

    fn decode(reader: &mut ByteReader<'_>) -> PersistResult<Self>;

    fn encode(&self, writer: &mut ByteWriter) -> PersistResult<()>;
}

/// A rigid physics body embedded in a chunk.
///
/// Layout (big-endian):
///
/// ```text
/// u64 id | u32 material | f32 x, y, rotation | f64 unknown[5]
/// u8 flags[5] | f32 unknown_f32 | i32 width, height
/// u32 packed_rgba[width * height]   (x outer, y inner)
/// ```
///
/// Fields whose meaning is not known are kept raw so that encoding
/// reproduces the input exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsObject {
    pub id: u64,
    pub material: u32,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub unknown_f64: [f64; 5],
    pub flags: [u8; 5],
    pub unknown_f32: f32,
    pub width: u32,
    pub height: u32,
    /// `width * height` colors in x-outer, y-inner order.
    pub pixels: Vec<Rgba32>,
}

impl RecordCodec for PhysicsObject {
    const MIN_ENCODED_SIZE: usize = 8 + 4 + 3 * 4 + 5 * 8 + 5 + 4 + 2 * 4;

    fn decode(reader: &mut ByteReader<'_>) -> PersistResult<Self> {
        let id = reader.read_be_u64()?;
        let material = reader.read_be_u32()?;
        let x = reader.read_be_f32()?;
        let y = reader.read_be_f32()?;
        let rotation = reader.read_be_f32()?;

        let mut unknown_f64 = [0.0; 5];
        for value in &mut unknown_f64 {
            *value = reader.read_be_f64()?;
        }

        let mut flags = [0u8; 5];
        for flag in &mut flags {
            *flag = reader.read_u8()?;
        }

        let unknown_f32 = reader.read_be_f32()?;
        let width = reader.read_count("physics object width", 0)?;
        let height = reader.read_count("physics object height", 0)?;

        let pixel_count = width.checked_mul(height).ok_or(PersistError::InvalidCount {
            what: "physics object pixel",
            count: i64::MAX,
        })?;
        if pixel_count.saturating_mul(4) > reader.remaining() {
            return Err(PersistError::UnexpectedEof {
                requested: pixel_count.saturating_mul(4),
                available: reader.remaining(),
            });
        }

        let mut pixels = Vec::with_capacity(pixel_count);
        for _ in 0..pixel_count {
            pixels.push(Rgba32::from_packed(reader.read_be_u32()?));
        }

        Ok(Self {
            id,
            material,
            x,
            y,
            rotation,
            unknown_f64,
            flags,
            unknown_f32,
            width: width as u32,
            height: height as u32,
            pixels,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) -> PersistResult<()> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(PersistError::InvalidCount {
                what: "physics object pixel",
                count: self.pixels.len() as i64,
            });
        }

        writer.write_be_u64(self.id);
        writer.write_be_u32(self.material);
        writer.write_be_f32(self.x);
        writer.write_be_f32(self.y);
        writer.write_be_f32(self.rotation);
        for value in self.unknown_f64 {
            writer.write_be_f64(value);
        }
        writer.write_bytes(&self.flags);
        writer.write_be_f32(self.unknown_f32);
        writer.write_count("physics object width", self.width as usize)?;
        writer.write_count("physics object height", self.height as usize)?;
        for pixel in &self.pixels {
            writer.write_be_u32(pixel.packed());
        }
        Ok(())
    }
}
