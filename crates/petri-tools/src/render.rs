use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};
use petri_core::constants::{CHUNK_HEIGHT, CHUNK_WIDTH};
use petri_world::Raster;

use crate::ToolError;

/// Convert a chunk raster into an image with x to the right and y down.
pub fn raster_to_image(raster: &Raster) -> Result<RgbaImage, ToolError> {
    ImageBuffer::<Rgba<u8>, _>::from_raw(
        CHUNK_WIDTH as u32,
        CHUNK_HEIGHT as u32,
        raster.to_rgba_bytes_row_major(),
    )
    .ok_or(ToolError::RasterSize)
}

/// Write a chunk raster as a PNG.
pub fn save_png(raster: &Raster, path: &Path) -> Result<(), ToolError> {
    let image = raster_to_image(raster)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use petri_core::material::MaterialProvider;
    use petri_core::types::Rgba32;
    use petri_materials::MaterialRegistry;
    use petri_world::Chunk;

    #[test]
    fn test_image_orientation() {
        let registry = MaterialRegistry::builtin().expect("builtin materials");
        let mut chunk = Chunk::new(IVec2::ZERO, &registry);
        chunk
            .set_pixel_colored(300, 2, registry.resolve("rock"), Rgba32::new(9, 8, 7, 255))
            .expect("set");
        chunk.invalidate();

        let image = raster_to_image(chunk.raster()).expect("image");
        assert_eq!(image.dimensions(), (512, 512));
        assert_eq!(image.get_pixel(300, 2), &Rgba([9, 8, 7, 255]));
        assert_eq!(image.get_pixel(2, 300), &Rgba([0, 0, 0, 0]));
    }
}
