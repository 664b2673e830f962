// THEORY:
// The `extractor` turns one retained region into an independent output image.
// It is the only stage that reads color data again after the thresholder: RGB
// comes from the original pixel buffer, while the alpha channel is decided
// entirely by the solid object mask, never by the (inflated) detection mask.
//
// Each destination pixel maps back to a source coordinate by subtracting the
// padding offset and adding the bounding box origin. Three cases:
//   - in bounds and solid: copy RGB, alpha 255;
//   - in bounds and not solid: fully transparent, color left zeroed;
//   - out of bounds (a bounding box touching the image edge, with padding
//     reaching past it): no write at all, the pixel stays transparent.
// The out-of-bounds case is deliberately not clamped; the source rectangle is
// allowed to hang off the image and the overhang simply stays empty.

use crate::core_modules::labeler::Region;
use crate::core_modules::mask::BinaryMask;
use crate::core_modules::pixel_buffer::PixelBuffer;

/// One finished output asset: the encoded image bytes plus the metadata the
/// caller needs to place it back into the source sheet. Immutable once built.
#[derive(Debug, Clone)]
pub struct ProcessedAsset {
    /// Encoded image bytes, ready to be written to disk or zipped.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Top-left corner in the original image, padding already subtracted.
    /// Negative when the padding extends past the source's top or left edge.
    pub original_x: i32,
    pub original_y: i32,
    /// `asset_<n>.png`, where n is the 1-based output position.
    pub filename: String,
}

pub mod extractor {
    use super::*;

    /// Renders a region into its own RGBA buffer of
    /// (bbox width + 2 * padding) x (bbox height + 2 * padding) pixels.
    /// Returns `None` when either output dimension would be empty.
    pub fn render_region(
        region: &Region,
        padding: u32,
        source: &PixelBuffer,
        solid: &BinaryMask,
    ) -> Option<PixelBuffer> {
        let out_width = region.width() + 2 * padding;
        let out_height = region.height() + 2 * padding;
        if out_width == 0 || out_height == 0 {
            return None;
        }

        let mut output = PixelBuffer::new(out_width, out_height);
        let source_width = source.width() as i64;
        let source_height = source.height() as i64;

        for dy in 0..out_height {
            for dx in 0..out_width {
                let sx = region.min_x as i64 + dx as i64 - padding as i64;
                let sy = region.min_y as i64 + dy as i64 - padding as i64;
                if sx < 0 || sx >= source_width || sy < 0 || sy >= source_height {
                    continue;
                }
                if solid.get(sx as u32, sy as u32) == 1 {
                    let [r, g, b, _a] = source.rgba(sx as u32, sy as u32);
                    output.set_rgba(dx, dy, [r, g, b, 255]);
                }
            }
        }

        Some(output)
    }

    /// The top-left corner of a rendered region within the original image:
    /// bounding box minimum minus the padding.
    pub fn original_offset(region: &Region, padding: u32) -> (i32, i32) {
        (
            region.min_x as i32 - padding as i32,
            region.min_y as i32 - padding as i32,
        )
    }

    /// The generated filename for the asset at 1-based output `position`.
    pub fn asset_filename(position: usize) -> String {
        format!("asset_{position}.png")
    }
}
