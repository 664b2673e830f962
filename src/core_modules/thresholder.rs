// THEORY:
// The `Thresholder` is the first stage of the pipeline: it collapses the RGBA
// image into a binary foreground mask. The classification is deliberately
// crude: the unweighted mean of the red, green and blue channels is compared
// against a single luminance threshold, and alpha is ignored entirely. Sprites
// drawn on a near-white background are darker than the background, so a pixel
// is foreground when its mean falls *below* the threshold. Raising the
// threshold therefore classifies more pixels as foreground, which reads to the
// user as higher sensitivity to near-white pixels.
//
// The stage is a stateless utility: same input, same output, no side effects.

use crate::core_modules::mask::BinaryMask;
use crate::core_modules::pixel_buffer::PixelBuffer;

pub mod thresholder {
    use super::*;

    /// Classifies every pixel of `source` as foreground (1) or background (0).
    /// A pixel is foreground iff mean(r, g, b) < `threshold`.
    pub fn foreground_mask(source: &PixelBuffer, threshold: u8) -> BinaryMask {
        let mut mask = BinaryMask::new(source.width(), source.height());

        for y in 0..source.height() {
            for x in 0..source.width() {
                let [r, g, b, _a] = source.rgba(x, y);
                let mean = (r as u32 + g as u32 + b as u32) / 3;
                if mean < threshold as u32 {
                    mask.set_at(x, y, 1);
                }
            }
        }

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::thresholder::foreground_mask;
    use super::*;

    fn uniform_buffer(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set_rgba(x, y, rgba);
            }
        }
        buffer
    }

    #[test]
    fn dark_pixels_are_foreground() {
        let buffer = uniform_buffer(3, 3, [0, 0, 0, 255]);
        let mask = foreground_mask(&buffer, 200);
        assert_eq!(mask.foreground_count(), 9);
    }

    #[test]
    fn background_at_or_above_threshold_is_rejected() {
        // mean == threshold must NOT be foreground (strictly less-than).
        let buffer = uniform_buffer(2, 2, [200, 200, 200, 255]);
        let mask = foreground_mask(&buffer, 200);
        assert_eq!(mask.foreground_count(), 0);
    }

    #[test]
    fn channel_mean_is_unweighted() {
        // (255 + 0 + 0) / 3 = 85: foreground at 86, background at 85.
        let buffer = uniform_buffer(1, 1, [255, 0, 0, 255]);
        assert_eq!(foreground_mask(&buffer, 86).foreground_count(), 1);
        assert_eq!(foreground_mask(&buffer, 85).foreground_count(), 0);
    }

    #[test]
    fn alpha_is_ignored() {
        // Fully transparent black still counts as dark.
        let buffer = uniform_buffer(2, 1, [0, 0, 0, 0]);
        let mask = foreground_mask(&buffer, 128);
        assert_eq!(mask.foreground_count(), 2);
    }
}
