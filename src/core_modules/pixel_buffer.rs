// THEORY:
// The `PixelBuffer` is the immutable source of truth for color data throughout
// the pipeline. Every stage that needs color (the thresholder at the front, the
// region extractor at the back) reads from the same buffer; no stage ever
// writes to it. It is a "dumb" data container in the same spirit as the masks:
// a flat, row-major RGBA byte array plus the dimensions needed to index it.
//
// Key architectural principles:
// 1.  **Flat Storage**: Pixels live in a single `Vec<u8>`, four bytes per pixel,
//     row-major. All coordinate math reduces to one multiplication and one
//     addition, and the whole image can be handed to a codec as one slice.
// 2.  **Caller-Supplied Decoding**: The buffer never decodes anything itself.
//     It is constructed either blank or from raw RGBA bytes that a codec
//     produced, keeping the core free of any platform image dependency.

/// An owned width x height grid of RGBA8 samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent (zeroed) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wraps raw row-major RGBA bytes. `data.len()` must equal width * height * 4.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The number of pixels in the buffer (width * height).
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// The raw RGBA byte slice, row-major, four bytes per pixel.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn byte_index(&self, x: u32, y: u32) -> usize {
        (((y * self.width) + x) * 4) as usize
    }

    /// Reads the `[r, g, b, a]` sample at (x, y).
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.byte_index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Writes the `[r, g, b, a]` sample at (x, y).
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.byte_index(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_sample() {
        let mut buffer = PixelBuffer::new(4, 3);
        buffer.set_rgba(3, 2, [10, 20, 30, 255]);
        assert_eq!(buffer.rgba(3, 2), [10, 20, 30, 255]);
        assert_eq!(buffer.rgba(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn from_rgba_preserves_layout() {
        // 2x1 image: red pixel then green pixel.
        let data = vec![255, 0, 0, 255, 0, 255, 0, 255];
        let buffer = PixelBuffer::from_rgba(2, 1, data);
        assert_eq!(buffer.rgba(0, 0), [255, 0, 0, 255]);
        assert_eq!(buffer.rgba(1, 0), [0, 255, 0, 255]);
        assert_eq!(buffer.pixel_count(), 2);
    }
}
