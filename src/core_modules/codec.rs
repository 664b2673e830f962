// THEORY:
// Image decoding and encoding are the pipeline's only contact with a platform
// codec, so they are modeled as an injected capability rather than a direct
// dependency. The segmentation core works purely on `PixelBuffer`s; anything
// that can turn bytes into RGBA and back can drive it. The default
// implementation delegates to the `image` crate (PNG, JPEG, WEBP in; PNG out).

use image::ImageEncoder;
use thiserror::Error;

use crate::core_modules::pixel_buffer::PixelBuffer;

/// Failures at the codec boundary. `Decode` and `Surface` abort a pipeline
/// invocation; `Encode` failures for individual regions are swallowed by the
/// pipeline, which omits the region from the output.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("could not decode input bytes into a pixel buffer: {0}")]
    Decode(String),
    #[error("could not create the encoding surface: {0}")]
    Surface(String),
    #[error("could not encode region image: {0}")]
    Encode(String),
}

/// The decode/encode capability injected into the pipeline.
pub trait AssetCodec {
    /// Decodes encoded image bytes into an RGBA8 pixel buffer.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError>;

    /// Encodes an RGBA8 pixel buffer into image bytes.
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError>;
}

/// The default codec: decodes whatever formats the `image` crate recognizes
/// and encodes regions as PNG (the only format that carries the binary alpha
/// the extractor produces).
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl AssetCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|error| CodecError::Decode(error.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(PixelBuffer::from_rgba(width, height, rgba.into_raw()))
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
        encoder
            .write_image(
                buffer.data(),
                buffer.width(),
                buffer.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|error| CodecError::Encode(error.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set_rgba(0, 0, [255, 0, 0, 255]);
        buffer.set_rgba(2, 1, [0, 0, 255, 128]);

        let codec = PngCodec;
        let bytes = codec.encode(&buffer).expect("encode");
        let decoded = codec.decode(&bytes).expect("decode");
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let codec = PngCodec;
        let result = codec.decode(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
