pub mod codec;
pub mod extractor;
pub mod flood_fill;
pub mod labeler;
pub mod mask;
pub mod morphology;
pub mod pixel_buffer;
pub mod thresholder;
