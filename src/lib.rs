// THEORY:
// This file is the main entry point for the `sprite_splitter` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (a web frontend, a batch tool,
// or any other host that owns the drag/drop, sliders, and packaging concerns).
//
// The primary goal is to export the `SpritePipeline` and its associated data
// structures (`PipelineConfig`, `ProcessedAsset`, etc.) as the clean, high-level
// interface for the entire segmentation engine. The internal stage modules
// (`core_modules`) are encapsulated behind it, providing a clean separation
// between the algorithmic core and its collaborators.

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;

// Re-export key data structures for the public API.
pub use crate::core_modules::codec::{AssetCodec, CodecError, PngCodec};
pub use crate::core_modules::extractor::ProcessedAsset;
pub use crate::core_modules::labeler::Region;
pub use crate::core_modules::mask::{BinaryMask, LabelMap};
pub use crate::core_modules::pixel_buffer::PixelBuffer;
pub use crate::pipeline::{PipelineConfig, PipelineError, Segmentation, SpritePipeline};
