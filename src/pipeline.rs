// THEORY:
// The `pipeline` module is the top-level API for the segmentation engine. It
// encapsulates the six-stage architecture into a single, easy-to-use
// interface: encoded bytes in, an ordered list of `ProcessedAsset`s out.
//
// The pipeline is single-threaded and synchronous per invocation. Each stage
// fully completes before the next begins, every invocation owns its own set
// of mask and label arrays, and nothing is shared between invocations, so any
// number of pipelines can run concurrently without locking (see
// `parallel_pipeline` for the batching layer built on that property). There
// is no cancellation: an invocation runs to completion or fails outright,
// and the caller re-invokes with adjusted parameters.

use log::{debug, warn};
use thiserror::Error;

use crate::core_modules::codec::{AssetCodec, CodecError};
use crate::core_modules::extractor::{ProcessedAsset, extractor};
use crate::core_modules::flood_fill::flood_fill;
use crate::core_modules::labeler::{Region, labeler};
use crate::core_modules::mask::{BinaryMask, LabelMap};
use crate::core_modules::morphology::morphology;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::thresholder::thresholder;

/// Configuration for the SpritePipeline. Value ranges are enforced by the
/// caller's UI, not here.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Luminance cutoff in [0, 255]: a pixel is foreground iff
    /// mean(r, g, b) < threshold. Higher values are more sensitive to
    /// near-white background. Recommended 200-255.
    pub threshold: u8,
    /// Transparent border added around each extracted region, 0-20 px.
    pub padding: u32,
    /// Minimum true pixel area (solid mask pixels) a component must exceed
    /// to be retained, 10-500 px.
    pub min_area: usize,
    /// Radius of the heavy box dilation that merges nearby fragments into
    /// one component, 0-30 px. Fragments within 2 * gap_fill of each other
    /// land in the same region.
    pub gap_fill: u32,
}

/// Terminal failures of a pipeline invocation. There is no per-region
/// recovery: a region whose image fails to encode is silently omitted from
/// the output instead of surfacing here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input bytes could not be decoded into a pixel buffer. The whole
    /// operation aborts with no partial results.
    #[error("failed to decode input image: {0}")]
    DecodeFailure(String),
    /// The surface needed to rasterize or encode output images could not be
    /// created. The whole operation aborts.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),
}

/// The intermediate result of the segmentation stages, before extraction.
/// Exposed so callers can preview masks or drive extraction themselves.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// True sprite pixels plus enclosed holes; decides alpha and true area.
    pub solid_mask: BinaryMask,
    /// The box-dilated mask that decides which fragments group together.
    pub detection_mask: BinaryMask,
    /// Component labels over the detection mask.
    pub label_map: LabelMap,
    /// Retained regions in raster discovery order.
    pub regions: Vec<Region>,
}

/// The main, top-level struct for the segmentation engine.
pub struct SpritePipeline {
    config: PipelineConfig,
}

impl SpritePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline: decode, segment, extract, encode.
    /// Assets come back in region discovery order, named `asset_<n>.png` by
    /// 1-based output position.
    pub fn process(
        &self,
        bytes: &[u8],
        codec: &dyn AssetCodec,
    ) -> Result<Vec<ProcessedAsset>, PipelineError> {
        let source = codec
            .decode(bytes)
            .map_err(|error| PipelineError::DecodeFailure(error.to_string()))?;
        let segmentation = self.segment(&source);
        self.extract_assets(&source, &segmentation, codec)
    }

    /// Runs stages 1-5 on a decoded buffer, producing the masks and the
    /// retained region list.
    pub fn segment(&self, source: &PixelBuffer) -> Segmentation {
        // Stage 1: Thresholding
        let foreground = thresholder::foreground_mask(source, self.config.threshold);
        debug!(
            "threshold {} marked {} of {} pixels foreground",
            self.config.threshold,
            foreground.foreground_count(),
            foreground.len()
        );

        // Stage 2: Light Gap Closing
        let closed = morphology::close_hairline_gaps(&foreground);

        // Stage 3: Background Flood Fill -> solid object mask
        let solid_mask = flood_fill::solid_object_mask(&closed);
        debug!("solid object mask holds {} pixels", solid_mask.foreground_count());

        // Stage 4: Heavy Box Dilation -> detection mask
        let detection_mask = morphology::box_dilate(&solid_mask, self.config.gap_fill);

        // Stage 5: Component Labeling + noise rejection
        let (label_map, regions) =
            labeler::find_regions(&detection_mask, &solid_mask, self.config.min_area);
        debug!(
            "labeling found {} region(s) above min_area {}",
            regions.len(),
            self.config.min_area
        );

        Segmentation {
            solid_mask,
            detection_mask,
            label_map,
            regions,
        }
    }

    /// Stage 6: renders and encodes every retained region. A region whose
    /// output dimensions are empty or whose encoding fails is skipped without
    /// error; a missing encoding surface aborts the invocation.
    pub fn extract_assets(
        &self,
        source: &PixelBuffer,
        segmentation: &Segmentation,
        codec: &dyn AssetCodec,
    ) -> Result<Vec<ProcessedAsset>, PipelineError> {
        let mut assets = Vec::with_capacity(segmentation.regions.len());

        for region in &segmentation.regions {
            let Some(rendered) =
                extractor::render_region(region, self.config.padding, source, &segmentation.solid_mask)
            else {
                continue;
            };

            match codec.encode(&rendered) {
                Ok(data) => {
                    let (original_x, original_y) =
                        extractor::original_offset(region, self.config.padding);
                    assets.push(ProcessedAsset {
                        data,
                        width: rendered.width(),
                        height: rendered.height(),
                        original_x,
                        original_y,
                        filename: extractor::asset_filename(assets.len() + 1),
                    });
                }
                Err(CodecError::Surface(message)) => {
                    return Err(PipelineError::RenderSurfaceUnavailable(message));
                }
                Err(error) => {
                    warn!("omitting region {}: {}", region.label, error);
                }
            }
        }

        Ok(assets)
    }
}
