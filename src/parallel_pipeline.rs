// THEORY:
// The core pipeline is strictly single-threaded per invocation, and every
// invocation owns its masks exclusively. That makes parallelism purely a
// matter of running independent invocations side by side, which this module
// does at two levels:
//
// 1.  **Sheet level**: a `WorkerPool` of tokio tasks, fed round-robin by a
//     dispatcher, runs one full pipeline per submitted image. Results come
//     back over oneshot channels, so callers await exactly the sheet they
//     submitted.
// 2.  **Region level**: extraction of distinct regions is independent
//     (read-only access to the source buffer and solid mask, one fresh
//     output buffer per region), so `extract_assets_parallel` fans regions
//     out across tasks and joins them back in discovery order.

use std::sync::Arc;

use futures::future::join_all;
use log::warn;
use tokio::sync::{mpsc, oneshot};

use crate::core_modules::codec::{AssetCodec, CodecError};
use crate::core_modules::extractor::{ProcessedAsset, extractor};
use crate::core_modules::mask::BinaryMask;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::pipeline::{PipelineConfig, PipelineError, Segmentation, SpritePipeline};

/// The outcome of one sheet run: the pipeline's own result, distinct from
/// pool plumbing failures.
pub type SheetResult = Result<Vec<ProcessedAsset>, PipelineError>;

/// A codec that can be shared across worker tasks.
pub type SharedCodec = Arc<dyn AssetCodec + Send + Sync>;

struct SheetTask {
    bytes: Vec<u8>,
    result_sender: oneshot::Sender<SheetResult>,
}

/// A pool of pipeline workers, one sheet in flight per worker.
pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<SheetTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns one worker per available CPU.
    pub fn new(config: PipelineConfig, codec: SharedCodec) -> Self {
        Self::with_workers(config, codec, num_cpus::get().max(1))
    }

    pub fn with_workers(config: PipelineConfig, codec: SharedCodec, worker_count: usize) -> Self {
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<SheetTask>();
        let mut workers = Vec::new();

        // A single dispatcher distributes tasks to workers round-robin.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<SheetTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_senders.len();
            }
        });

        for mut worker_receiver in worker_receivers {
            let worker_config = config.clone();
            let worker_codec = Arc::clone(&codec);

            let worker = tokio::spawn(async move {
                let pipeline = SpritePipeline::new(worker_config);

                while let Some(task) = worker_receiver.recv().await {
                    let result = pipeline.process(&task.bytes, worker_codec.as_ref());
                    let _ = task.result_sender.send(result);
                }
            });

            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
        }
    }

    /// Submits one sheet and awaits its full pipeline result. The outer
    /// error reports pool plumbing failures only.
    pub async fn process_sheet(&self, bytes: Vec<u8>) -> Result<SheetResult, &'static str> {
        let (result_sender, result_receiver) = oneshot::channel();

        self.task_sender
            .send(SheetTask {
                bytes,
                result_sender,
            })
            .map_err(|_| "Failed to send sheet to worker pool")?;

        result_receiver
            .await
            .map_err(|_| "Failed to receive result from worker")
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

/// Extracts and encodes every retained region concurrently, one task per
/// region. Output order, filenames, and the silent-omission rules are
/// identical to the sequential `extract_assets`.
pub async fn extract_assets_parallel(
    config: &PipelineConfig,
    source: Arc<PixelBuffer>,
    segmentation: &Segmentation,
    codec: SharedCodec,
) -> Result<Vec<ProcessedAsset>, PipelineError> {
    let solid: Arc<BinaryMask> = Arc::new(segmentation.solid_mask.clone());
    let padding = config.padding;

    let tasks = segmentation.regions.iter().cloned().map(|region| {
        let source = Arc::clone(&source);
        let solid = Arc::clone(&solid);
        let codec = Arc::clone(&codec);
        tokio::spawn(async move {
            let rendered = extractor::render_region(&region, padding, &source, &solid)?;
            let encoded = codec.encode(&rendered);
            Some((region, rendered, encoded))
        })
    });

    // join_all preserves submission order, which is region discovery order.
    let mut assets = Vec::with_capacity(segmentation.regions.len());
    for joined in join_all(tasks).await {
        let Ok(Some((region, rendered, encoded))) = joined else {
            continue;
        };
        match encoded {
            Ok(data) => {
                let (original_x, original_y) = extractor::original_offset(&region, padding);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::codec::PngCodec;

    fn sheet_with_squares(squares: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut buffer = PixelBuffer::new(90, 90);
        for y in 0..90 {
            for x in 0..90 {
                buffer.set_rgba(x, y, [255, 255, 255, 255]);
            }
        }
        for &(x0, y0, side) in squares {
            for y in y0..y0 + side {
                for x in x0..x0 + side {
                    buffer.set_rgba(x, y, [0, 0, 0, 255]);
                }
            }
        }
        PngCodec.encode(&buffer).expect("encode sheet")
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            threshold: 245,
            padding: 1,
            min_area: 10,
            gap_fill: 0,
        }
    }

    #[tokio::test]
    async fn pool_processes_independent_sheets() {
        let pool = WorkerPool::with_workers(test_config(), Arc::new(PngCodec), 2);
        assert_eq!(pool.worker_count(), 2);

        let one_sprite = sheet_with_squares(&[(10, 10, 8)]);
        let two_sprites = sheet_with_squares(&[(10, 10, 8), (40, 40, 12)]);

        let first = pool
            .process_sheet(one_sprite)
            .await
            .expect("pool reachable")
            .expect("pipeline ok");
        let second = pool
            .process_sheet(two_sprites)
            .await
            .expect("pool reachable")
            .expect("pipeline ok");

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].filename, "asset_1.png");
        assert_eq!(second[1].filename, "asset_2.png");
    }

    #[tokio::test]
    async fn parallel_extraction_matches_sequential_output() {
        let bytes = sheet_with_squares(&[(5, 5, 10), (30, 8, 7), (60, 50, 20)]);
        let codec = PngCodec;
        let config = test_config();
        let pipeline = SpritePipeline::new(config.clone());

        let source = codec.decode(&bytes).expect("decode");
        let segmentation = pipeline.segment(&source);

        let sequential = pipeline
            .extract_assets(&source, &segmentation, &codec)
            .expect("sequential extraction");
        let parallel = extract_assets_parallel(
            &config,
            Arc::new(source),
            &segmentation,
            Arc::new(PngCodec),
        )
        .await
        .expect("parallel extraction");

        assert_eq!(parallel.len(), sequential.len());
        for (a, b) in parallel.iter().zip(sequential.iter()) {
            assert_eq!(a.filename, b.filename);
            assert_eq!((a.width, a.height), (b.width, b.height));
            assert_eq!((a.original_x, a.original_y), (b.original_x, b.original_y));
            assert_eq!(a.data, b.data);
        }
    }
}
