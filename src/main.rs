// This file is an example of how to use the `sprite_splitter` library.
// The main library entry point is `src/lib.rs`.

use sprite_splitter::{PipelineConfig, PngCodec, SpritePipeline};

fn main() {
    println!("Sprite Splitter - Example Runner");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: sprite_splitter <input_image_path>");
        return;
    }

    let bytes = match std::fs::read(&args[1]) {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("Could not read {}: {error}", args[1]);
            return;
        }
    };

    let config = PipelineConfig {
        threshold: 230,
        padding: 2,
        min_area: 50,
        gap_fill: 8,
    };
    let pipeline = SpritePipeline::new(config);

    match pipeline.process(&bytes, &PngCodec) {
        Ok(assets) => {
            println!("Extracted {} asset(s)", assets.len());
            for asset in &assets {
                println!(
                    "  {} ({}x{} at {},{})",
                    asset.filename, asset.width, asset.height, asset.original_x, asset.original_y
                );
                if let Err(error) = std::fs::write(&asset.filename, &asset.data) {
                    eprintln!("  could not write {}: {error}", asset.filename);
                }
            }
        }
        Err(error) => eprintln!("Pipeline failed: {error}"),
    }
}
