//! Convert a depth PNG to the NPY array format required by the grasp model.
//!
//! The input is assumed to store millimeters in 16-bit grayscale; the output
//! is float32 meters with shape (height, width, 1). The output name is the
//! input name with the `.png` and `_raw` suffixes stripped.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin depth_to_npy -- --png_image renderings/banana/0_depth_raw.png
//! # writes renderings/banana/0_depth.npy
//! ```

use std::path::PathBuf;

use clap::Parser;

use fusion_eval::depth;

#[derive(Parser)]
#[command(name = "depth-to-npy")]
#[command(about = "Convert a depth image from .png to the .npy format required by the grasp model")]
struct Args {
    /// Path to the .png depth image (millimeter units)
    #[arg(long = "png_image", value_name = "PATH")]
    png_image: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> fusion_eval::Result<()> {
    let array = depth::load_depth_png(&args.png_image)?.to_meters();
    let output = depth::derived_output_path(&args.png_image);
    array.write_npy(&output)?;

    println!(
        "Wrote {} ({}x{}x1 float32, meters)",
        output.display(),
        array.height,
        array.width
    );
    Ok(())
}
