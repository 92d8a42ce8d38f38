//! HQx Viewer
//!
//! Displays a single image through a selectable GPU upscaling filter and lets
//! the digit keys switch between filter variants at runtime.
//!
//! # Usage
//! ```bash
//! hqx-wgpu <asset-dir> [image-file]
//! ```
//!
//! The asset directory must contain `wgsl/hq{2,3,4}x.wgsl` shader sources and
//! `resources/hq{2,3,4}x.png` lookup textures. When no image file is given,
//! the bundled sample under `<asset-dir>/sample/pixelart0.png` is shown.

/// Application event handling and user input
mod app;

/// Window, GPU context and the per-frame render path
mod viewer;

use crate::app::ViewerApp;
use clap::Parser;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

/// Command-line arguments for the viewer
#[derive(Parser)]
#[command(version, about = "Pixel-art upscaling filter viewer")]
struct Args {
    /// Directory containing the filter shader and lookup texture assets
    assets_dir: PathBuf,

    /// Image file to display (defaults to the bundled sample image)
    image: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let image_path = args.image.unwrap_or_else(|| args.assets_dir.join("sample").join("pixelart0.png"));

    // The image is static: draw only when something changed.
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(args.assets_dir, image_path);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.into_error() {
        tracing::error!("initialization failed: {err}");
        return Err(err.into());
    }

    Ok(())
}
