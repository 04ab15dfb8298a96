//! Graveyard Shift — default (wgpu GPU-accelerated) entry point.
//!
//! Opens a 1280x720 window and runs the skeleton loop until the window
//! is closed. Set `RUST_LOG=debug` for lifecycle logging.

use shift_core::{App, AppConfig};
use shift_wgpu::WgpuBackend;

fn main() {
    pretty_env_logger::init();

    let mut app = App::new(AppConfig::default(), WgpuBackend::new());
    if let Err(e) = app.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
