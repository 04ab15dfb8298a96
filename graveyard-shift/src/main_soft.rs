//! Graveyard Shift — CPU-rendering (softbuffer) entry point.
//!
//! Same loop as the default binary on machines without a usable GPU:
//! `cargo run --features soft --bin graveyard-shift-soft`.

use shift_core::{App, AppConfig};
use shift_winit::SoftBackend;

fn main() {
    pretty_env_logger::init();

    let mut app = App::new(AppConfig::default(), SoftBackend::new());
    if let Err(e) = app.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
