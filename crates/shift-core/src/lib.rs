//! **shift-core** — Graveyard Shift application skeleton (lifecycle core).
//!
//! This crate owns the application semantics: the staged
//! initialization, the event-drain/advance/draw step, the idempotent
//! disposal, and the [`Backend`] trait platform drivers implement. It
//! has no windowing or GPU dependencies, so the whole lifecycle is
//! testable against a mock backend.

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod geom;

pub use app::{App, Backend, Phase, StepOutcome, RECT_SIZE, STEP_X};
pub use color::Color;
pub use config::AppConfig;
pub use error::{BackendError, InitError};
pub use events::Event;
pub use geom::Rect;
