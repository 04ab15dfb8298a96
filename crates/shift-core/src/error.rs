//! Error types for backend setup.

use thiserror::Error;

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// A failure reported by a [`Backend`](crate::app::Backend) stage.
///
/// Drivers render their platform error to text at the trait boundary,
/// which keeps windowing and GPU types out of the core.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    /// Creates an error from a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Creates an error from any displayable platform error.
    pub fn from_err(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// InitError
// ---------------------------------------------------------------------------

/// An initialization failure, one variant per setup stage.
///
/// The stages run in a fixed order and short-circuit: when a stage
/// fails, later stages were never attempted, and everything acquired by
/// earlier stages has already been released by the time the error
/// reaches the caller.
#[derive(Debug, Error)]
pub enum InitError {
    /// The platform's video and event subsystem could not be brought
    /// up.
    #[error("video subsystem not supported: {0}")]
    VideoNotSupported(BackendError),
    /// Window creation produced no window.
    #[error("window not created: {0}")]
    WindowNotCreated(BackendError),
    /// No renderer could be attached to the window.
    #[error("renderer not created: {0}")]
    RendererNotCreated(BackendError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_message() {
        let err = BackendError::new("no compositor");
        assert_eq!(err.to_string(), "no compositor");
    }

    #[test]
    fn init_error_names_stage_and_cause() {
        let err = InitError::WindowNotCreated(BackendError::new("denied"));
        assert_eq!(err.to_string(), "window not created: denied");

        let err = InitError::VideoNotSupported(BackendError::from_err("no display"));
        assert_eq!(err.to_string(), "video subsystem not supported: no display");

        let err = InitError::RendererNotCreated(BackendError::new("no adapter"));
        assert_eq!(err.to_string(), "renderer not created: no adapter");
    }
}
