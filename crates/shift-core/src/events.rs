//! System events reported by a backend.

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A system event drained from the platform queue.
///
/// The run loop consumes every pending event each frame. Only
/// [`Event::CloseRequested`] changes control flow; the rest is observed
/// and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The user asked to close the window (close button, Cmd-Q, window
    /// manager kill, ...).
    CloseRequested,
    /// The window surface changed size, in physical pixels.
    Resized { width: u32, height: u32 },
}
