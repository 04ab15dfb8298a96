//! Translates winit window events into core [`Event`] values.

use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use shift_core::Event;

/// Maps a winit window event to a core event, if the application cares
/// about it. Everything else is dropped here; the run loop drains
/// events but only close requests and resizes affect it.
pub(crate) fn translate(event: &WindowEvent) -> Option<Event> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(Event::CloseRequested),
        WindowEvent::Resized(PhysicalSize { width, height }) => Some(Event::Resized {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_and_destroy_both_request_close() {
        assert_eq!(
            translate(&WindowEvent::CloseRequested),
            Some(Event::CloseRequested)
        );
        assert_eq!(
            translate(&WindowEvent::Destroyed),
            Some(Event::CloseRequested)
        );
    }

    #[test]
    fn resize_carries_physical_dimensions() {
        let ev = WindowEvent::Resized(PhysicalSize::new(800, 600));
        assert_eq!(
            translate(&ev),
            Some(Event::Resized {
                width: 800,
                height: 600
            })
        );
    }

    #[test]
    fn unrelated_events_are_dropped() {
        assert_eq!(translate(&WindowEvent::Focused(true)), None);
    }
}
