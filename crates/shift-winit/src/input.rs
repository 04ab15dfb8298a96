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
