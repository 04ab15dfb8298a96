//! CPU-rendering backend for the Graveyard Shift skeleton.
//!
//! Uses:
//! - [`winit`] for window creation and the event queue
//! - [`softbuffer`] for CPU-based pixel presentation
//!
//! No GPU is involved: frames are painted into a `u32` pixel buffer and
//! blitted to the window surface. softbuffer presents immediately, so
//! there is no vsync to pace the run loop; instead each event drain
//! blocks for up to one frame interval.

mod input;
mod painter;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use shift_core::{AppConfig, Backend, BackendError, Color, Event, Rect};

use painter::Painter;

/// Pumps allowed for `resumed` to deliver the window during creation.
const CREATE_WINDOW_ATTEMPTS: usize = 64;

/// How long one creation pump may block waiting for the compositor.
const CREATE_WINDOW_TIMEOUT: Duration = Duration::from_millis(10);

/// How long one event drain may block. With no vsync on this path,
/// this is what keeps the loop near 60 Hz.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// WindowShell — ApplicationHandler
// ---------------------------------------------------------------------------

/// The winit side of the driver: creates the window when the event loop
/// resumes and queues translated events for the core to drain.
struct WindowShell {
    title: String,
    width: u32,
    height: u32,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    queue: Vec<Event>,
}

impl WindowShell {
    fn new() -> Self {
        Self {
            title: String::new(),
            width: 0,
            height: 0,
            window: None,
            create_error: None,
            queue: Vec::new(),
        }
    }
}

impl ApplicationHandler for WindowShell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_resizable(true);

        match event_loop.create_window(window_attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(ev) = input::translate(&event) {
            self.queue.push(ev);
        }
    }
}

// ---------------------------------------------------------------------------
// SoftBackend
// ---------------------------------------------------------------------------

struct SoftState {
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    painter: Painter,
}

/// CPU-rendering [`Backend`]: a winit window presented through
/// softbuffer.
///
/// Must be used from the main thread; winit requires it for event loop
/// creation on most platforms.
pub struct SoftBackend {
    event_loop: Option<EventLoop<()>>,
    shell: WindowShell,
    state: Option<SoftState>,
    draw_color: Color,
    /// Most recent resize, applied at the next frame start.
    pending_resize: Option<(u32, u32)>,
}

impl SoftBackend {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            shell: WindowShell::new(),
            state: None,
            draw_color: Color::BLACK,
            pending_resize: None,
        }
    }
}

impl Default for SoftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SoftBackend {
    fn init_video(&mut self, _config: &AppConfig) -> Result<(), BackendError> {
        if self.event_loop.is_some() {
            return Ok(());
        }
        let event_loop = EventLoop::new().map_err(BackendError::from_err)?;
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn create_window(&mut self, config: &AppConfig) -> Result<(), BackendError> {
        let event_loop = self
            .event_loop
            .as_mut()
            .ok_or_else(|| BackendError::new("video subsystem not initialized"))?;

        self.shell.title = config.title.clone();
        self.shell.width = config.width;
        self.shell.height = config.height;

        // The window is created inside `resumed`; pump until it shows up.
        for _ in 0..CREATE_WINDOW_ATTEMPTS {
            if self.shell.window.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(CREATE_WINDOW_TIMEOUT), &mut self.shell)
            {
                return Err(BackendError::new(format!(
                    "event loop exited with code {code} before the window appeared"
                )));
            }
            if let Some(reason) = self.shell.create_error.take() {
                return Err(BackendError::new(reason));
            }
        }

        match self.shell.window {
            Some(_) => Ok(()),
            None => Err(BackendError::new("window was never delivered")),
        }
    }

    fn create_renderer(&mut self) -> Result<(), BackendError> {
        if self.state.is_some() {
            return Ok(());
        }
        let window = self
            .shell
            .window
            .clone()
            .ok_or_else(|| BackendError::new("window not created"))?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let context = softbuffer::Context::new(window.clone()).map_err(BackendError::from_err)?;
        let mut surface =
            softbuffer::Surface::new(&context, window.clone()).map_err(BackendError::from_err)?;

        surface
            .resize(
                NonZeroU32::new(width).unwrap_or(NonZeroU32::new(1).unwrap()),
                NonZeroU32::new(height).unwrap_or(NonZeroU32::new(1).unwrap()),
            )
            .map_err(BackendError::from_err)?;

        info!("softbuffer renderer ready: {width}x{height}");

        self.state = Some(SoftState {
            surface,
            painter: Painter::new(width as usize, height as usize),
        });
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<Event>) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let status = event_loop.pump_app_events(Some(POLL_TIMEOUT), &mut self.shell);
        if let PumpStatus::Exit(_) = status {
            // The platform tore the loop down underneath us; surface it
            // as a close request so the run loop winds down normally.
            self.shell.queue.push(Event::CloseRequested);
        }

        let start = out.len();
        out.append(&mut self.shell.queue);

        for ev in &out[start..] {
            if let Event::Resized { width, height } = *ev {
                self.pending_resize = Some((width, height));
            }
        }
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn clear(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        // Apply any resize observed since the last frame, keeping the
        // painter and the surface the same size.
        if let Some((width, height)) = self.pending_resize.take() {
            let width = width.max(1);
            let height = height.max(1);
            let resized = state
                .surface
                .resize(
                    NonZeroU32::new(width).unwrap_or(NonZeroU32::new(1).unwrap()),
                    NonZeroU32::new(height).unwrap_or(NonZeroU32::new(1).unwrap()),
                )
                .is_ok();
            if resized {
                state.painter.resize(width as usize, height as usize);
            } else {
                warn!("surface resize to {width}x{height} failed");
            }
        }

        state.painter.fill(self.draw_color);
    }

    fn fill_rect(&mut self, rect: Rect) {
        if let Some(state) = self.state.as_mut() {
            state.painter.fill_rect(rect, self.draw_color);
        }
    }

    fn present(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let mut buf = match state.surface.buffer_mut() {
            Ok(b) => b,
            Err(e) => {
                warn!("surface buffer unavailable, skipping frame: {e}");
                return;
            }
        };

        let (width, height) = (state.painter.width(), state.painter.height());
        state.painter.blit_to(&mut buf, width, height);

        if let Err(e) = buf.present() {
            warn!("present failed: {e}");
        }
    }

    fn shutdown(&mut self) {
        // Reverse acquisition order: renderer, window, subsystem.
        self.state = None;
        self.shell.window = None;
        self.event_loop = None;
        self.pending_resize = None;
    }
}
