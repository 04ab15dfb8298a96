//! The application lifecycle: [`App`], [`Backend`], [`Phase`] and
//! [`StepOutcome`].
//!
//! The skeleton itself is tiny: open a window, then every frame slide a
//! single rectangle to the right and redraw it. What this module pins
//! down is the lifecycle around that loop. Initialization runs three
//! backend stages in a fixed order and tears down symmetrically when
//! one fails. Each step drains the event queue before touching state
//! and stops on a close request. Disposal releases everything exactly
//! once, whether it is called explicitly, reached from [`App::run`], or
//! left to the destructor.

use log::{debug, info, warn};

use crate::color::Color;
use crate::config::AppConfig;
use crate::error::{BackendError, InitError};
use crate::events::Event;
use crate::geom::Rect;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Edge length of the draw rectangle, in pixels.
pub const RECT_SIZE: i32 = 40;

/// Horizontal distance the rectangle travels per frame, in pixels.
///
/// The motion is unbounded: x grows monotonically and is never clamped
/// or wrapped, so the rectangle eventually leaves the window and keeps
/// going.
pub const STEP_X: i32 = 20;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Platform services an [`App`] runs on.
///
/// The three setup stages are always invoked in order (`init_video`,
/// `create_window`, `create_renderer`) and a failure in one means the
/// next is never called. The draw calls follow current-color
/// semantics: [`clear`](Backend::clear) and
/// [`fill_rect`](Backend::fill_rect) both paint with whatever color the
/// last [`set_draw_color`](Backend::set_draw_color) installed.
pub trait Backend {
    /// Brings up the platform's video and event subsystem.
    fn init_video(&mut self, config: &AppConfig) -> Result<(), BackendError>;

    /// Creates the application window. Only called after `init_video`
    /// succeeded.
    fn create_window(&mut self, config: &AppConfig) -> Result<(), BackendError>;

    /// Creates the renderer bound to the window. Only called after
    /// `create_window` succeeded.
    fn create_renderer(&mut self) -> Result<(), BackendError>;

    /// Drains every pending system event into `out`, oldest first.
    fn poll_events(&mut self, out: &mut Vec<Event>);

    /// Installs the color used by subsequent `clear` and `fill_rect`
    /// calls.
    fn set_draw_color(&mut self, color: Color);

    /// Fills the whole frame with the current draw color.
    fn clear(&mut self);

    /// Fills `rect` with the current draw color, clipped to the frame.
    fn fill_rect(&mut self, rect: Rect);

    /// Displays the completed frame. On a vsync-presenting backend this
    /// call paces the run loop.
    fn present(&mut self);

    /// Releases everything acquired so far, in reverse acquisition
    /// order. Must be idempotent: the lifecycle routes through here
    /// both on init failure and on dispose, and calling it with nothing
    /// acquired is a no-op.
    fn shutdown(&mut self);
}

// ---------------------------------------------------------------------------
// Phase / StepOutcome
// ---------------------------------------------------------------------------

/// Lifecycle phase of an [`App`].
///
/// `Disposed` is terminal. A failed `init` returns to `Uninitialized`:
/// partial acquisitions are released before the error is reported, so
/// there is no stuck in-between state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; no platform resources held.
    Uninitialized,
    /// `init` succeeded; window and renderer are live.
    Running,
    /// `dispose` ran; all platform resources are released.
    Disposed,
}

/// Outcome of one run-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was drawn; step again.
    Continue,
    /// A close was requested, or the app is not running. Leave the loop
    /// and dispose.
    Stop,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The application: owns a backend, the draw rectangle and the
/// lifecycle phase, and drives the update-then-draw cycle.
///
/// Platform resources live strictly within the `init`..`dispose`
/// window of the owning value, and dropping the app disposes it, so a
/// caller that only ever calls [`App::run`] can not leak a window.
pub struct App<B: Backend> {
    config: AppConfig,
    backend: B,
    rect: Rect,
    phase: Phase,
    /// Scratch buffer reused by `step` when draining events.
    events: Vec<Event>,
}

impl<B: Backend> App<B> {
    /// Creates an application over `backend`. Nothing is acquired until
    /// [`init`](Self::init).
    pub fn new(config: AppConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            rect: Rect::new(0, 0, RECT_SIZE, RECT_SIZE),
            phase: Phase::Uninitialized,
            events: Vec::new(),
        }
    }

    /// The draw rectangle at its current position.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Current lifecycle phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether `init` has succeeded and `dispose` has not yet run.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Runs the three setup stages in order, short-circuiting on the
    /// first failure.
    ///
    /// On failure, everything acquired by earlier stages is released
    /// before the error returns, so a renderer failure does not leak
    /// the window it was meant to attach to. Calling `init` on an app
    /// that is already running or disposed logs and returns `Ok`.
    pub fn init(&mut self) -> Result<(), InitError> {
        if self.phase != Phase::Uninitialized {
            warn!("init called in phase {:?}, ignoring", self.phase);
            return Ok(());
        }

        if let Err(e) = self.backend.init_video(&self.config) {
            self.backend.shutdown();
            return Err(InitError::VideoNotSupported(e));
        }
        if let Err(e) = self.backend.create_window(&self.config) {
            self.backend.shutdown();
            return Err(InitError::WindowNotCreated(e));
        }
        if let Err(e) = self.backend.create_renderer() {
            self.backend.shutdown();
            return Err(InitError::RendererNotCreated(e));
        }

        self.rect = Rect::new(0, 0, RECT_SIZE, RECT_SIZE);
        self.phase = Phase::Running;
        info!(
            "initialized {}x{} window \"{}\"",
            self.config.width, self.config.height, self.config.title
        );
        Ok(())
    }

    /// One run-loop iteration: drain events, advance, draw.
    ///
    /// Returns [`StepOutcome::Stop`] without advancing or drawing when
    /// a close request was drained or the app is not running. Otherwise
    /// the rectangle moves right by [`STEP_X`], the frame is drawn, and
    /// the outcome is [`StepOutcome::Continue`].
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Stop;
        }

        self.events.clear();
        self.backend.poll_events(&mut self.events);
        if self.events.iter().any(|e| matches!(e, Event::CloseRequested)) {
            debug!("close requested, leaving run loop");
            return StepOutcome::Stop;
        }

        self.rect.x += STEP_X;
        self.draw();
        StepOutcome::Continue
    }

    /// The fixed frame: clear to black, fill the rectangle hot pink,
    /// present.
    ///
    /// Draw calls are infallible at this level; a backend that hits a
    /// transient surface error skips the frame itself.
    fn draw(&mut self) {
        self.backend.set_draw_color(Color::BLACK);
        self.backend.clear();
        self.backend.set_draw_color(Color::HOT_PINK);
        self.backend.fill_rect(self.rect);
        self.backend.present();
    }

    /// Releases the renderer, the window and the subsystem.
    ///
    /// Idempotent: second and later calls do nothing. Dropping the app
    /// routes through here too, so resources are released exactly once
    /// no matter which exit path runs first.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            debug!("dispose called again, ignoring");
            return;
        }
        self.backend.shutdown();
        self.phase = Phase::Disposed;
        info!("disposed");
    }

    /// The whole lifecycle: `init`, `step` until it stops, `dispose`.
    pub fn run(&mut self) -> Result<(), InitError> {
        self.init()?;
        while self.step() == StepOutcome::Continue {}
        self.dispose();
        Ok(())
    }
}

impl<B: Backend> Drop for App<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;

    /// Everything a [`MockBackend`] records, in call order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        InitVideo,
        CreateWindow,
        CreateRenderer,
        SetColor(Color),
        Clear,
        FillRect(Rect),
        Present,
        Shutdown,
    }

    /// Recording backend with per-stage failure injection and scripted
    /// event batches (one batch handed out per poll, oldest first).
    #[derive(Default)]
    struct MockBackend {
        calls: Vec<Call>,
        fail_video: bool,
        fail_window: bool,
        fail_renderer: bool,
        event_batches: VecDeque<Vec<Event>>,
        shutdowns: usize,
        /// Shared counter for tests that outlive the app.
        shutdown_counter: Option<Rc<Cell<usize>>>,
    }

    impl Backend for MockBackend {
        fn init_video(&mut self, _config: &AppConfig) -> Result<(), BackendError> {
            self.calls.push(Call::InitVideo);
            if self.fail_video {
                return Err(BackendError::new("video refused"));
            }
            Ok(())
        }

        fn create_window(&mut self, _config: &AppConfig) -> Result<(), BackendError> {
            self.calls.push(Call::CreateWindow);
            if self.fail_window {
                return Err(BackendError::new("window refused"));
            }
            Ok(())
        }

        fn create_renderer(&mut self) -> Result<(), BackendError> {
            self.calls.push(Call::CreateRenderer);
            if self.fail_renderer {
                return Err(BackendError::new("renderer refused"));
            }
            Ok(())
        }

        fn poll_events(&mut self, out: &mut Vec<Event>) {
            if let Some(batch) = self.event_batches.pop_front() {
                out.extend(batch);
            }
        }

        fn set_draw_color(&mut self, color: Color) {
            self.calls.push(Call::SetColor(color));
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn fill_rect(&mut self, rect: Rect) {
            self.calls.push(Call::FillRect(rect));
        }

        fn present(&mut self) {
            self.calls.push(Call::Present);
        }

        fn shutdown(&mut self) {
            self.calls.push(Call::Shutdown);
            self.shutdowns += 1;
            if let Some(counter) = &self.shutdown_counter {
                counter.set(counter.get() + 1);
            }
        }
    }

    fn running_app() -> App<MockBackend> {
        let mut app = App::new(AppConfig::default(), MockBackend::default());
        app.init().expect("init should succeed");
        app
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    #[test]
    fn init_runs_stages_in_order() {
        let mut app = App::new(AppConfig::default(), MockBackend::default());
        assert_eq!(app.phase(), Phase::Uninitialized);
        assert!(!app.is_running());

        app.init().expect("init should succeed");

        assert_eq!(app.phase(), Phase::Running);
        assert!(app.is_running());
        assert_eq!(app.rect(), Rect::new(0, 0, RECT_SIZE, RECT_SIZE));
        assert_eq!(
            app.backend.calls,
            vec![Call::InitVideo, Call::CreateWindow, Call::CreateRenderer]
        );
    }

    #[test]
    fn init_video_failure_short_circuits() {
        let backend = MockBackend {
            fail_video: true,
            ..Default::default()
        };
        let mut app = App::new(AppConfig::default(), backend);

        let err = app.init().unwrap_err();

        assert!(matches!(err, InitError::VideoNotSupported(_)));
        assert_eq!(app.phase(), Phase::Uninitialized);
        // Later stages never ran; the teardown did.
        assert_eq!(app.backend.calls, vec![Call::InitVideo, Call::Shutdown]);
    }

    #[test]
    fn init_window_failure_short_circuits() {
        let backend = MockBackend {
            fail_window: true,
            ..Default::default()
        };
        let mut app = App::new(AppConfig::default(), backend);

        let err = app.init().unwrap_err();

        assert!(matches!(err, InitError::WindowNotCreated(_)));
        assert_eq!(app.phase(), Phase::Uninitialized);
        assert_eq!(
            app.backend.calls,
            vec![Call::InitVideo, Call::CreateWindow, Call::Shutdown]
        );
    }

    #[test]
    fn init_renderer_failure_releases_window() {
        let backend = MockBackend {
            fail_renderer: true,
            ..Default::default()
        };
        let mut app = App::new(AppConfig::default(), backend);

        let err = app.init().unwrap_err();

        assert!(matches!(err, InitError::RendererNotCreated(_)));
        assert_eq!(app.phase(), Phase::Uninitialized);
        // The window had been created; the symmetric teardown released it.
        assert_eq!(
            app.backend.calls,
            vec![
                Call::InitVideo,
                Call::CreateWindow,
                Call::CreateRenderer,
                Call::Shutdown
            ]
        );
        assert_eq!(app.backend.shutdowns, 1);
    }

    #[test]
    fn init_twice_is_a_no_op() {
        let mut app = running_app();
        let calls_before = app.backend.calls.len();

        app.init().expect("second init should be accepted");

        assert_eq!(app.phase(), Phase::Running);
        assert_eq!(app.backend.calls.len(), calls_before);
    }

    #[test]
    fn init_after_dispose_is_a_no_op() {
        let mut app = running_app();
        app.dispose();

        app.init().expect("init after dispose should be accepted");

        assert_eq!(app.phase(), Phase::Disposed);
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    #[test]
    fn step_advances_by_fixed_increment() {
        let mut app = running_app();

        assert_eq!(app.step(), StepOutcome::Continue);
        assert_eq!(app.rect(), Rect::new(STEP_X, 0, RECT_SIZE, RECT_SIZE));

        assert_eq!(app.step(), StepOutcome::Continue);
        assert_eq!(app.rect(), Rect::new(2 * STEP_X, 0, RECT_SIZE, RECT_SIZE));
    }

    #[test]
    fn rect_motion_is_unbounded() {
        // Nothing clamps or wraps x, so it marches well past the window
        // width.
        let mut app = running_app();
        for _ in 0..200 {
            assert_eq!(app.step(), StepOutcome::Continue);
        }
        assert_eq!(app.rect().x, 200 * STEP_X);
        assert!(app.rect().x > app.config.width as i32);
        assert_eq!(app.rect().y, 0);
    }

    #[test]
    fn draw_sequence_is_clear_fill_present() {
        let mut app = running_app();
        app.backend.calls.clear();

        app.step();

        assert_eq!(
            app.backend.calls,
            vec![
                Call::SetColor(Color::BLACK),
                Call::Clear,
                Call::SetColor(Color::HOT_PINK),
                Call::FillRect(Rect::new(STEP_X, 0, RECT_SIZE, RECT_SIZE)),
                Call::Present,
            ]
        );
    }

    #[test]
    fn close_request_stops_without_advancing() {
        let mut app = running_app();
        app.step();
        let x_before = app.rect().x;
        app.backend
            .event_batches
            .push_back(vec![Event::CloseRequested]);
        app.backend.calls.clear();

        assert_eq!(app.step(), StepOutcome::Stop);

        // No movement, no draw calls for the stopped frame.
        assert_eq!(app.rect().x, x_before);
        assert!(app.backend.calls.is_empty());
    }

    #[test]
    fn close_is_noticed_among_other_events() {
        let mut app = running_app();
        app.backend.event_batches.push_back(vec![
            Event::Resized {
                width: 800,
                height: 600,
            },
            Event::CloseRequested,
            Event::Resized {
                width: 640,
                height: 480,
            },
        ]);

        assert_eq!(app.step(), StepOutcome::Stop);
    }

    #[test]
    fn resize_alone_does_not_stop() {
        let mut app = running_app();
        app.backend.event_batches.push_back(vec![Event::Resized {
            width: 800,
            height: 600,
        }]);

        assert_eq!(app.step(), StepOutcome::Continue);
        assert_eq!(app.rect().x, STEP_X);
    }

    #[test]
    fn step_before_init_is_stop() {
        let mut app = App::new(AppConfig::default(), MockBackend::default());

        assert_eq!(app.step(), StepOutcome::Stop);

        assert!(app.backend.calls.is_empty());
        assert_eq!(app.rect().x, 0);
    }

    #[test]
    fn step_after_dispose_is_stop() {
        let mut app = running_app();
        app.dispose();
        app.backend.calls.clear();

        assert_eq!(app.step(), StepOutcome::Stop);

        assert!(app.backend.calls.is_empty());
    }

    // -----------------------------------------------------------------------
    // Disposal
    // -----------------------------------------------------------------------

    #[test]
    fn dispose_releases_exactly_once() {
        let mut app = running_app();

        app.dispose();
        assert_eq!(app.phase(), Phase::Disposed);
        assert_eq!(app.backend.shutdowns, 1);

        app.dispose();
        assert_eq!(app.backend.shutdowns, 1);
    }

    #[test]
    fn dispose_without_init_is_safe() {
        let mut app = App::new(AppConfig::default(), MockBackend::default());

        app.dispose();
        app.dispose();

        assert_eq!(app.phase(), Phase::Disposed);
        assert_eq!(app.backend.shutdowns, 1);
    }

    #[test]
    fn drop_disposes() {
        let counter = Rc::new(Cell::new(0));
        {
            let backend = MockBackend {
                shutdown_counter: Some(counter.clone()),
                ..Default::default()
            };
            let mut app = App::new(AppConfig::default(), backend);
            app.init().expect("init should succeed");
            app.step();
        }
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn explicit_dispose_then_drop_releases_once() {
        let counter = Rc::new(Cell::new(0));
        {
            let backend = MockBackend {
                shutdown_counter: Some(counter.clone()),
                ..Default::default()
            };
            let mut app = App::new(AppConfig::default(), backend);
            app.init().expect("init should succeed");
            app.dispose();
            assert_eq!(counter.get(), 1);
        }
        assert_eq!(counter.get(), 1);
    }

    // -----------------------------------------------------------------------
    // run
    // -----------------------------------------------------------------------

    #[test]
    fn run_loops_until_close_and_disposes() {
        let mut backend = MockBackend::default();
        // Two quiet polls, then a close request on the third step.
        backend.event_batches.push_back(vec![]);
        backend.event_batches.push_back(vec![]);
        backend
            .event_batches
            .push_back(vec![Event::CloseRequested]);
        let mut app = App::new(AppConfig::default(), backend);

        app.run().expect("run should succeed");

        assert_eq!(app.phase(), Phase::Disposed);
        // Two frames drew; the third step stopped before advancing.
        assert_eq!(app.rect().x, 2 * STEP_X);
        assert_eq!(app.backend.shutdowns, 1);
    }

    #[test]
    fn run_propagates_init_failure() {
        let backend = MockBackend {
            fail_window: true,
            ..Default::default()
        };
        let mut app = App::new(AppConfig::default(), backend);

        let err = app.run().unwrap_err();

        assert!(matches!(err, InitError::WindowNotCreated(_)));
        assert_eq!(app.phase(), Phase::Uninitialized);
    }
}
