#![forbid(unsafe_code)]

//! Deterministic host for tests and the native harness.
//!
//! Time only moves when the caller advances [`DeterministicClock`], frame
//! callbacks only fire when the caller takes them from [`ManualScheduler`],
//! and every draw call and panel update is captured for inspection.

use std::time::Duration;

use crate::color::Rgba;
use crate::controller::Controller;
use crate::engine::SimulationEngine;
use crate::error::LifeError;
use crate::host::{ControlPanel, DrawSurface, FrameHandle, FrameScheduler, Host, HostClock};
use crate::stats::FrameReport;
use crate::strategy::RenderStrategy;

/// Deterministic monotonic clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Frame scheduler whose callbacks fire only when taken.
///
/// Panics if a second request is made while one is outstanding, which turns a
/// double-scheduling bug into a test failure.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Option<FrameHandle>,
    requested: usize,
    cancelled: Vec<FrameHandle>,
    refuse: bool,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Fire the outstanding request: it is no longer pending afterwards.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total successful requests.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Handles cancelled so far, oldest first.
    #[must_use]
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Make subsequent requests fail, as a host without a frame primitive would.
    pub fn refuse_requests(&mut self, refuse: bool) {
        self.refuse = refuse;
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, LifeError> {
        if self.refuse {
            return Err(LifeError::Host("frame request refused".to_owned()));
        }
        assert!(
            self.pending.is_none(),
            "frame requested while {:?} is outstanding",
            self.pending
        );
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

/// One captured draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    StrokeColor(Rgba),
    FillColor(Rgba),
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    PutPixels { width: u32, height: u32, bytes: usize },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    fail_blits: bool,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn fill_rects(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::FillRect { .. }))
    }

    #[must_use]
    pub fn blits(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::PutPixels { .. }))
    }

    #[must_use]
    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Stroke))
    }

    /// Make `put_pixels` fail, as a canvas rejecting `putImageData` would.
    pub fn fail_blits(&mut self, fail: bool) {
        self.fail_blits = fail;
    }

    fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn put_pixels(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<(), LifeError> {
        if self.fail_blits {
            return Err(LifeError::Host("put_pixels rejected".to_owned()));
        }
        self.ops.push(DrawOp::PutPixels {
            width,
            height,
            bytes: rgba.len(),
        });
        Ok(())
    }
}

/// Control panel that keeps what it was last told to show.
#[derive(Debug, Default, Clone)]
pub struct RecordingPanel {
    play_label: String,
    strategy: Option<RenderStrategy>,
    reports: Vec<FrameReport>,
    label_updates: usize,
}

impl RecordingPanel {
    #[must_use]
    pub fn play_label(&self) -> &str {
        &self.play_label
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<RenderStrategy> {
        self.strategy
    }

    /// Every report shown, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[FrameReport] {
        &self.reports
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&FrameReport> {
        self.reports.last()
    }

    #[must_use]
    pub const fn label_updates(&self) -> usize {
        self.label_updates
    }
}

impl ControlPanel for RecordingPanel {
    fn set_play_label(&mut self, label: &str) {
        label.clone_into(&mut self.play_label);
        self.label_updates += 1;
    }

    fn set_strategy_indicator(&mut self, strategy: RenderStrategy) {
        self.strategy = Some(strategy);
    }

    fn show_frame_report(&mut self, report: &FrameReport) {
        self.reports.push(*report);
    }
}

/// Headless [`Host`] bundling the deterministic primitives around a surface.
#[derive(Debug, Default, Clone)]
pub struct HeadlessHost<S: DrawSurface = RecordingSurface> {
    surface: S,
    scheduler: ManualScheduler,
    clock: DeterministicClock,
    panel: RecordingPanel,
}

impl HeadlessHost {
    /// Host drawing onto a [`RecordingSurface`].
    #[must_use]
    pub fn recording() -> Self {
        Self::with_surface(RecordingSurface::new())
    }
}

impl<S: DrawSurface> HeadlessHost<S> {
    #[must_use]
    pub fn with_surface(surface: S) -> Self {
        Self {
            surface,
            scheduler: ManualScheduler::new(),
            clock: DeterministicClock::new(),
            panel: RecordingPanel::default(),
        }
    }

    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    #[must_use]
    pub const fn scheduler_ref(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ManualScheduler {
        &mut self.scheduler
    }

    #[must_use]
    pub const fn surface_ref(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn panel_ref(&self) -> &RecordingPanel {
        &self.panel
    }
}

impl<S: DrawSurface> Host for HeadlessHost<S> {
    type Surface = S;
    type Scheduler = ManualScheduler;
    type Clock = DeterministicClock;
    type Panel = RecordingPanel;

    fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    fn scheduler(&mut self) -> &mut ManualScheduler {
        &mut self.scheduler
    }

    fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    fn panel(&mut self) -> &mut RecordingPanel {
        &mut self.panel
    }
}

impl<E: SimulationEngine, S: DrawSurface> Controller<E, HeadlessHost<S>> {
    /// Advance the clock by `dt` and fire the pending frame callback, the way
    /// a display refresh would.
    ///
    /// Returns `Ok(None)` when nothing was scheduled.
    pub fn run_frame(&mut self, dt: Duration) -> Result<Option<FrameReport>, LifeError> {
        let host = self.host_mut();
        host.clock_mut().advance(dt);
        if host.scheduler_mut().take_pending().is_none() {
            return Ok(None);
        }
        self.on_animation_frame()
    }

    /// Run up to `frames` display refreshes `dt` apart; stops early once
    /// nothing is scheduled. Returns how many cycles ran.
    pub fn run_frames(&mut self, frames: usize, dt: Duration) -> Result<usize, LifeError> {
        let mut ran = 0;
        for _ in 0..frames {
            if self.run_frame(dt)?.is_none() {
                break;
            }
            ran += 1;
        }
        Ok(ran)
    }
}
