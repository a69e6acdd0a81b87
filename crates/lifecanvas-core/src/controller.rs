#![forbid(unsafe_code)]

//! Interaction controller: one explicitly owned value holding the engine,
//! the host, and all control state.
//!
//! Every user action maps onto an engine mutation plus at most one forced
//! render. Forced renders never tick; only [`Controller::on_animation_frame`]
//! advances the simulation, in the order statistics, tick, render.

use tracing::{debug, trace, warn};

use crate::animation::{AnimationState, Animator};
use crate::config::LifeConfig;
use crate::engine::{GridSize, RenderSettings, SimulationEngine};
use crate::error::LifeError;
use crate::geometry::{BoundingBox, CanvasLayout, CellIndex, PointerEvent};
use crate::host::{ControlPanel, Host, HostClock};
use crate::renderer::{RenderPass, Renderer};
use crate::stats::{FrameReport, FrameStats};
use crate::strategy::{RenderStrategy, StrategySelector};

/// Drives one simulation on one canvas.
#[derive(Debug)]
pub struct Controller<E: SimulationEngine, H: Host> {
    engine: E,
    host: H,
    renderer: Renderer,
    selector: StrategySelector,
    animator: Animator,
    stats: FrameStats,
    layout: CanvasLayout,
    autoplay: bool,
    renders: u64,
    generation: u64,
}

impl<E: SimulationEngine, H: Host> Controller<E, H> {
    /// Validate `config`, query the grid once, and sync the control panel.
    ///
    /// Nothing is drawn until [`Controller::start`] or another action.
    pub fn new(engine: E, mut host: H, config: &LifeConfig) -> Result<Self, LifeError> {
        let settings = RenderSettings::try_from(config)?;
        let grid = GridSize::new(engine.width(), engine.height())?;
        let renderer = Renderer::new(settings, grid)?;
        let (pixel_width, pixel_height) = renderer.canvas_size();
        let layout = CanvasLayout::new(pixel_width, pixel_height, settings.cell_size, grid);
        let stats = FrameStats::new(host.clock().now_mono());

        let animator = Animator::new();
        let panel = host.panel();
        panel.set_play_label(animator.state().control_label());
        panel.set_strategy_indicator(config.strategy);

        debug!(
            width = grid.width,
            height = grid.height,
            cell_size = settings.cell_size,
            strategy = %config.strategy,
            "controller ready"
        );

        Ok(Self {
            engine,
            host,
            renderer,
            selector: StrategySelector::new(config.strategy),
            animator,
            stats,
            layout,
            autoplay: config.autoplay,
            renders: 0,
            generation: 0,
        })
    }

    /// Draw the initial frame, then start animating if autoplay is set.
    pub fn start(&mut self) -> Result<(), LifeError> {
        self.redraw()?;
        if self.autoplay {
            self.play()?;
        }
        Ok(())
    }

    /// Begin animating. Returns `Ok(false)` if already running.
    ///
    /// Only requests the first frame; the cycle runs when the host calls back.
    pub fn play(&mut self) -> Result<bool, LifeError> {
        let now = self.host.clock().now_mono();
        let started = self.animator.play(self.host.scheduler())?;
        if started {
            self.stats.rearm(now);
            self.sync_play_label();
            debug!("animation running");
        }
        Ok(started)
    }

    /// Stop animating and cancel the outstanding frame. Returns `false` if
    /// already paused.
    pub fn pause(&mut self) -> bool {
        let stopped = self.animator.pause(self.host.scheduler());
        if stopped {
            self.sync_play_label();
            debug!(frames = self.animator.frames(), "animation paused");
        }
        stopped
    }

    /// Flip between running and paused; returns the new state.
    pub fn toggle_play_pause(&mut self) -> Result<AnimationState, LifeError> {
        if self.animator.is_running() {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.animator.state())
    }

    /// Host frame callback.
    ///
    /// Runs one cycle and schedules the next. A callback with no outstanding
    /// request, or one arriving while paused, is dropped and returns
    /// `Ok(None)`. If the cycle fails the animation is paused.
    pub fn on_animation_frame(&mut self) -> Result<Option<FrameReport>, LifeError> {
        if !self.animator.begin_frame() {
            warn!(state = ?self.animator.state(), "dropping stale frame callback");
            return Ok(None);
        }

        let report = match self.frame_cycle() {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "frame cycle failed; pausing");
                self.pause();
                return Err(err);
            }
        };
        self.host.panel().show_frame_report(&report);

        if let Err(err) = self.animator.end_frame(self.host.scheduler()) {
            warn!(error = %err, "could not schedule next frame; pausing");
            self.sync_play_label();
            return Err(err);
        }
        Ok(Some(report))
    }

    /// The host fired the outstanding frame callback while the controller was
    /// unavailable. Requests a replacement so the animation keeps running.
    ///
    /// Returns `Ok(false)` while paused. If the new request is refused the
    /// animation pauses.
    pub fn frame_missed(&mut self) -> Result<bool, LifeError> {
        match self.animator.rearm_missed(self.host.scheduler()) {
            Ok(rearmed) => {
                if rearmed {
                    debug!("missed frame re-requested");
                }
                Ok(rearmed)
            }
            Err(err) => {
                warn!(error = %err, "could not replace missed frame; pausing");
                self.sync_play_label();
                Err(err)
            }
        }
    }

    /// Kill every cell and redraw.
    pub fn clear(&mut self) -> Result<(), LifeError> {
        self.engine.reset_to_dead();
        debug!("grid cleared");
        self.redraw().map(drop)
    }

    /// Replace the grid with a random pattern and redraw.
    pub fn randomize(&mut self) -> Result<(), LifeError> {
        self.engine.reset_to_random();
        debug!("grid randomized");
        self.redraw().map(drop)
    }

    /// Toggle the cell under a pointer click and redraw.
    pub fn click(
        &mut self,
        pointer: PointerEvent,
        bounds: BoundingBox,
    ) -> Result<CellIndex, LifeError> {
        let cell = self.layout.cell_at(pointer, bounds);
        self.engine.flip_cell(cell.row, cell.col);
        debug!(row = cell.row, col = cell.col, "cell flipped");
        self.redraw()?;
        Ok(cell)
    }

    /// Make `strategy` active for the next render. Does not redraw.
    pub fn select_strategy(&mut self, strategy: RenderStrategy) -> RenderStrategy {
        let previous = self.selector.select(strategy);
        self.host.panel().set_strategy_indicator(strategy);
        if previous != strategy {
            debug!(from = %previous, to = %strategy, "render strategy changed");
        }
        previous
    }

    /// Render the current state without advancing it.
    pub fn redraw(&mut self) -> Result<RenderPass, LifeError> {
        let strategy = self.selector.current();
        let pass = self
            .renderer
            .render(strategy, &mut self.engine, self.host.surface())?;
        self.renders += 1;
        trace!(renders = self.renders, %strategy, "frame rendered");
        Ok(pass)
    }

    /// Advance exactly one generation and render, while paused.
    ///
    /// Returns `Ok(false)` without touching anything while running.
    pub fn step_once(&mut self) -> Result<bool, LifeError> {
        if self.animator.is_running() {
            return Ok(false);
        }
        self.tick();
        self.redraw()?;
        Ok(true)
    }

    fn frame_cycle(&mut self) -> Result<FrameReport, LifeError> {
        let report = self.stats.record(self.host.clock().now_mono());
        self.tick();
        self.redraw()?;
        trace!(generation = self.generation, fps = report.latest, "frame");
        Ok(report)
    }

    fn tick(&mut self) {
        self.engine.tick();
        self.generation += 1;
    }

    fn sync_play_label(&mut self) {
        let label = self.animator.state().control_label();
        self.host.panel().set_play_label(label);
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access. Changes are not drawn until the next render.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.animator.state()
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        !self.animator.is_running()
    }

    #[must_use]
    pub const fn strategy(&self) -> RenderStrategy {
        self.selector.current()
    }

    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Renders performed so far, forced and animated.
    #[must_use]
    pub const fn render_count(&self) -> u64 {
        self.renders
    }

    /// Ticks performed so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn settings(&self) -> &RenderSettings {
        self.renderer.settings()
    }

    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        self.renderer.canvas_size()
    }

    #[must_use]
    pub const fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.layout.grid
    }
}
