#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::{Rc, Weak};
use std::time::Duration;

use lifecanvas_core::{
    AnimationState, BoundingBox, ControlPanel, Controller, DrawSurface, FrameHandle, FrameReport,
    FrameScheduler, Host, HostClock, LifeError, PointerEvent, RenderStrategy, Rgba,
};
use lifecanvas_engine::Universe;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement, HtmlElement, ImageData,
    MouseEvent, Window,
};
use web_time::Instant;

use crate::options::{ControlIds, WebOptions};

type WebController = Controller<Universe, WebHost>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
/// Set when a frame callback found the controller borrowed.
type MissedFrame = Rc<Cell<bool>>;

/// Install the panic hook and a console log subscriber when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second module instance on the page already installed one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .without_time()
        .with_target(false)
        .with_writer(ConsoleMakeWriter)
        .try_init();
}

fn host_err(value: JsValue) -> LifeError {
    LifeError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn js_err(err: LifeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ── Logging ─────────────────────────────────────────────────────────────

/// Buffers one formatted event and hands it to `console.log` on drop.
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

// ── Host primitives ─────────────────────────────────────────────────────

struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl DrawSurface for CanvasSurface {
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn put_pixels(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<(), LifeError> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba), width, height)
            .map_err(host_err)?;
        self.ctx.put_image_data(&image, 0.0, 0.0).map_err(host_err)
    }
}

/// `requestAnimationFrame` with a single callback installed after the
/// controller exists.
struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, LifeError> {
        let slot = self.callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| LifeError::Host("frame callback not installed".to_owned()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(host_err)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            tracing::warn!(handle = handle.0, error = ?err, "cancelAnimationFrame failed");
        }
    }
}

struct WebClock {
    origin: Instant,
}

impl HostClock for WebClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Default)]
struct DomPanel {
    play_pause: Option<HtmlElement>,
    fps: Option<HtmlElement>,
    strategies: Vec<(RenderStrategy, HtmlElement)>,
}

impl ControlPanel for DomPanel {
    fn set_play_label(&mut self, label: &str) {
        if let Some(button) = &self.play_pause {
            button.set_text_content(Some(label));
        }
    }

    fn set_strategy_indicator(&mut self, strategy: RenderStrategy) {
        for (candidate, button) in &self.strategies {
            let pressed = if *candidate == strategy { "true" } else { "false" };
            let _ = button.set_attribute("aria-pressed", pressed);
        }
    }

    fn show_frame_report(&mut self, report: &FrameReport) {
        if let Some(fps) = &self.fps {
            fps.set_text_content(Some(&report.to_string()));
        }
    }
}

struct WebHost {
    surface: CanvasSurface,
    scheduler: RafScheduler,
    clock: WebClock,
    panel: DomPanel,
}

impl Host for WebHost {
    type Surface = CanvasSurface;
    type Scheduler = RafScheduler;
    type Clock = WebClock;
    type Panel = DomPanel;

    fn surface(&mut self) -> &mut CanvasSurface {
        &mut self.surface
    }

    fn scheduler(&mut self) -> &mut RafScheduler {
        &mut self.scheduler
    }

    fn clock(&self) -> &WebClock {
        &self.clock
    }

    fn panel(&mut self) -> &mut DomPanel {
        &mut self.panel
    }
}

// ── JS API ──────────────────────────────────────────────────────────────

struct Listener {
    target: EventTarget,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

/// A Game-of-Life simulation drawn onto one `<canvas>`.
#[wasm_bindgen]
pub struct LifeCanvas {
    inner: Option<Rc<RefCell<WebController>>>,
    canvas: HtmlCanvasElement,
    frame_callback: FrameCallback,
    missed: MissedFrame,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl LifeCanvas {
    /// Build the engine and controller and size the canvas to the grid.
    ///
    /// `options` is an optional JSON document; see `WebOptions`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Result<LifeCanvas, JsValue> {
        let mut options = WebOptions::parse(options.as_deref()).map_err(js_err)?;
        options
            .universe
            .seed
            .get_or_insert_with(|| (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
        let universe = Universe::from_config(&options.universe).map_err(js_err)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = WebHost {
            surface: CanvasSurface { ctx },
            scheduler: RafScheduler {
                window,
                callback: Rc::clone(&frame_callback),
            },
            clock: WebClock {
                origin: Instant::now(),
            },
            panel: DomPanel::default(),
        };
        let controller = Controller::new(universe, host, &options.canvas).map_err(js_err)?;
        let (width, height) = controller.canvas_size();
        canvas.set_width(width);
        canvas.set_height(height);

        let inner = Rc::new(RefCell::new(controller));
        let weak = Rc::downgrade(&inner);
        let missed = MissedFrame::default();
        let flag = Rc::clone(&missed);
        *frame_callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Ok(mut ctl) = inner.try_borrow_mut() else {
                // The current borrower re-requests once it is done.
                tracing::warn!("controller busy; frame deferred");
                flag.set(true);
                return;
            };
            if let Err(err) = ctl.on_animation_frame() {
                tracing::error!(error = %err, "frame cycle failed");
            }
            settle_missed(&mut ctl, &flag);
        }));

        tracing::info!(width, height, "life canvas ready");
        Ok(Self {
            inner: Some(inner),
            canvas,
            frame_callback,
            missed,
            listeners: Vec::new(),
        })
    }

    /// Draw the first frame and start animating if `autoplay` is set.
    pub fn start(&self) -> Result<(), JsValue> {
        self.with(Controller::start)
    }

    /// Returns `false` if already running.
    pub fn play(&self) -> Result<bool, JsValue> {
        self.with(Controller::play)
    }

    /// Returns `false` if already paused.
    pub fn pause(&self) -> Result<bool, JsValue> {
        self.with(|ctl| Ok(ctl.pause()))
    }

    /// Returns whether the animation is running afterwards.
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> Result<bool, JsValue> {
        self.with(|ctl| {
            ctl.toggle_play_pause()
                .map(|state| state == AnimationState::Running)
        })
    }

    pub fn clear(&self) -> Result<(), JsValue> {
        self.with(Controller::clear)
    }

    pub fn randomize(&self) -> Result<(), JsValue> {
        self.with(Controller::randomize)
    }

    /// Advance one generation while paused.
    pub fn step(&self) -> Result<bool, JsValue> {
        self.with(Controller::step_once)
    }

    pub fn redraw(&self) -> Result<(), JsValue> {
        self.with(|ctl| ctl.redraw().map(drop))
    }

    /// Select `direct`, `delegated`, or `blit`; returns the previous name.
    #[wasm_bindgen(js_name = selectStrategy)]
    pub fn select_strategy(&self, name: &str) -> Result<String, JsValue> {
        self.with(|ctl| {
            let strategy = name.parse::<RenderStrategy>()?;
            Ok(ctl.select_strategy(strategy).name().to_owned())
        })
    }

    pub fn strategy(&self) -> Result<String, JsValue> {
        self.with(|ctl| Ok(ctl.strategy().name().to_owned()))
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> Result<bool, JsValue> {
        self.with(|ctl| Ok(ctl.is_paused()))
    }

    /// Flip the cell under a client-space point; returns `[row, col]`.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&self, client_x: f64, client_y: f64) -> Result<Vec<u32>, JsValue> {
        let bounds = bounds_of(&self.canvas);
        self.with(|ctl| {
            let cell = ctl.click(PointerEvent::new(client_x, client_y), bounds)?;
            Ok(vec![cell.row, cell.col])
        })
    }

    /// Wire up whichever page controls exist: `{prefix}btn-play-pause`,
    /// `btn-blank`, `btn-random`, `btn-step`, `strategy-direct|delegated|blit`,
    /// `fps`, and clicks on the canvas itself.
    #[wasm_bindgen(js_name = bindControls)]
    pub fn bind_controls(&mut self, prefix: Option<String>) -> Result<(), JsValue> {
        let inner = self
            .inner
            .clone()
            .ok_or_else(|| JsValue::from_str("LifeCanvas was destroyed"))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let ids = ControlIds::new(prefix.as_deref().unwrap_or(""));

        let play_pause = element(&document, &ids.play_pause());
        if let Some(button) = &play_pause {
            self.on_click(button, &inner, |ctl, _| ctl.toggle_play_pause().map(drop))?;
        }
        if let Some(button) = element(&document, &ids.blank()) {
            self.on_click(&button, &inner, |ctl, _| ctl.clear())?;
        }
        if let Some(button) = element(&document, &ids.random()) {
            self.on_click(&button, &inner, |ctl, _| ctl.randomize())?;
        }
        if let Some(button) = element(&document, &ids.step()) {
            self.on_click(&button, &inner, |ctl, _| ctl.step_once().map(drop))?;
        }

        let mut strategies = Vec::new();
        for strategy in RenderStrategy::ALL {
            if let Some(button) = element(&document, &ids.strategy(strategy)) {
                self.on_click(&button, &inner, move |ctl, _| {
                    ctl.select_strategy(strategy);
                    Ok(())
                })?;
                strategies.push((strategy, button));
            }
        }

        let canvas = self.canvas.clone();
        let target = canvas.clone();
        self.on_click(&target, &inner, move |ctl, event| {
            let pointer =
                PointerEvent::new(f64::from(event.client_x()), f64::from(event.client_y()));
            ctl.click(pointer, bounds_of(&canvas)).map(drop)
        })?;

        let mut ctl = inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("LifeCanvas is busy"))?;
        let state = ctl.state();
        let strategy = ctl.strategy();
        let panel = ctl.host_mut().panel();
        panel.play_pause = play_pause;
        panel.fps = element(&document, &ids.fps());
        panel.strategies = strategies;
        panel.set_play_label(state.control_label());
        panel.set_strategy_indicator(strategy);
        Ok(())
    }

    /// Stop animating, detach every listener, and release the controller.
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

impl LifeCanvas {
    fn with<T>(
        &self,
        f: impl FnOnce(&mut WebController) -> Result<T, LifeError>,
    ) -> Result<T, JsValue> {
        let inner = self
            .inner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("LifeCanvas was destroyed"))?;
        let mut ctl = inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("LifeCanvas is busy"))?;
        let result = f(&mut ctl).map_err(js_err);
        settle_missed(&mut ctl, &self.missed);
        result
    }

    fn on_click<F>(
        &mut self,
        target: &EventTarget,
        inner: &Rc<RefCell<WebController>>,
        mut action: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&mut WebController, &MouseEvent) -> Result<(), LifeError> + 'static,
    {
        let weak = Rc::downgrade(inner);
        let missed = Rc::clone(&self.missed);
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            with_weak(&weak, &missed, |ctl| action(ctl, &event));
        });
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            closure,
        });
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(inner) = self.inner.take() {
            if let Ok(mut ctl) = inner.try_borrow_mut() {
                ctl.pause();
            }
        }
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                "click",
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        self.frame_callback.borrow_mut().take();
    }
}

impl Drop for LifeCanvas {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Run `f` on the controller if it is still alive; failures are logged.
fn with_weak(
    weak: &Weak<RefCell<WebController>>,
    missed: &MissedFrame,
    f: impl FnOnce(&mut WebController) -> Result<(), LifeError>,
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let Ok(mut ctl) = inner.try_borrow_mut() else {
        tracing::warn!("controller busy; event dropped");
        return;
    };
    if let Err(err) = f(&mut ctl) {
        tracing::error!(error = %err, "life canvas action failed");
    }
    settle_missed(&mut ctl, missed);
}

/// Replace a frame callback that was dropped while `ctl` was borrowed.
fn settle_missed(ctl: &mut WebController, missed: &MissedFrame) {
    if missed.replace(false) {
        if let Err(err) = ctl.frame_missed() {
            tracing::error!(error = %err, "could not resume animation");
        }
    }
}

fn element(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

fn bounds_of(canvas: &HtmlCanvasElement) -> BoundingBox {
    let rect = canvas.get_bounding_client_rect();
    BoundingBox::new(rect.left(), rect.top(), rect.width(), rect.height())
}
