use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::math::Vec2;
use foundation::time::Millis;
use loader::{ExtensionRegistry, Loader};
use scene::resolver::WorldChange;
use scene::{Camera2D, Session};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

pub mod config;
pub mod host;
pub mod render;

use config::{ControlConfig, site};
use host::{DomHost, GlooSource};

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static LOGGER_SET: OnceLock<()> = OnceLock::new();

struct AppState {
    session: Session<HtmlElement>,
    camera: Camera2D,
    canvas: Option<HtmlCanvasElement>,
    ctx_2d: Option<CanvasRenderingContext2d>,
    controls: ControlConfig,
    /// Last pointer position while dragging, in canvas pixels.
    drag_last_px: Option<Vec2>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::new(),
            camera: Camera2D::new(Vec2::new(1280.0, 720.0)),
            canvas: None,
            ctx_2d: None,
            controls: ControlConfig::default(),
            drag_last_px: None,
        }
    }
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<AppState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

/// Borrows the session for the duration of `f`. Never held across an await.
pub(crate) fn with_session<R>(f: impl FnOnce(&mut Session<HtmlElement>) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut().session))
}

/// Moves the camera to `center`, cancelling any snap or inertia.
pub(crate) fn center_camera(center: Vec2) {
    with_state(|state| state.borrow_mut().camera.move_center(center));
}

fn init_logging() {
    LOGGER_SET.get_or_init(|| {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger init: {err}")));
        }
    });
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_logging();
    if let Err(err) = boot() {
        log::error!("startup failed: {err:?}");
        return Err(err);
    }
    Ok(())
}

fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(site::STAGE_CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("missing world-canvas"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let host = DomHost::new(document.clone())?;
    let wired = host::rewire_header_links(&document)?;
    log::debug!("rewired {wired} header links");

    with_state(|state| {
        let mut s = state.borrow_mut();
        s.canvas = Some(canvas.clone());
        s.ctx_2d = Some(ctx);
    });
    resize_to_window()?;
    install_input_listeners(&window, &canvas)?;
    start_render_loop()?;

    spawn_local(async move {
        let loader = Loader::new(GlooSource, host).with_extensions(ExtensionRegistry::with_builtins());
        let report = loader.load_root(site::ROOT_URL).await;
        log::info!(
            "loaded {} worlds, {} overlays, {} asides ({} problems)",
            report.worlds,
            report.overlays,
            report.asides,
            report.errors.len()
        );
        if let Err(err) = remove_loading_cover(loader.host().document()) {
            log::warn!("loading cover: {err:?}");
        }
    });
    Ok(())
}

fn remove_loading_cover(document: &web_sys::Document) -> Result<(), JsValue> {
    if let Some(cover) = document.get_element_by_id(site::LOADING_COVER_ID) {
        cover.remove();
    }
    Ok(())
}

fn resize_to_window() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let width = window.inner_width()?.as_f64().unwrap_or(1280.0);
    let height = window.inner_height()?.as_f64().unwrap_or(720.0);
    set_canvas_sizes(width, height);
    Ok(())
}

/// Resizes the stage canvas and the camera viewport.
#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) {
    with_state(|state| {
        let mut s = state.borrow_mut();
        if let Some(canvas) = &s.canvas {
            canvas.set_width(width.max(1.0) as u32);
            canvas.set_height(height.max(1.0) as u32);
        }
        s.camera.set_viewport(Vec2::new(width.max(1.0), height.max(1.0)));
    });
}

fn install_input_listeners(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let on_resize = Closure::wrap(Box::new(move || {
        if let Err(err) = resize_to_window() {
            log::warn!("resize: {err:?}");
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let on_down = Closure::wrap(Box::new(move |e: web_sys::PointerEvent| {
        let _ = camera_drag_begin(e.offset_x() as f64, e.offset_y() as f64);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_move = Closure::wrap(Box::new(move |e: web_sys::PointerEvent| {
        let _ = camera_drag_move(e.offset_x() as f64, e.offset_y() as f64);
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    for event in ["pointerup", "pointercancel", "pointerleave"] {
        let on_up = Closure::wrap(Box::new(move |_e: web_sys::PointerEvent| {
            let _ = camera_drag_end();
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(event, on_up.as_ref().unchecked_ref())?;
        on_up.forget();
    }

    let on_wheel = Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
        e.prevent_default();
        let _ = camera_zoom_at(e.offset_x() as f64, e.offset_y() as f64, e.delta_y());
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();
    Ok(())
}

fn set_body_cursor(cursor: &str) {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        let _ = body.style().set_property("cursor", cursor);
    }
}

#[wasm_bindgen]
pub fn camera_drag_begin(x_px: f64, y_px: f64) -> Result<(), JsValue> {
    let now = Millis(now_ms());
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.drag_last_px = Some(Vec2::new(x_px, y_px));
        s.camera.begin_drag(now);
    });
    set_body_cursor("grabbing");
    Ok(())
}

#[wasm_bindgen]
pub fn camera_drag_move(x_px: f64, y_px: f64) -> Result<(), JsValue> {
    let now = Millis(now_ms());
    with_state(|state| {
        let mut s = state.borrow_mut();
        let Some(last) = s.drag_last_px else {
            return;
        };
        let pos = Vec2::new(x_px, y_px);
        s.drag_last_px = Some(pos);
        let delta = (pos - last).scale(s.controls.pan_sensitivity);
        s.camera.drag_by(delta, now);
    });
    Ok(())
}

/// Ends a pointer drag; with kinetic panning enabled the camera coasts.
#[wasm_bindgen]
pub fn camera_drag_end() -> Result<(), JsValue> {
    let now = Millis(now_ms());
    let was_dragging = with_state(|state| {
        let mut s = state.borrow_mut();
        let kinetic = s.controls.kinetic_panning;
        s.camera.end_drag(now, kinetic);
        s.drag_last_px.take().is_some()
    });
    if was_dragging {
        // back to unset, the page decides
        set_body_cursor("");
    }
    Ok(())
}

/// Zooms about the cursor. Positive `wheel_delta_y` zooms out.
#[wasm_bindgen]
pub fn camera_zoom_at(x_px: f64, y_px: f64, wheel_delta_y: f64) -> Result<(), JsValue> {
    if !x_px.is_finite() || !y_px.is_finite() || !wheel_delta_y.is_finite() {
        return Err(JsValue::from_str("camera_zoom_at args must be finite"));
    }
    with_state(|state| {
        let mut s = state.borrow_mut();
        let factor = s.controls.wheel_zoom_factor(wheel_delta_y);
        s.camera.interrupt();
        s.camera.zoom_about(Vec2::new(x_px, y_px), factor);
    });
    Ok(())
}

/// Animates the camera to the world registered for `href` (origin if none).
#[wasm_bindgen]
pub fn navigate_to(href: &str) {
    let now = Millis(now_ms());
    with_state(|state| {
        let mut s = state.borrow_mut();
        let target = s.session.link_target(href);
        let duration = s.controls.snap_duration_ms;
        s.camera.snap_to(target, duration, now);
        log::debug!("link {href} -> ({}, {})", target.x, target.y);
    });
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> Result<(), JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(f.as_ref().unchecked_ref())?;
    Ok(())
}

fn start_render_loop() -> Result<(), JsValue> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if let Err(err) = advance_frame(ts) {
            log::error!("frame: {err:?}");
        }
        if let Some(cb) = f.borrow().as_ref()
            && let Err(err) = request_animation_frame(cb)
        {
            log::error!("requestAnimationFrame: {err:?}");
        }
    }) as Box<dyn FnMut(f64)>));
    match g.borrow().as_ref() {
        Some(cb) => request_animation_frame(cb),
        None => Ok(()),
    }
}

/// One render tick: camera motion, stage draw, overlay sync, then active
/// world resolution.
fn advance_frame(now: f64) -> Result<(), JsValue> {
    let change = STATE
        .try_with(|state| tick_state(&mut state.borrow_mut(), Millis(now)))
        .map_err(|e| JsValue::from_str(&e.to_string()))??;
    if let Some(change) = change {
        apply_world_change(&change)?;
    }
    Ok(())
}

fn tick_state(s: &mut AppState, now: Millis) -> Result<Option<WorldChange>, JsValue> {
    let frame = s.session.tick(now);
    s.camera.advance(now, frame.dt_ms, s.controls.inertia_damping);

    if let Some(ctx) = &s.ctx_2d {
        render::draw_stage(ctx, &s.camera, &s.session.stage)?;
    }
    s.session.sync_overlays(&s.camera, |el, transform| {
        let _ = el.style().set_property("transform", transform);
    });

    let Some(change) = s.session.resolve_active(s.camera.center()) else {
        return Ok(None);
    };
    for (el, visible) in s.session.asides.visibility(&change.url) {
        el.class_list().toggle_with_force(site::HIDDEN_CLASS, !visible)?;
    }
    Ok(Some(change))
}

fn apply_world_change(change: &WorldChange) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    if let Some(document) = window.document() {
        document.set_title(&change.name);
    }
    window
        .history()?
        .push_state_with_url(&JsValue::NULL, "", Some(&change.url))
}

// ── Control configuration WASM exports ──────────────────────────────────────

/// Return control config as a JSON string for JS consumption.
#[wasm_bindgen]
pub fn get_control_config() -> String {
    with_state(|state| serde_json::to_string(&state.borrow().controls).unwrap_or_default())
}

/// Update a single control config field by key.
#[wasm_bindgen]
pub fn set_control_config(key: &str, value: f64) -> Result<(), JsValue> {
    let known = with_state(|state| {
        let mut s = state.borrow_mut();
        let known = s.controls.set(key, value);
        let (min, max) = (s.controls.min_zoom, s.controls.max_zoom);
        s.camera.set_scale_limits(min, max);
        known
    });
    if known {
        Ok(())
    } else {
        Err(JsValue::from_str(&format!("unknown or invalid control '{key}'")))
    }
}

/// Reset all control config to defaults.
#[wasm_bindgen]
pub fn reset_control_config() -> Result<(), JsValue> {
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.controls = ControlConfig::default();
        let (min, max) = (s.controls.min_zoom, s.controls.max_zoom);
        s.camera.set_scale_limits(min, max);
    });
    Ok(())
}

// ── Debug surface ───────────────────────────────────────────────────────────

/// Registered worlds (bounded, in resolution order, plus the main world) as JSON.
#[wasm_bindgen]
pub fn debug_worlds() -> String {
    with_state(|state| serde_json::to_string(&state.borrow().session.worlds).unwrap_or_default())
}

#[wasm_bindgen]
pub fn debug_main_world() -> String {
    with_state(|state| {
        serde_json::to_string(&state.borrow().session.worlds.main()).unwrap_or_default()
    })
}

/// Recorded diagnostics as JSON.
#[wasm_bindgen]
pub fn debug_events() -> String {
    with_state(|state| {
        serde_json::to_string(state.borrow().session.events.events()).unwrap_or_default()
    })
}

#[wasm_bindgen]
pub fn get_camera_center() -> Vec<f64> {
    with_state(|state| {
        let c = state.borrow().camera.center();
        vec![c.x, c.y]
    })
}
