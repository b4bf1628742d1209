//! WASM exports for the explorer.
//!
//! One [`ExplorerRunner`] lives in a `thread_local!` for the lifetime of the
//! page. Every export is a thin forward; calls made before `explorer_init`
//! are logged to the console and return a neutral value.

use std::cell::RefCell;

use orrery_core::{BodyId, OptionId, PointerEvent};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::ExplorerRunner;

thread_local! {
    static RUNNER: RefCell<Option<ExplorerRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut ExplorerRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                web_sys::console::warn_1(&"Explorer not initialized. Call explorer_init() first.".into());
                None
            }
        }
    })
}

/// 64 bits from `Math.random`, so each page load shuffles the quiz differently.
fn entropy_seed() -> u64 {
    let word = || (js_sys::Math::random() * 4_294_967_296.0) as u64;
    (word() << 32) | word()
}

/// Create the runner. An empty string uses the default configuration.
/// Returns false when the configuration is rejected.
#[wasm_bindgen]
pub fn explorer_init(config_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match ExplorerRunner::from_json(config_json, entropy_seed()) {
        Ok(runner) => {
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("orrery: initialized");
            true
        }
        Err(err) => {
            log::error!("orrery: bad configuration: {}", err);
            false
        }
    }
}

/// Drop the runner and everything it holds.
#[wasm_bindgen]
pub fn explorer_shutdown() {
    RUNNER.with(|cell| {
        if cell.borrow_mut().take().is_some() {
            log::info!("orrery: shut down");
        }
    });
}

// ---- Data ----

#[wasm_bindgen]
pub fn explorer_load(json: &str) -> bool {
    with_runner(|r| r.load_json(json).is_ok()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn explorer_load_seed() -> bool {
    with_runner(|r| match r.load_seeded() {
        Ok(()) => true,
        Err(err) => {
            log::error!("Bundled catalog rejected: {}", err);
            false
        }
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn explorer_data_unavailable(reason: &str) {
    with_runner(|r| r.data_unavailable(reason));
}

#[wasm_bindgen]
pub fn explorer_last_error() -> Option<String> {
    with_runner(|r| r.last_error().map(str::to_string)).flatten()
}

/// Answer a `GET` against the loaded catalog as `{ status, body }` JSON.
#[wasm_bindgen]
pub fn explorer_api_get(path: &str) -> String {
    with_runner(|r| r.api_get(path))
        .unwrap_or_else(|| r#"{"status":503,"body":{"message":"Not initialized"}}"#.to_string())
}

// ---- Navigation + scene ----

/// Apply a location change; returns the canonical path of the matched page.
#[wasm_bindgen]
pub fn explorer_navigate(path: &str) -> String {
    with_runner(|r| r.navigate(path).path()).unwrap_or_default()
}

/// Returns false once no scene is mounted so the caller can stop its
/// animation loop.
#[wasm_bindgen]
pub fn explorer_tick(dt: f64) -> bool {
    with_runner(|r| r.tick(dt)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn explorer_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

#[wasm_bindgen]
pub fn explorer_set_paused(paused: bool) {
    with_runner(|r| r.set_paused(paused));
}

#[wasm_bindgen]
pub fn explorer_set_speed(speed: f64) {
    with_runner(|r| r.set_speed(speed));
}

#[wasm_bindgen]
pub fn explorer_reset_camera() {
    with_runner(|r| r.reset_camera());
}

// ---- Input ----

#[wasm_bindgen]
pub fn explorer_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.pointer(PointerEvent::Down { x, y }));
}

#[wasm_bindgen]
pub fn explorer_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.pointer(PointerEvent::Move { x, y }));
}

#[wasm_bindgen]
pub fn explorer_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.pointer(PointerEvent::Up { x, y }));
}

#[wasm_bindgen]
pub fn explorer_pointer_cancel() {
    with_runner(|r| r.pointer(PointerEvent::Cancel));
}

#[wasm_bindgen]
pub fn explorer_wheel(delta: f32) {
    with_runner(|r| r.pointer(PointerEvent::Wheel { delta }));
}

// ---- Selection ----

#[wasm_bindgen]
pub fn explorer_select(id: u32) -> bool {
    with_runner(|r| r.select(BodyId(id))).unwrap_or(false)
}

/// Selected body id, or -1 before any catalog is loaded.
#[wasm_bindgen]
pub fn explorer_selected() -> i32 {
    with_runner(|r| r.selected().map(|id| id.0 as i32))
        .flatten()
        .unwrap_or(-1)
}

// ---- Quiz ----

#[wasm_bindgen]
pub fn quiz_start() -> bool {
    with_runner(|r| r.quiz_start()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn quiz_restart() -> bool {
    with_runner(|r| r.quiz_restart()).unwrap_or(false)
}

/// 1 correct, 0 incorrect, -1 rejected.
#[wasm_bindgen]
pub fn quiz_answer(option_id: u32) -> i32 {
    use orrery_core::AnswerOutcome;
    match with_runner(|r| r.quiz_answer(OptionId(option_id))) {
        Some(AnswerOutcome::Correct) => 1,
        Some(AnswerOutcome::Incorrect) => 0,
        Some(AnswerOutcome::Rejected(_)) | None => -1,
    }
}

/// 1 advanced, 2 completed, -1 rejected.
#[wasm_bindgen]
pub fn quiz_advance() -> i32 {
    use orrery_core::AdvanceOutcome;
    match with_runner(|r| r.quiz_advance()) {
        Some(AdvanceOutcome::Advanced) => 1,
        Some(AdvanceOutcome::Completed { .. }) => 2,
        Some(AdvanceOutcome::Rejected(_)) | None => -1,
    }
}

#[wasm_bindgen]
pub fn quiz_retreat() -> bool {
    with_runner(|r| r.quiz_retreat()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn quiz_view_json() -> String {
    with_runner(|r| serde_json::to_string(&r.quiz_view()).unwrap_or_default()).unwrap_or_default()
}

// ---- Frame buffer ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.frame_len()).unwrap_or(0)
}

/// Drain events raised outside the animation loop, as packed 4-float records.
#[wasm_bindgen]
pub fn explorer_take_events() -> js_sys::Float32Array {
    let events = with_runner(|r| r.take_events()).unwrap_or_default();
    js_sys::Float32Array::from(bytemuck::cast_slice::<_, f32>(&events))
}

#[wasm_bindgen]
pub fn explorer_take_events_json() -> String {
    let events = with_runner(|r| r.take_events()).unwrap_or_default();
    serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
}
