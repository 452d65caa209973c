//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Viewport size (falls back to the default field when unavailable)
//! - Wall-clock time and match seeds

use crate::sim::Viewport;

/// Current viewport in CSS pixels
#[cfg(target_arch = "wasm32")]
pub fn viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        log::warn!("No window - using default viewport");
        return Viewport::default();
    };
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn viewport() -> Viewport {
    Viewport::default()
}

/// High-resolution timestamp (ms)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new match
#[cfg(target_arch = "wasm32")]
pub fn seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn seed() -> u64 {
    now_ms() as u64
}
