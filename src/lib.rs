//! Cat Clock core crate.
//!
//! An elapsed-time clock for the browser that spawns a wandering cat every
//! configured interval. `start_clock()` wires the page; the timing, interval,
//! placement and walking logic live in plain modules so they test natively.

use wasm_bindgen::prelude::*;

/// Log to browser console
macro_rules! console_log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

pub mod clock;
pub mod config;
pub mod interval;
mod page;
pub mod placement;
pub mod rng;
pub mod walker;

pub use clock::{ElapsedClock, format_hms};
pub use config::ClockConfig;
pub use interval::{IntervalUnit, SettingsError, SpawnInterval, SpawnSchedule};
pub use page::start_clock;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Override page tunables from a JSON object, e.g. `{"cat_size_px": 64}`.
/// Call before `start_clock()` for everything to take effect.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = ClockConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    page::set_config(config);
    Ok(())
}

/// Validate interval inputs from JS without touching the page. Returns milliseconds.
#[wasm_bindgen]
pub fn interval_ms(value: &str, unit: &str) -> Result<f64, JsValue> {
    Ok(SpawnInterval::parse(value, unit)?.as_ms() as f64)
}

/// `performance.now()`, or 0 outside a browser window.
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
