//! Browser bindings (wasm32 only)
//!
//! Implements the document, timer, spawner and readiness seams on top of
//! `web_sys`, and exports `mountQuickStats` to the embedding script.

mod dom;
mod entry;
mod ready;
mod source;
mod timers;

pub use dom::WebDom;
pub use entry::{mount_quick_stats, QuickStatsPanel};
pub use ready::document_ready;
pub use source::JsStatSource;
pub use timers::{BrowserTimers, IntervalHandle, WasmSpawner};

use wasm_bindgen::JsValue;

/// Readable message for a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(value)
                .ok()
                .and_then(|text| JsValue::from(text).as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
