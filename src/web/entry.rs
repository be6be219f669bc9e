use std::fmt::Display;

use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use super::{describe, document_ready, BrowserTimers, JsStatSource, WasmSpawner, WebDom};
use crate::app::{AppState, Host};
use crate::config::PanelOptions;
use crate::logging;
use crate::source::FixedStatSource;

fn to_js(error: impl Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

fn parse_options(options: &JsValue) -> Result<PanelOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(PanelOptions::default());
    }
    let json = js_sys::JSON::stringify(options)
        .ok()
        .and_then(|text| JsValue::from(text).as_string())
        .ok_or_else(|| to_js(format!("options are not serializable: {}", describe(options))))?;
    PanelOptions::from_json(&json).map_err(to_js)
}

/// Handle returned to the embedding script
#[wasm_bindgen]
pub struct QuickStatsPanel {
    app: AppState<WebDom>,
}

#[wasm_bindgen]
impl QuickStatsPanel {
    /// Stop refreshing and remove the panel from the page
    pub fn unmount(&self) -> Result<(), JsValue> {
        self.app.shutdown().map_err(to_js)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }
}

/// Mount the stats panel on the current page.
///
/// `supplier` is called on every refresh and may return a snapshot object or a
/// promise of one. Without it the panel shows fixed placeholder values.
/// Invalid options reject here and nothing is mounted.
#[wasm_bindgen(js_name = mountQuickStats)]
pub fn mount_quick_stats(options: JsValue, supplier: Option<js_sys::Function>) -> Result<QuickStatsPanel, JsValue> {
    let options = parse_options(&options)?;
    if logging::init(logging::parse_level(options.log_level())).is_err() {
        debug!("Logging already initialized");
    }
    let config = options.into_config().map_err(to_js)?;

    let window = web_sys::window().ok_or_else(|| to_js("no window"))?;
    let document = window.document().ok_or_else(|| to_js("no document"))?;
    let ready = document_ready(&document)?;
    let host = Host {
        timers: BrowserTimers::new(window),
        spawner: WasmSpawner,
    };
    let dom = WebDom::new(document);

    let app = match supplier {
        Some(supplier) => AppState::initialize_async(config, JsStatSource::new(supplier), dom, host, &ready),
        None => {
            info!("No stat supplier given, showing placeholder values");
            AppState::initialize(config, FixedStatSource::placeholder(), dom, host, &ready)
        }
    }
    .map_err(to_js)?;
    Ok(QuickStatsPanel { app })
}
