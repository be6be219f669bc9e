use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document};

use crate::constants::host;
use crate::ready::{is_loaded, ReadySignal};

/// Ready signal for `document`: already fired unless the document is still
/// loading, otherwise fired by a one-time `DOMContentLoaded` listener.
pub fn document_ready(document: &Document) -> Result<ReadySignal, JsValue> {
    let signal = ReadySignal::new();
    if is_loaded(&document.ready_state()) {
        signal.fire();
        return Ok(signal);
    }

    let fire = signal.clone();
    let listener = Closure::once_into_js(move || fire.fire());
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        host::READY_EVENT,
        listener.unchecked_ref(),
        &options,
    )?;
    Ok(signal)
}
