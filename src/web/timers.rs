use std::time::Duration;

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::describe;
use crate::scheduler::{TimerError, TimerHost};

/// A `setInterval` id together with the closure it calls.
/// The closure must outlive the interval, so both are dropped together.
pub struct IntervalHandle {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

#[derive(Debug, Clone)]
pub struct BrowserTimers {
    window: Window,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl TimerHost for BrowserTimers {
    type Handle = IntervalHandle;

    fn set_interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Result<IntervalHandle, TimerError> {
        let millis = i32::try_from(period.as_millis())
            .map_err(|_| TimerError(format!("interval of {period:?} exceeds setInterval range")))?;
        if millis == 0 {
            return Err(TimerError(format!("interval of {period:?} rounds to 0ms")));
        }

        let callback = Closure::<dyn FnMut()>::wrap(tick);
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), millis)
            .map_err(|e| TimerError(describe(&e)))?;
        Ok(IntervalHandle {
            id,
            _callback: callback,
        })
    }

    fn clear_interval(&self, handle: IntervalHandle) {
        self.window.clear_interval_with_handle(handle.id);
    }
}

/// Spawns onto the browser microtask queue
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
