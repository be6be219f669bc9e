use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use super::describe;
use crate::snapshot::StatSnapshot;
use crate::source::{AsyncStatSource, SourceError};

/// Wraps a page-supplied function returning a snapshot object or a promise of one
#[derive(Debug, Clone)]
pub struct JsStatSource {
    supplier: Function,
}

impl JsStatSource {
    pub fn new(supplier: Function) -> Self {
        Self { supplier }
    }
}

impl AsyncStatSource for JsStatSource {
    fn fetch(&self) -> LocalBoxFuture<'static, Result<StatSnapshot, SourceError>> {
        let called = self.supplier.call0(&JsValue::NULL);
        Box::pin(async move {
            let value = called
                .map_err(|e| SourceError::Unavailable(format!("supplier threw: {}", describe(&e))))?;
            let resolved = JsFuture::from(Promise::resolve(&value))
                .await
                .map_err(|e| SourceError::Unavailable(format!("supplier rejected: {}", describe(&e))))?;
            let json = js_sys::JSON::stringify(&resolved)
                .ok()
                .and_then(|text| JsValue::from(text).as_string())
                .ok_or_else(|| SourceError::Unavailable("supplier returned no snapshot".to_string()))?;
            StatSnapshot::from_json(&json)
        })
    }
}
