#![forbid(unsafe_code)]

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::page::{PageConfig, PageModel};

fn js_array_from_strings(items: &[String]) -> Array {
    let arr = Array::new_with_length(items.len() as u32);
    for (idx, item) in items.iter().enumerate() {
        arr.set(idx as u32, JsValue::from_str(item));
    }
    arr
}

fn js_error(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Upload page state exported to the browser host.
///
/// The host scans the document once, constructs this object, forwards every
/// interaction through `pushEncodedEvent`, and applies the JSON patches from
/// `drainPatches` to the DOM.
#[wasm_bindgen]
pub struct TrackFormWeb {
    page: PageModel,
}

#[wasm_bindgen]
impl TrackFormWeb {
    /// Build from the `track_image_*` names and the table nicknames found in
    /// the document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        field_names: Vec<String>,
        table_rows: Vec<String>,
    ) -> Result<TrackFormWeb, JsValue> {
        let page =
            PageModel::new(PageConfig::default(), field_names, table_rows).map_err(js_error)?;
        Ok(Self { page })
    }

    /// Dispatch one encoded event; returns the outcome as JSON.
    #[wasm_bindgen(js_name = pushEncodedEvent)]
    pub fn push_encoded_event(&mut self, json: &str) -> Result<String, JsValue> {
        let outcome = self.page.dispatch_encoded(json).map_err(js_error)?;
        serde_json::to_string(&outcome).map_err(js_error)
    }

    /// Pending DOM patches as a JSON array.
    #[wasm_bindgen(js_name = drainPatches)]
    pub fn drain_patches(&mut self) -> Result<String, JsValue> {
        let patches = self.page.drain_patches();
        serde_json::to_string(&patches).map_err(js_error)
    }

    /// Field names in document order.
    #[wasm_bindgen(js_name = fieldNames)]
    pub fn field_names(&self) -> Array {
        js_array_from_strings(self.page.field_names())
    }

    /// Whether the zoom overlay is showing.
    #[wasm_bindgen(js_name = modalOpen)]
    pub fn modal_open(&self) -> bool {
        self.page.modal().is_open()
    }
}
