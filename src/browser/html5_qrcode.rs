//! `Html5Qrcode` bindings and the decoder host built on them.
//!
//! The library is loaded by the page as a global script, so the bindings
//! target the global constructor rather than an ES module. Every call checks
//! for the global first; calling into a missing global would throw a
//! `ReferenceError` outside our control.

use std::cell::RefCell;

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::JsFailure;
use crate::error::ScanError;
use crate::scanner::camera::CameraDevice;
use crate::scanner::host::{DecodeCallback, DecoderHost};
use crate::scanner::strategy::{CameraSelector, ScanSettings};

const LIBRARY_GLOBAL: &str = "Html5Qrcode";

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    type Html5Qrcode;

    #[wasm_bindgen(constructor, catch)]
    fn new(element_id: &str) -> Result<Html5Qrcode, JsValue>;

    #[wasm_bindgen(static_method_of = Html5Qrcode, js_name = getCameras, catch)]
    async fn get_cameras() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn start(
        this: &Html5Qrcode,
        camera: &JsValue,
        config: &JsValue,
        on_success: &Function,
        on_error: &Function,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn stop(this: &Html5Qrcode) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn clear(this: &Html5Qrcode) -> Result<(), JsValue>;
}

type SuccessClosure = Closure<dyn FnMut(String, JsValue)>;
type ErrorClosure = Closure<dyn FnMut(JsValue)>;

/// Decoder host for the mount element.
///
/// The widget is created on first use. Callbacks handed to `start` stay
/// alive until a stop succeeds, so an abandoned start that resolves late
/// never calls into a dropped closure.
pub struct Html5QrcodeHost {
    mount_id: String,
    widget: RefCell<Option<Html5Qrcode>>,
    callbacks: RefCell<Vec<(SuccessClosure, ErrorClosure)>>,
}

impl Html5QrcodeHost {
    #[must_use]
    pub fn new(mount_id: &str) -> Self {
        Self { mount_id: mount_id.to_owned(), widget: RefCell::new(None), callbacks: RefCell::new(Vec::new()) }
    }

    fn widget(&self) -> Result<Html5Qrcode, ScanError> {
        if let Some(widget) = self.widget.borrow().as_ref() {
            return Ok(widget.clone());
        }
        if !self.library_loaded() {
            return Err(ScanError::LibraryMissing);
        }
        let widget = Html5Qrcode::new(&self.mount_id).map_err(|err| ScanError::Widget(JsFailure::from_value(&err).to_string()))?;
        self.widget.replace(Some(widget.clone()));
        Ok(widget)
    }
}

impl DecoderHost for Html5QrcodeHost {
    fn mount_id(&self) -> &str {
        &self.mount_id
    }

    fn library_loaded(&self) -> bool {
        web_sys::window()
            .is_some_and(|window| Reflect::has(&window, &JsValue::from_str(LIBRARY_GLOBAL)).unwrap_or(false))
    }

    fn mount_present(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(&self.mount_id))
            .is_some()
    }

    async fn list_cameras(&self) -> Result<Vec<CameraDevice>, ScanError> {
        if !self.library_loaded() {
            return Err(ScanError::LibraryMissing);
        }
        let value = Html5Qrcode::get_cameras()
            .await
            .map_err(|err| ScanError::Enumeration(JsFailure::from_value(&err).to_string()))?;
        if value.is_null() || value.is_undefined() {
            return Ok(Vec::new());
        }
        serde_wasm_bindgen::from_value(value).map_err(|err| ScanError::Enumeration(err.to_string()))
    }

    async fn start(
        &self,
        selector: &CameraSelector,
        settings: &ScanSettings,
        on_decoded: DecodeCallback,
    ) -> Result<(), ScanError> {
        let widget = self.widget()?;
        let camera = serde_wasm_bindgen::to_value(&selector.constraint()).map_err(invalid_argument)?;
        let config = serde_wasm_bindgen::to_value(settings).map_err(invalid_argument)?;

        let on_success: SuccessClosure = Closure::new(move |text: String, _result: JsValue| on_decoded(&text));
        let on_error: ErrorClosure = Closure::new(|message: JsValue| log::trace!("no code in frame: {message:?}"));
        let success_fn = on_success.as_ref().unchecked_ref::<Function>().clone();
        let error_fn = on_error.as_ref().unchecked_ref::<Function>().clone();
        self.callbacks.borrow_mut().push((on_success, on_error));

        widget
            .start(&camera, &config, &success_fn, &error_fn)
            .await
            .map(|_| ())
            .map_err(|err| JsFailure::from_value(&err).into_start_error())
    }

    async fn stop(&self) -> Result<(), ScanError> {
        let Some(widget) = self.widget.borrow().clone() else {
            return Ok(());
        };
        widget.stop().await.map_err(|err| ScanError::Stop(JsFailure::from_value(&err).to_string()))?;
        self.callbacks.borrow_mut().clear();
        Ok(())
    }

    fn clear(&self) -> Result<(), ScanError> {
        let Some(widget) = self.widget.borrow().clone() else {
            return Ok(());
        };
        widget.clear().map_err(|err| ScanError::Stop(JsFailure::from_value(&err).to_string()))
    }
}

fn invalid_argument(err: serde_wasm_bindgen::Error) -> ScanError {
    ScanError::Start { name: "TypeError".to_owned(), message: err.to_string() }
}
