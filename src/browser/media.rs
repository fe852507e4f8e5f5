//! Camera hardware through `navigator.mediaDevices`, plus the test preview.

use std::cell::RefCell;
use std::time::Duration;

use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlVideoElement, MediaDevices, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use super::{JsFailure, property, string_field};
use crate::error::ScanError;
use crate::scanner::camera::MediaDevice;
use crate::scanner::host::{MediaHost, Timer};

const PREVIEW_STYLE: &str = "max-width: 240px; display: block";

#[derive(Serialize)]
struct ExactDevice<'a> {
    #[serde(rename = "deviceId")]
    device_id: Exact<'a>,
}

#[derive(Serialize)]
struct Exact<'a> {
    exact: &'a str,
}

#[derive(Serialize)]
struct PermissionQuery {
    name: &'static str,
}

fn media_devices() -> Result<MediaDevices, ScanError> {
    let window = web_sys::window().ok_or(ScanError::ApiUnavailable("window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| ScanError::ApiUnavailable("navigator.mediaDevices"))?;
    // Insecure origins expose `mediaDevices` as undefined rather than throwing.
    if devices.is_undefined() {
        return Err(ScanError::ApiUnavailable("navigator.mediaDevices"));
    }
    Ok(devices)
}

fn has_method(devices: &MediaDevices, name: &str) -> bool {
    Reflect::has(devices, &JsValue::from_str(name)).unwrap_or(false)
}

fn denied(err: &JsValue) -> ScanError {
    ScanError::PermissionDenied(JsFailure::from_value(err).to_string())
}

fn enumeration_failed(err: &JsValue) -> ScanError {
    ScanError::Enumeration(JsFailure::from_value(err).to_string())
}

/// Previews are keyed by stream id so overlapping previews tear down independently.
pub struct BrowserMedia {
    document: Document,
    preview_host_id: &'static str,
    previews: RefCell<Vec<(String, HtmlVideoElement)>>,
}

impl BrowserMedia {
    /// `preview_host_id` is the element the test preview video is appended to.
    #[must_use]
    pub fn new(document: &Document, preview_host_id: &'static str) -> Self {
        Self { document: document.clone(), preview_host_id, previews: RefCell::new(Vec::new()) }
    }

    fn preview_host(&self) -> Result<Element, ScanError> {
        self.document
            .get_element_by_id(self.preview_host_id)
            .ok_or_else(|| ScanError::MountMissing(self.preview_host_id.to_owned()))
    }

    fn video_element(&self) -> Result<HtmlVideoElement, ScanError> {
        let widget_error = |err: JsValue| ScanError::Widget(JsFailure::from_value(&err).to_string());
        let video = self
            .document
            .create_element("video")
            .map_err(widget_error)?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| ScanError::Widget("created element is not a <video>".to_owned()))?;
        video.set_attribute("style", PREVIEW_STYLE).map_err(widget_error)?;
        video.set_attribute("playsinline", "").map_err(widget_error)?;
        video.set_autoplay(true);
        Ok(video)
    }
}

impl MediaHost for BrowserMedia {
    type Stream = MediaStream;

    fn user_media_available(&self) -> bool {
        media_devices().is_ok_and(|devices| has_method(&devices, "getUserMedia"))
    }

    fn enumeration_available(&self) -> bool {
        media_devices().is_ok_and(|devices| has_method(&devices, "enumerateDevices"))
    }

    async fn acquire(&self, device_id: Option<&str>) -> Result<MediaStream, ScanError> {
        let devices = media_devices()?;
        let video = match device_id {
            Some(id) => serde_wasm_bindgen::to_value(&ExactDevice { device_id: Exact { exact: id } })
                .map_err(|err| ScanError::PermissionDenied(err.to_string()))?,
            None => JsValue::TRUE,
        };
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);

        let promise = devices.get_user_media_with_constraints(&constraints).map_err(|err| denied(&err))?;
        let stream = JsFuture::from(promise).await.map_err(|err| denied(&err))?;
        stream
            .dyn_into::<MediaStream>()
            .map_err(|_| ScanError::PermissionDenied("getUserMedia did not return a MediaStream".to_owned()))
    }

    fn release(&self, stream: &MediaStream) {
        for track in stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
    }

    async fn enumerate(&self) -> Result<Vec<MediaDevice>, ScanError> {
        let devices = media_devices()?;
        let promise = devices.enumerate_devices().map_err(|err| enumeration_failed(&err))?;
        let list = JsFuture::from(promise).await.map_err(|err| enumeration_failed(&err))?;
        Ok(Array::from(&list)
            .iter()
            .map(|info| MediaDevice {
                kind: string_field(&info, "kind"),
                label: string_field(&info, "label"),
                device_id: string_field(&info, "deviceId"),
            })
            .collect())
    }

    async fn camera_permission(&self) -> Option<String> {
        let permissions = web_sys::window()?.navigator().permissions().ok()?;
        if permissions.is_undefined() {
            return None;
        }
        let descriptor = serde_wasm_bindgen::to_value(&PermissionQuery { name: "camera" }).ok()?;
        let promise = permissions.query(descriptor.unchecked_ref::<Object>()).ok()?;
        // Some browsers reject querying "camera"; that is not worth reporting.
        let status = JsFuture::from(promise).await.ok()?;
        property(&status, "state")
    }

    fn attach_preview(&self, stream: &MediaStream) -> Result<(), ScanError> {
        let host = self.preview_host()?;
        let video = self.video_element()?;
        video.set_src_object(Some(stream));
        host.append_child(&video)
            .map_err(|err| ScanError::Widget(JsFailure::from_value(&err).to_string()))?;
        self.previews.borrow_mut().push((stream.id(), video));
        Ok(())
    }

    fn detach_preview(&self, stream: &MediaStream) {
        let id = stream.id();
        self.previews.borrow_mut().retain(|(shown, video)| {
            if *shown != id {
                return true;
            }
            remove_video(video);
            false
        });
    }

    fn detach_all_previews(&self) {
        for (_, video) in self.previews.borrow_mut().drain(..) {
            remove_video(&video);
        }
    }
}

fn remove_video(video: &HtmlVideoElement) {
    video.set_src_object(None);
    video.remove();
}

/// Browser timer backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
