//! Seams between the scanner controller and the page it runs in.
//!
//! The controller only talks to these traits. The browser build implements
//! them with `wasm-bindgen`/`web-sys` in `crate::browser`; tests implement
//! them with in-memory fakes.

#![allow(async_fn_in_trait)]

use std::rc::Rc;
use std::time::Duration;

use super::camera::{CameraDevice, CameraListing, MediaDevice};
use super::strategy::{CameraSelector, ScanSettings};
use crate::error::ScanError;

/// Called with the raw text of every successfully decoded frame.
pub type DecodeCallback = Rc<dyn Fn(&str)>;

/// The barcode decode library bound to the mount element.
pub trait DecoderHost {
    /// Id of the element the live view is mounted into.
    fn mount_id(&self) -> &str;

    /// Whether the library global is present.
    fn library_loaded(&self) -> bool;

    /// Whether the mount element exists.
    fn mount_present(&self) -> bool;

    /// The library's static camera query.
    async fn list_cameras(&self) -> Result<Vec<CameraDevice>, ScanError>;

    /// Start a decode session. Resolves once the camera is streaming.
    async fn start(
        &self,
        selector: &CameraSelector,
        settings: &ScanSettings,
        on_decoded: DecodeCallback,
    ) -> Result<(), ScanError>;

    /// Stop the running session. Fails when nothing is running.
    async fn stop(&self) -> Result<(), ScanError>;

    /// Clear the live view.
    fn clear(&self) -> Result<(), ScanError>;
}

/// Host camera hardware, device enumeration and the raw preview surface.
pub trait MediaHost {
    type Stream;

    fn user_media_available(&self) -> bool;

    fn enumeration_available(&self) -> bool;

    /// Acquire a video stream, from `device_id` exactly when given.
    async fn acquire(&self, device_id: Option<&str>) -> Result<Self::Stream, ScanError>;

    /// Stop every track of `stream`.
    fn release(&self, stream: &Self::Stream);

    /// All media devices, any kind.
    async fn enumerate(&self) -> Result<Vec<MediaDevice>, ScanError>;

    /// Camera permission state (`granted`, `prompt`, `denied`) when the host can report it.
    async fn camera_permission(&self) -> Option<String>;

    /// Show `stream` in its own preview element.
    fn attach_preview(&self, stream: &Self::Stream) -> Result<(), ScanError>;

    /// Remove the preview element showing `stream`, leaving other previews alone.
    fn detach_preview(&self, stream: &Self::Stream);

    /// Remove every preview element.
    fn detach_all_previews(&self);
}

/// The ISBN form and inline alerts.
pub trait ScanForm {
    /// Whether the hidden ISBN field exists. Without it scans are not forwarded.
    fn has_target(&self) -> bool;

    /// Write `isbn` into the hidden and the visible field.
    fn fill_isbn(&self, isbn: &str);

    fn submit(&self) -> Result<(), ScanError>;

    fn alert(&self, message: &str);
}

pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// The camera picker the user chooses a device from.
pub trait CameraPicker {
    fn show(&self, listing: &CameraListing);

    /// The picked device id; `None` while the placeholder is selected.
    fn selected(&self) -> Option<String>;
}
