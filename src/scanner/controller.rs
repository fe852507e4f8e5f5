//! Scanner controller: camera listing, session lifecycle and decode handling.
//!
//! DESIGN
//! ======
//! One controller per page owns the decode widget for the mount element and
//! at most one live session. Every public operation degrades instead of
//! failing: problems become diagnostics lines and the operation returns an
//! outcome value describing what happened.
//!
//! Start attempts run strictly one after another so two attempts never
//! claim the camera at the same time. A second `start_session` while one is
//! still in flight is turned away rather than queued. Each attempt races the library's
//! `start` against a timer; a timed-out attempt is dropped, not cancelled,
//! and whatever it resolves to later is ignored.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::Cell;
use std::pin::pin;
use std::rc::Rc;

use futures::future::{Either, select};

use super::camera::{CameraDevice, CameraListing, ListFailure, labels_hidden};
use super::diagnostics::DiagnosticSink;
use super::host::{CameraPicker, DecodeCallback, DecoderHost, MediaHost, ScanForm, Timer};
use super::strategy::{StartStrategy, fallback_strategies};
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::isbn::{Isbn, IsbnError, ScannedCode};

// =============================================================================
// OUTCOMES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(StartStrategy),
    /// Every strategy failed; the session stays stopped.
    Exhausted,
    /// Another start was still in flight; nothing was tried.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Fields filled and the form submitted.
    Submitted(Isbn),
    /// Fields filled but the submit failed; the next decode tries again.
    SubmitFailed(Isbn),
    /// Not an ISBN; the user was alerted and scanning continues.
    Rejected(IsbnError),
    /// A submission already fired this session, or there is no form to fill.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Shown,
    Failed,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct ScannerController<D, M, F, S, T> {
    decoder: D,
    media: M,
    form: F,
    diagnostics: S,
    timer: T,
    config: ScannerConfig,
    active: Cell<bool>,
    starting: Cell<bool>,
    submitted: Cell<bool>,
}

/// Clears the in-flight flag when a start finishes or its future is dropped.
struct StartGuard<'a>(&'a Cell<bool>);

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<D, M, F, S, T> ScannerController<D, M, F, S, T>
where
    D: DecoderHost,
    M: MediaHost,
    F: ScanForm,
    S: DiagnosticSink,
    T: Timer,
{
    pub fn new(decoder: D, media: M, form: F, diagnostics: S, timer: T, config: ScannerConfig) -> Self {
        Self {
            decoder,
            media,
            form,
            diagnostics,
            timer,
            config,
            active: Cell::new(false),
            starting: Cell::new(false),
            submitted: Cell::new(false),
        }
    }

    /// Whether a decode session is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    #[must_use]
    pub fn diagnostics(&self) -> &S {
        &self.diagnostics
    }

    #[must_use]
    pub fn form(&self) -> &F {
        &self.form
    }

    fn diag(&self, line: &str) {
        log::info!("{line}");
        self.diagnostics.append(line);
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    /// List available cameras, escalating to a permission prompt when the
    /// first query comes back empty or without labels.
    pub async fn list_cameras(&self) -> CameraListing {
        self.diag("Listing cameras with Html5Qrcode.getCameras()...");
        let first_pass = match self.decoder.list_cameras().await {
            Ok(devices) => devices,
            Err(err) => {
                log::error!("camera listing failed: {err}");
                self.diag(&format!("Error listing cameras with Html5Qrcode.getCameras(): {err}"));
                return CameraListing::Unavailable(ListFailure::ListingFailed);
            }
        };

        if !first_pass.is_empty() && !labels_hidden(&first_pass) {
            self.diag(&format!("Html5Qrcode.getCameras() found {} device(s).", first_pass.len()));
            return CameraListing::Devices(first_pass);
        }

        if first_pass.is_empty() {
            self.diag("No cameras found on first pass. Requesting camera permission...");
        } else {
            self.diag("Camera labels are hidden. Requesting camera permission...");
        }

        match self.escalate_listing().await {
            Ok(devices) => CameraListing::Devices(devices),
            Err(_) if !first_pass.is_empty() => {
                self.diag("Keeping unlabeled cameras from the first pass.");
                CameraListing::Devices(first_pass)
            }
            Err(reason) => CameraListing::Unavailable(reason),
        }
    }

    async fn escalate_listing(&self) -> Result<Vec<CameraDevice>, ListFailure> {
        if !self.media.user_media_available() {
            self.diag(&ScanError::ApiUnavailable("mediaDevices.getUserMedia").to_string());
            return Err(ListFailure::ApiUnavailable);
        }

        self.diag("Requesting camera permission (getUserMedia) to reveal device labels...");
        match self.media.acquire(None).await {
            Ok(stream) => self.media.release(&stream),
            Err(err) => {
                self.diag(&format!("Permission request failed: {err}"));
                return Err(ListFailure::PermissionDenied);
            }
        }

        match self.media.enumerate().await {
            Ok(devices) => {
                let cameras: Vec<CameraDevice> = devices
                    .into_iter()
                    .filter(|device| device.is_video_input())
                    .map(CameraDevice::from)
                    .collect();
                self.diag(&format!("enumerateDevices found {} videoinput(s).", cameras.len()));
                if !cameras.is_empty() {
                    return Ok(cameras);
                }
            }
            Err(err) => self.diag(&format!("Error enumerating devices after permission: {err}")),
        }

        match self.decoder.list_cameras().await {
            Ok(devices) if !devices.is_empty() => {
                self.diag(&format!("Html5Qrcode.getCameras() (second pass) found {} device(s).", devices.len()));
                return Ok(devices);
            }
            Ok(_) => {}
            Err(err) => self.diag(&format!("Error in Html5Qrcode.getCameras() second pass: {err}")),
        }

        Err(ListFailure::NoDevices)
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Start a decode session, trying each fallback strategy in order.
    ///
    /// Without a preferred device the first listed camera is used when the
    /// library can list one.
    pub async fn start_session(self: &Rc<Self>, preferred_device_id: Option<&str>) -> StartOutcome
    where
        Self: 'static,
    {
        if self.starting.replace(true) {
            self.diag("Scanner start already in progress; ignoring this request.");
            return StartOutcome::Busy;
        }
        let _in_flight = StartGuard(&self.starting);

        let mut device_id = preferred_device_id.filter(|id| !id.is_empty()).map(str::to_owned);
        self.diag(&format!("Starting scanner with camera: {}", device_id.as_deref().unwrap_or("<auto>")));

        self.diag("Stopping scanner if it was running...");
        self.halt().await;
        self.submitted.set(false);

        if device_id.is_none() {
            device_id = self.first_listed_camera().await;
        }

        let on_decoded = self.decode_callback();
        for strategy in fallback_strategies(device_id.as_deref()) {
            self.diag(&format!("Trying start with: {}", strategy.description));
            match self.try_start(&strategy, &on_decoded).await {
                Ok(()) => {
                    self.active.set(true);
                    self.diag(&format!("Scanner started with: {}", strategy.description));
                    return StartOutcome::Started(strategy);
                }
                Err(err) => {
                    log::warn!("start with {} failed: {err}", strategy.description);
                    self.diag(&format!("Error starting with {}: {err}", strategy.description));
                }
            }
        }

        self.diag("Could not start the scanner with any of the tried methods.");
        StartOutcome::Exhausted
    }

    async fn first_listed_camera(&self) -> Option<String> {
        self.diag("No camera id given; listing devices...");
        match self.decoder.list_cameras().await {
            Ok(devices) => {
                self.diag(&format!("Html5Qrcode.getCameras() returned {} device(s)", devices.len()));
                let first = devices.into_iter().next()?;
                let shown = if first.label.is_empty() { first.id.as_str() } else { first.label.as_str() };
                self.diag(&format!("Using first listed device: {shown}"));
                Some(first.id)
            }
            Err(err) => {
                self.diag(&format!("Could not list cameras to pick one automatically: {err}"));
                None
            }
        }
    }

    async fn try_start(&self, strategy: &StartStrategy, on_decoded: &DecodeCallback) -> Result<(), ScanError> {
        if !self.decoder.library_loaded() {
            return Err(ScanError::LibraryMissing);
        }
        if !self.decoder.mount_present() {
            return Err(ScanError::MountMissing(self.decoder.mount_id().to_owned()));
        }

        let start = pin!(self.decoder.start(&strategy.selector, &self.config.settings, Rc::clone(on_decoded)));
        let deadline = pin!(self.timer.sleep(self.config.start_timeout));
        match select(start, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ScanError::StartTimeout(self.config.start_timeout)),
        }
    }

    fn decode_callback(self: &Rc<Self>) -> DecodeCallback
    where
        Self: 'static,
    {
        let controller = Rc::downgrade(self);
        Rc::new(move |raw: &str| {
            if let Some(controller) = controller.upgrade() {
                controller.handle_decoded(raw);
            }
        })
    }

    /// Stop the live session and clear the view. Safe to call when nothing runs.
    pub async fn stop_session(&self) {
        if let Err(err) = self.decoder.stop().await {
            log::warn!("error stopping scanner: {err}");
        } else if let Err(err) = self.decoder.clear() {
            log::debug!("clear after stop failed: {err}");
        }
        self.active.set(false);
    }

    /// Stop ahead of a new start; failures only mean nothing was running.
    async fn halt(&self) {
        match self.decoder.stop().await {
            Ok(()) => {
                if let Err(err) = self.decoder.clear() {
                    log::debug!("clear after stop failed: {err}");
                }
            }
            Err(err) => log::debug!("scanner was not running: {err}"),
        }
        self.active.set(false);
    }

    /// Stop any running session ahead of page teardown.
    pub async fn dispose(&self) {
        self.halt().await;
        self.media.detach_all_previews();
    }

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------

    /// Handle one decoded frame.
    ///
    /// A 10- or 13-digit result fills both ISBN fields and submits the form,
    /// once per session; a submit that fails does not use up the session.
    /// Anything else alerts the user and keeps scanning.
    pub fn handle_decoded(&self, raw: &str) -> DecodeOutcome {
        log::info!("scan result: {raw}");
        if self.submitted.get() {
            return DecodeOutcome::Ignored;
        }

        let code = ScannedCode::new(raw);
        match code.isbn() {
            Ok(isbn) => {
                if !self.form.has_target() {
                    log::warn!("no ISBN field on the page; dropping scan {isbn}");
                    return DecodeOutcome::Ignored;
                }
                self.form.fill_isbn(isbn.as_str());
                match self.form.submit() {
                    Ok(()) => {
                        self.submitted.set(true);
                        DecodeOutcome::Submitted(isbn)
                    }
                    Err(err) => {
                        self.diag(&format!("Could not submit the ISBN form: {err}"));
                        DecodeOutcome::SubmitFailed(isbn)
                    }
                }
            }
            Err(err) => {
                log::debug!("rejected scan '{raw}': {err}");
                self.form.alert(&format!("Code detected but it does not look like a valid ISBN: {raw}"));
                DecodeOutcome::Rejected(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    /// Page-load sequence: device report, camera listing when the page has a
    /// picker, then the configured auto-start with the picked device.
    ///
    /// Returns the start outcome, or `None` when auto-start is off.
    pub async fn run_startup<P: CameraPicker>(self: &Rc<Self>, picker: Option<&P>) -> Option<StartOutcome>
    where
        Self: 'static,
    {
        self.enumerate_and_report().await;
        if let Some(picker) = picker {
            picker.show(&self.list_cameras().await);
        }
        if !self.config.auto_start {
            return None;
        }
        let device = picker.and_then(CameraPicker::selected);
        Some(self.start_session(device.as_deref()).await)
    }

    // -------------------------------------------------------------------------
    // Troubleshooting
    // -------------------------------------------------------------------------

    /// Show a raw camera stream for the configured preview window, then release it.
    pub async fn preview_camera(&self, device_id: Option<&str>) -> PreviewOutcome {
        self.diagnostics.clear();
        self.diag("Requesting camera access...");

        let stream = match self.media.acquire(device_id.filter(|id| !id.is_empty())).await {
            Ok(stream) => stream,
            Err(err) => {
                self.diag(&format!("Error getting camera stream: {err}"));
                return PreviewOutcome::Failed;
            }
        };

        if let Err(err) = self.media.attach_preview(&stream) {
            self.diag(&format!("Error showing camera preview: {err}"));
            self.media.release(&stream);
            return PreviewOutcome::Failed;
        }

        let secs = self.config.preview_duration.as_secs_f64();
        self.diag(&format!("Access granted. Showing preview for {secs}s..."));
        self.timer.sleep(self.config.preview_duration).await;
        self.media.release(&stream);
        self.media.detach_preview(&stream);
        self.diag("Preview stopped.");
        PreviewOutcome::Shown
    }

    /// Dump every media device and the camera permission state to diagnostics.
    pub async fn enumerate_and_report(&self) {
        self.diagnostics.clear();
        self.diag("Enumerating devices...");
        if !self.media.enumeration_available() {
            self.diag(&ScanError::ApiUnavailable("navigator.mediaDevices.enumerateDevices").to_string());
            return;
        }

        match self.media.enumerate().await {
            Ok(devices) => {
                for (index, device) in devices.iter().enumerate() {
                    self.diag(&device.describe(index + 1));
                }
            }
            Err(err) => self.diag(&format!("Error enumerating devices: {err}")),
        }

        if let Some(state) = self.media.camera_permission().await {
            self.diag(&format!("Camera permission: {state}"));
        }
    }
}
