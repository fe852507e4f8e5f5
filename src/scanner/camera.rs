//! Camera descriptors and the outcome of a camera listing.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::Deserialize;

/// A video input as reported by the decode library or by device enumeration.
///
/// `label` is empty until the user grants camera permission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl CameraDevice {
    /// Label shown in the camera picker; `index` is zero-based.
    #[must_use]
    pub fn display_label(&self, index: usize) -> String {
        if self.label.is_empty() { format!("Camera {}", index + 1) } else { self.label.clone() }
    }
}

/// Any media device from host enumeration (`videoinput`, `audioinput`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDevice {
    pub kind: String,
    pub label: String,
    pub device_id: String,
}

impl MediaDevice {
    #[must_use]
    pub fn is_video_input(&self) -> bool {
        self.kind == "videoinput"
    }

    /// One diagnostics line; `position` is one-based.
    #[must_use]
    pub fn describe(&self, position: usize) -> String {
        format!("{position}. kind={} label='{}' id={}", self.kind, self.label, self.device_id)
    }
}

impl From<MediaDevice> for CameraDevice {
    fn from(device: MediaDevice) -> Self {
        Self { id: device.device_id, label: device.label }
    }
}

/// Why no camera could be listed. Rendered as a single placeholder option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFailure {
    NoDevices,
    PermissionDenied,
    ApiUnavailable,
    ListingFailed,
}

impl ListFailure {
    #[must_use]
    pub fn placeholder_text(self) -> &'static str {
        match self {
            Self::NoDevices => "No cameras detected",
            Self::PermissionDenied => "Camera permission denied or unavailable",
            Self::ApiUnavailable => "Camera API not available",
            Self::ListingFailed => "Error listing cameras",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraListing {
    Devices(Vec<CameraDevice>),
    Unavailable(ListFailure),
}

impl CameraListing {
    /// `(value, text)` pairs for the camera picker.
    ///
    /// A failed listing yields one placeholder with an empty value, so
    /// starting from it falls back to automatic camera selection.
    #[must_use]
    pub fn options(&self) -> Vec<(String, String)> {
        match self {
            Self::Devices(devices) => devices
                .iter()
                .enumerate()
                .map(|(index, device)| (device.id.clone(), device.display_label(index)))
                .collect(),
            Self::Unavailable(reason) => vec![(String::new(), reason.placeholder_text().to_owned())],
        }
    }
}

/// True when every device still has an empty label (permission not granted yet).
#[must_use]
pub fn labels_hidden(devices: &[CameraDevice]) -> bool {
    !devices.is_empty() && devices.iter().all(|device| device.label.is_empty())
}
