//! Scanner failure categories.
//!
//! ERROR HANDLING
//! ==============
//! Every failure the scanner can hit is created at its origin as a
//! [`ScanError`] and rendered into a diagnostics line. None of them escape
//! to the page: operations degrade to an empty camera list or a stopped
//! session instead.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Html5Qrcode is not defined on window; was the library script loaded?")]
    LibraryMissing,
    #[error("no element with id \"{0}\" on the page")]
    MountMissing(String),
    #[error("could not create the decode widget: {0}")]
    Widget(String),
    #[error("{0} is not available in this browser")]
    ApiUnavailable(&'static str),
    #[error("camera permission denied or unavailable: {0}")]
    PermissionDenied(String),
    #[error("device enumeration failed: {0}")]
    Enumeration(String),
    #[error("start did not complete within {} ms", .0.as_millis())]
    StartTimeout(Duration),
    #[error("{name} - {message}")]
    Start { name: String, message: String },
    #[error("stop failed: {0}")]
    Stop(String),
    #[error("form submission failed: {0}")]
    Submit(String),
}
