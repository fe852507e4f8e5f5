//! Camera selectors and the ordered fallback list used to start a session.
//!
//! DESIGN
//! ======
//! Starting a session walks [`fallback_strategies`] front to back and stops
//! at the first selector the decode library accepts. The order goes from the
//! most specific constraint (an exact device id) to none at all, so a
//! browser that rejects one form of constraint still gets a camera.

#[cfg(test)]
#[path = "strategy_test.rs"]
mod strategy_test;

use serde::Serialize;

const ENVIRONMENT: &str = "environment";

/// How the decode library should pick a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSelector {
    /// A specific device id, passed to the library as a bare string.
    Device(String),
    /// Rear camera, `facingMode: { exact: "environment" }`.
    RearExact,
    /// Rear camera if there is one, `facingMode: "environment"`.
    RearPreferred,
    /// No device constraint; the browser picks.
    EnvironmentDefault,
}

/// The JS value handed to the decode library's `start` as its camera argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CameraConstraint {
    DeviceId(String),
    Facing {
        #[serde(rename = "facingMode")]
        facing_mode: FacingMode,
    },
    Unconstrained {
        #[serde(rename = "deviceId")]
        device_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FacingMode {
    Exact { exact: &'static str },
    Ideal(&'static str),
}

impl CameraSelector {
    #[must_use]
    pub fn constraint(&self) -> CameraConstraint {
        match self {
            Self::Device(id) => CameraConstraint::DeviceId(id.clone()),
            Self::RearExact => CameraConstraint::Facing { facing_mode: FacingMode::Exact { exact: ENVIRONMENT } },
            Self::RearPreferred => CameraConstraint::Facing { facing_mode: FacingMode::Ideal(ENVIRONMENT) },
            Self::EnvironmentDefault => CameraConstraint::Unconstrained { device_id: None },
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Device(_) => "camera id",
            Self::RearExact => "facingMode=environment (exact)",
            Self::RearPreferred => "facingMode=environment (fallback)",
            Self::EnvironmentDefault => "default camera",
        }
    }
}

/// One entry in the fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartStrategy {
    pub selector: CameraSelector,
    pub description: &'static str,
}

impl From<CameraSelector> for StartStrategy {
    fn from(selector: CameraSelector) -> Self {
        let description = selector.description();
        Self { selector, description }
    }
}

/// Ordered start strategies. The explicit device comes first when known.
#[must_use]
pub fn fallback_strategies(device_id: Option<&str>) -> Vec<StartStrategy> {
    let explicit = device_id
        .filter(|id| !id.is_empty())
        .map(|id| CameraSelector::Device(id.to_owned()));

    explicit
        .into_iter()
        .chain([CameraSelector::RearExact, CameraSelector::RearPreferred, CameraSelector::EnvironmentDefault])
        .map(StartStrategy::from)
        .collect()
}

/// Decode loop settings passed to the library's `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSettings {
    /// Frames decoded per second.
    pub fps: u32,
    /// Side of the square scanning box in CSS pixels.
    pub qrbox: u32,
}
