use super::*;

fn camera(id: &str, label: &str) -> CameraDevice {
    CameraDevice { id: id.to_owned(), label: label.to_owned() }
}

#[test]
fn display_label_falls_back_to_position() {
    assert_eq!(camera("a", "").display_label(0), "Camera 1");
    assert_eq!(camera("b", "").display_label(2), "Camera 3");
    assert_eq!(camera("c", "Back Camera").display_label(0), "Back Camera");
}

#[test]
fn camera_device_deserializes_without_label() {
    let device: CameraDevice = serde_json::from_value(serde_json::json!({ "id": "cam-1" })).expect("device");
    assert_eq!(device, camera("cam-1", ""));
}

#[test]
fn media_device_describe_matches_diagnostics_format() {
    let device = MediaDevice { kind: "videoinput".into(), label: "FaceTime HD".into(), device_id: "abc".into() };
    assert_eq!(device.describe(1), "1. kind=videoinput label='FaceTime HD' id=abc");
    assert!(device.is_video_input());
}

#[test]
fn media_device_converts_into_camera() {
    let device = MediaDevice { kind: "videoinput".into(), label: "Rear".into(), device_id: "r-1".into() };
    assert_eq!(CameraDevice::from(device), camera("r-1", "Rear"));
}

#[test]
fn listing_options_use_device_ids_and_labels() {
    let listing = CameraListing::Devices(vec![camera("front", "Front"), camera("rear", "")]);
    assert_eq!(
        listing.options(),
        vec![("front".to_owned(), "Front".to_owned()), ("rear".to_owned(), "Camera 2".to_owned())]
    );
}

#[test]
fn failed_listing_yields_single_empty_placeholder() {
    let options = CameraListing::Unavailable(ListFailure::PermissionDenied).options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].0, "");
    assert_eq!(options[0].1, "Camera permission denied or unavailable");
}

#[test]
fn labels_hidden_requires_all_labels_empty() {
    assert!(labels_hidden(&[camera("a", ""), camera("b", "")]));
    assert!(!labels_hidden(&[camera("a", ""), camera("b", "Rear")]));
    assert!(!labels_hidden(&[]));
}
