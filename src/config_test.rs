use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn empty_lookup_yields_defaults() {
    let cfg = ScannerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, ScannerConfig::default());
    assert_eq!(cfg.settings, ScanSettings { fps: 10, qrbox: 250 });
    assert_eq!(cfg.start_timeout, Duration::from_secs(7));
    assert_eq!(cfg.preview_duration, Duration::from_secs(5));
    assert!(cfg.auto_start);
}

#[test]
fn overrides_are_parsed() {
    let cfg = ScannerConfig::from_lookup(lookup(&[
        (ATTR_FPS, "15"),
        (ATTR_QRBOX, " 300 "),
        (ATTR_START_TIMEOUT_MS, "2500"),
        (ATTR_PREVIEW_MS, "1000"),
        (ATTR_AUTO_START, "false"),
    ]))
    .unwrap();

    assert_eq!(cfg.settings, ScanSettings { fps: 15, qrbox: 300 });
    assert_eq!(cfg.start_timeout, Duration::from_millis(2500));
    assert_eq!(cfg.preview_duration, Duration::from_millis(1000));
    assert!(!cfg.auto_start);
}

#[test]
fn blank_value_counts_as_absent() {
    let cfg = ScannerConfig::from_lookup(lookup(&[(ATTR_FPS, "  "), (ATTR_AUTO_START, "")])).unwrap();
    assert_eq!(cfg.settings.fps, DEFAULT_FPS);
    assert!(cfg.auto_start);
}

#[test]
fn autostart_accepts_common_spellings() {
    for raw in ["0", "no", "OFF", "False"] {
        let cfg = ScannerConfig::from_lookup(lookup(&[(ATTR_AUTO_START, raw)])).unwrap();
        assert!(!cfg.auto_start, "{raw} should disable autostart");
    }
    let cfg = ScannerConfig::from_lookup(lookup(&[(ATTR_AUTO_START, "Yes")])).unwrap();
    assert!(cfg.auto_start);
}

#[test]
fn malformed_number_is_rejected() {
    let err = ScannerConfig::from_lookup(lookup(&[(ATTR_FPS, "fast")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: ATTR_FPS, value: "fast".into() });
    assert_eq!(err.to_string(), "invalid value for data-fps: 'fast'");
}

#[test]
fn zero_timeout_is_rejected() {
    let err = ScannerConfig::from_lookup(lookup(&[(ATTR_START_TIMEOUT_MS, "0")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: ATTR_START_TIMEOUT_MS, value: "0".into() });
}

#[test]
fn oversized_box_is_rejected() {
    let err = ScannerConfig::from_lookup(lookup(&[(ATTR_QRBOX, "99999999999")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: ATTR_QRBOX, .. }));
}

#[test]
fn unknown_autostart_value_is_rejected() {
    assert!(ScannerConfig::from_lookup(lookup(&[(ATTR_AUTO_START, "maybe")])).is_err());
}

#[test]
fn element_ids_match_page_templates() {
    let ids = ElementIds::default();
    assert_eq!(ids.reader, "reader");
    assert_eq!(ids.hidden_isbn, "scanned-isbn");
    assert_eq!(ids.visible_isbn, "scanned-isbn-display");
    assert_eq!(ids.form, "isbn-form");
    assert_eq!(ids.diagnostics, "scanner-diagnostics");
    assert_eq!(ids.theme_toggle, "theme-toggle");
    assert_eq!(ids.navbar, "main-navbar");
}
