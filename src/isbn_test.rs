use super::*;

// =============================================================
// digits_only
// =============================================================

#[test]
fn digits_only_strips_hyphens_and_letters() {
    assert_eq!(digits_only("978-3-16-148410-0"), "9783161484100");
    assert_eq!(digits_only("ABC123"), "123");
}

#[test]
fn digits_only_drops_check_character_x() {
    assert_eq!(digits_only("0-8044-2957-X"), "080442957");
}

#[test]
fn digits_only_ignores_non_ascii_digits() {
    assert_eq!(digits_only("١٢٣45"), "45");
}

// =============================================================
// ScannedCode::isbn
// =============================================================

#[test]
fn hyphenated_isbn13_is_accepted() {
    let code = ScannedCode::new("978-3-16-148410-0");
    let isbn = code.isbn().expect("13 digits");
    assert_eq!(isbn.as_str(), "9783161484100");
    assert!(isbn.is_isbn13());
    assert!(isbn.has_bookland_prefix());
}

#[test]
fn isbn10_is_accepted_without_checksum() {
    let isbn = ScannedCode::new("0306406152").isbn().expect("10 digits");
    assert_eq!(isbn.to_string(), "0306406152");
    assert!(!isbn.is_isbn13());
    assert!(!isbn.has_bookland_prefix());
}

#[test]
fn invalid_checksum_is_still_accepted() {
    assert!(ScannedCode::new("9783161484109").isbn().is_ok());
}

#[test]
fn thirteen_digits_without_bookland_prefix_is_accepted() {
    let isbn = ScannedCode::new("4006381333931").isbn().expect("13 digits");
    assert!(!isbn.has_bookland_prefix());
}

#[test]
fn short_code_is_rejected() {
    let err = ScannedCode::new("ABC123").isbn().unwrap_err();
    assert_eq!(err, IsbnError::WrongLength { digits: "123".into() });
    assert_eq!(err.to_string(), "expected 10 or 13 digits, found 3");
}

#[test]
fn lengths_other_than_ten_and_thirteen_are_rejected() {
    for len in [0, 1, 9, 11, 12, 14, 20] {
        let raw = "7".repeat(len);
        assert!(ScannedCode::new(&raw).isbn().is_err(), "length {len} should be rejected");
    }
}

#[test]
fn scanned_code_keeps_raw_text() {
    let code = ScannedCode::new(" 978 0 ");
    assert_eq!(code.raw, " 978 0 ");
    assert_eq!(code.digits, "9780");
}

// =============================================================
// normalize_manual_entry
// =============================================================

#[test]
fn manual_entry_keeps_digits_x_and_hyphens() {
    assert_eq!(normalize_manual_entry("  0-8044-2957-X "), "0-8044-2957-X");
}

#[test]
fn manual_entry_drops_spaces_and_punctuation() {
    assert_eq!(normalize_manual_entry("ISBN 978 3.16"), "978316");
}
