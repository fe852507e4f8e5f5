//! ISBN extraction from decoded barcode text.
//!
//! A decoded barcode is reduced to its ASCII digits. The result is accepted
//! as an ISBN when it has exactly 10 or 13 digits. No ISO 2108 check digit
//! validation is performed.

#[cfg(test)]
#[path = "isbn_test.rs"]
mod isbn_test;

use std::fmt;

/// Digit counts accepted as an ISBN.
pub const ISBN10_LEN: usize = 10;
pub const ISBN13_LEN: usize = 13;

/// A digit-only ISBN candidate of length 10 or 13.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(String);

impl Isbn {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_isbn13(&self) -> bool {
        self.0.len() == ISBN13_LEN
    }

    /// Whether a 13-digit code starts with a Bookland prefix (978 or 979).
    #[must_use]
    pub fn has_bookland_prefix(&self) -> bool {
        self.is_isbn13() && (self.0.starts_with("978") || self.0.starts_with("979"))
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsbnError {
    #[error("expected 10 or 13 digits, found {}", .digits.len())]
    WrongLength { digits: String },
}

/// Text delivered by one successful decode, with its digit-only form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCode {
    pub raw: String,
    pub digits: String,
}

impl ScannedCode {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self { raw: raw.to_owned(), digits: digits_only(raw) }
    }

    /// The digit-only form as an [`Isbn`].
    ///
    /// # Errors
    ///
    /// Returns `WrongLength` when the digit count is not 10 or 13.
    pub fn isbn(&self) -> Result<Isbn, IsbnError> {
        match self.digits.len() {
            ISBN10_LEN | ISBN13_LEN => Ok(Isbn(self.digits.clone())),
            _ => Err(IsbnError::WrongLength { digits: self.digits.clone() }),
        }
    }
}

/// Strip everything except ASCII digits.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a hand-typed ISBN before form submission.
///
/// Trims surrounding whitespace and keeps digits, `X`/`x` check characters
/// and hyphens.
#[must_use]
pub fn normalize_manual_entry(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'X' | 'x' | '-'))
        .collect()
}
