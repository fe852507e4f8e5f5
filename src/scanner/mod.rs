//! Camera barcode scanner for the add-by-ISBN form.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page embeds the `Html5Qrcode` library for the actual decoding. This
//! module decides which camera to use, starts and stops the live session,
//! and turns a decoded ISBN into a form submission. Browser bindings live in
//! `crate::browser`; everything here is host-agnostic and tested natively.

pub mod camera;
pub mod controller;
pub mod diagnostics;
pub mod host;
pub mod strategy;

pub use controller::{DecodeOutcome, PreviewOutcome, ScannerController, StartOutcome};
