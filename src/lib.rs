//! # libros-client
//!
//! WebAssembly behaviours for the libros catalogue pages: a camera ISBN
//! scanner that fills and submits the add-book form, and a persisted
//! light/dark theme toggle.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Element ids and scanner tuning, with `data-*` overrides |
//! | [`error`] | Scanner failure categories |
//! | [`isbn`] | ISBN extraction from decoded text |
//! | [`scanner`] | Camera listing, fallback start sequencing, decode handling |
//! | [`theme`] | Theme preference, styling and persistence |
//! | `browser` | `web-sys` bindings and page bootstrap (feature `hydrate`) |

pub mod config;
pub mod error;
pub mod isbn;
pub mod scanner;
pub mod theme;

#[cfg(feature = "hydrate")]
pub mod browser;
