//! Light/dark theme selection, applied to page styling and persisted in `localStorage`.
//!
//! The persisted value wins; without one the host's colour-scheme query
//! decides, and dark is the fallback when the host does not report light.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort. A failing storage write is swallowed and the
//! applied theme still holds for the current page view.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

pub const STORAGE_KEY: &str = "mi_biblioteca_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parse a stored or requested value. Only `light` and `dark` are accepted.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Glyph shown on the toggle button.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Light => "\u{2600}\u{fe0f}",
            Self::Dark => "\u{1f319}",
        }
    }

    /// Navbar classes to `(add, remove)` for contrast against this theme.
    #[must_use]
    pub fn navbar_classes(self) -> ([&'static str; 2], [&'static str; 2]) {
        let light = ["navbar-light", "bg-light"];
        let dark = ["navbar-dark", "bg-dark"];
        match self {
            Self::Light => (light, dark),
            Self::Dark => (dark, light),
        }
    }

    /// Outline class for the toggle button, visible against this theme.
    #[must_use]
    pub fn toggle_outline_class(self) -> &'static str {
        match self {
            Self::Light => "btn-outline-dark",
            Self::Dark => "btn-outline-light",
        }
    }
}

/// Durable key-value slot holding the preference.
pub trait ThemeStore {
    fn load(&self) -> Option<String>;
    fn save(&self, value: &str);
}

/// The styled page.
pub trait ThemeView {
    /// Whether the host explicitly reports a light colour-scheme preference.
    fn prefers_light(&self) -> bool;

    /// The theme currently applied, if any.
    fn applied(&self) -> Option<Theme>;

    fn apply(&self, theme: Theme);
}

pub struct ThemeController<S, V> {
    store: S,
    view: V,
}

impl<S: ThemeStore, V: ThemeView> ThemeController<S, V> {
    pub fn new(store: S, view: V) -> Self {
        Self { store, view }
    }

    /// Apply the persisted theme, or the host preference when nothing valid is stored.
    ///
    /// Safe to call more than once.
    pub fn initialize(&self) -> Theme {
        let theme = self.store.load().as_deref().and_then(Theme::parse).unwrap_or_else(|| {
            if self.view.prefers_light() { Theme::Light } else { Theme::Dark }
        });
        self.apply(theme);
        theme
    }

    /// Apply and persist `value`. Anything other than `light`/`dark` is ignored.
    pub fn set_theme(&self, value: &str) -> Option<Theme> {
        let Some(theme) = Theme::parse(value) else {
            log::debug!("ignoring unknown theme value '{value}'");
            return None;
        };
        self.apply(theme);
        Some(theme)
    }

    /// Flip the applied theme. An unset theme counts as dark.
    pub fn toggle(&self) -> Theme {
        let next = self.current().flipped();
        self.apply(next);
        next
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.view.applied().unwrap_or(Theme::Dark)
    }

    fn apply(&self, theme: Theme) {
        self.view.apply(theme);
        self.store.save(theme.as_str());
    }
}
