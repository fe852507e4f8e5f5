//! DOM sinks: the ISBN form, the diagnostics panel, the camera picker and
//! theme styling.
//!
//! Missing optional elements turn the matching behaviour into a no-op.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, Storage, Window};

use super::JsFailure;
use crate::config::ElementIds;
use crate::error::ScanError;
use crate::isbn::normalize_manual_entry;
use crate::scanner::camera::CameraListing;
use crate::scanner::diagnostics::DiagnosticSink;
use crate::scanner::host::{CameraPicker, ScanForm};
use crate::theme::{Theme, ThemeStore, ThemeView};

const THEME_ATTRIBUTE: &str = "data-theme";
const LIGHT_QUERY: &str = "(prefers-color-scheme: light)";

pub(crate) fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

// =============================================================================
// FORM
// =============================================================================

#[derive(Clone)]
pub struct DomForm {
    window: Window,
    hidden: Option<HtmlInputElement>,
    visible: Option<HtmlInputElement>,
    form: Option<HtmlFormElement>,
}

impl DomForm {
    #[must_use]
    pub fn bind(window: &Window, document: &Document, ids: &ElementIds) -> Self {
        Self {
            window: window.clone(),
            hidden: element_by_id(document, ids.hidden_isbn),
            visible: element_by_id(document, ids.visible_isbn),
            form: element_by_id(document, ids.form),
        }
    }

    #[must_use]
    pub fn element(&self) -> Option<&HtmlFormElement> {
        self.form.as_ref()
    }

    /// Copy a typed ISBN from the visible field into the hidden one.
    pub fn normalize_manual_entry(&self) {
        if let (Some(hidden), Some(visible)) = (&self.hidden, &self.visible) {
            hidden.set_value(&normalize_manual_entry(&visible.value()));
        }
    }
}

impl ScanForm for DomForm {
    fn has_target(&self) -> bool {
        self.hidden.is_some()
    }

    fn fill_isbn(&self, isbn: &str) {
        for field in [&self.hidden, &self.visible].into_iter().flatten() {
            field.set_value(isbn);
        }
    }

    fn submit(&self) -> Result<(), ScanError> {
        let form = self.form.as_ref().ok_or_else(|| ScanError::Submit("no ISBN form on this page".to_owned()))?;
        form.submit().map_err(|err| ScanError::Submit(JsFailure::from_value(&err).to_string()))
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {}", JsFailure::from_value(&err));
        }
    }
}

// =============================================================================
// DIAGNOSTICS PANEL
// =============================================================================

/// Writes lines into the panel. Clearing removes only those lines, so a
/// camera preview living in the same panel stays put.
pub struct DomDiagnostics {
    document: Document,
    panel: Option<Element>,
    lines: RefCell<Vec<Element>>,
}

impl DomDiagnostics {
    #[must_use]
    pub fn bind(document: &Document, panel_id: &str) -> Self {
        Self { document: document.clone(), panel: document.get_element_by_id(panel_id), lines: RefCell::new(Vec::new()) }
    }
}

impl DiagnosticSink for DomDiagnostics {
    fn append(&self, line: &str) {
        let Some(panel) = &self.panel else {
            return;
        };
        let appended = self.document.create_element("div").and_then(|entry| {
            entry.set_text_content(Some(line));
            panel.append_child(&entry)?;
            Ok(entry)
        });
        match appended {
            Ok(entry) => self.lines.borrow_mut().push(entry),
            Err(err) => log::warn!("diagnostics panel rejected a line: {}", JsFailure::from_value(&err)),
        }
    }

    fn clear(&self) {
        for entry in self.lines.borrow_mut().drain(..) {
            entry.remove();
        }
    }
}

// =============================================================================
// CAMERA PICKER
// =============================================================================

/// The `#camera-select` dropdown.
#[derive(Clone)]
pub struct DomCameraPicker {
    select: HtmlSelectElement,
}

impl DomCameraPicker {
    #[must_use]
    pub fn bind(document: &Document, id: &str) -> Option<Self> {
        element_by_id(document, id).map(|select| Self { select })
    }
}

impl CameraPicker for DomCameraPicker {
    /// Replace the options with `listing`.
    fn show(&self, listing: &CameraListing) {
        self.select.set_inner_html("");
        for (value, text) in listing.options() {
            let appended = HtmlOptionElement::new_with_text_and_value(&text, &value)
                .and_then(|option| self.select.append_child(&option));
            if let Err(err) = appended {
                log::warn!("could not add camera option '{text}': {}", JsFailure::from_value(&err));
            }
        }
    }

    /// The placeholder's empty value counts as none.
    fn selected(&self) -> Option<String> {
        Some(self.select.value()).filter(|value| !value.is_empty())
    }
}

// =============================================================================
// THEME
// =============================================================================

pub struct LocalStorageStore {
    storage: Option<Storage>,
    key: &'static str,
}

impl LocalStorageStore {
    #[must_use]
    pub fn open(window: &Window, key: &'static str) -> Self {
        // Private browsing modes may refuse storage access outright.
        let storage = window.local_storage().ok().flatten();
        Self { storage, key }
    }
}

impl ThemeStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        self.storage.as_ref()?.get_item(self.key).ok().flatten()
    }

    fn save(&self, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(self.key, value) {
            log::debug!("theme not persisted: {}", JsFailure::from_value(&err));
        }
    }
}

pub struct DomThemeView {
    window: Window,
    root: Element,
    toggle: Option<Element>,
    navbar: Option<Element>,
}

impl DomThemeView {
    #[must_use]
    pub fn bind(window: &Window, document: &Document, root: Element, ids: &ElementIds) -> Self {
        Self {
            window: window.clone(),
            root,
            toggle: document.get_element_by_id(ids.theme_toggle),
            navbar: document.get_element_by_id(ids.navbar),
        }
    }
}

impl ThemeView for DomThemeView {
    fn prefers_light(&self) -> bool {
        self.window.match_media(LIGHT_QUERY).ok().flatten().is_some_and(|query| query.matches())
    }

    fn applied(&self) -> Option<Theme> {
        self.root.get_attribute(THEME_ATTRIBUTE).as_deref().and_then(Theme::parse)
    }

    fn apply(&self, theme: Theme) {
        if let Err(err) = self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str()) {
            log::warn!("could not set {THEME_ATTRIBUTE}: {}", JsFailure::from_value(&err));
        }
        if let Some(navbar) = &self.navbar {
            let (add, remove) = theme.navbar_classes();
            swap_classes(navbar, &add, &remove);
        }
        if let Some(toggle) = &self.toggle {
            swap_classes(toggle, &[theme.toggle_outline_class()], &[theme.flipped().toggle_outline_class()]);
            toggle.set_text_content(Some(theme.glyph()));
        }
    }
}

fn swap_classes(element: &Element, add: &[&str], remove: &[&str]) {
    let classes = element.class_list();
    let swapped = remove
        .iter()
        .try_for_each(|class| classes.remove_1(class))
        .and_then(|()| add.iter().try_for_each(|class| classes.add_1(class)));
    if let Err(err) = swapped {
        log::warn!("class swap failed: {}", JsFailure::from_value(&err));
    }
}
