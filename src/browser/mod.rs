//! Browser bindings and page bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server-rendered catalogue pages load this module as WebAssembly next
//! to the `Html5Qrcode` script. `boot` runs on module start, binds the
//! controllers to whatever elements the page has and wires its listeners.
//!
//! DESIGN
//! ======
//! Host traits from `crate::scanner::host` and `crate::theme` are implemented
//! here with `web-sys`; the controllers never touch the DOM themselves. The
//! page keeps every `gloo-events` listener it registers, so `disposePage`
//! unhooks all of them by dropping the list.
//!
//! Page-load work runs in one task (`ScannerController::run_startup`): device
//! report, camera listing, then the optional auto-start. Running them in order
//! keeps the throw-away streams they acquire from overlapping the scanner's
//! own. Pages without a camera picker skip the listing entirely.

mod dom;
mod html5_qrcode;
mod media;

pub use dom::{DomCameraPicker, DomDiagnostics, DomForm, DomThemeView, LocalStorageStore};
pub use html5_qrcode::Html5QrcodeHost;
pub use media::{BrowserMedia, GlooTimer};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Window};

use crate::config::{ElementIds, ScannerConfig};
use crate::error::ScanError;
use crate::scanner::host::CameraPicker;
use crate::scanner::{PreviewOutcome, ScannerController, StartOutcome};
use crate::theme::{STORAGE_KEY, ThemeController};

type BrowserScanner = ScannerController<Html5QrcodeHost, BrowserMedia, DomForm, DomDiagnostics, GlooTimer>;
type BrowserTheme = ThemeController<LocalStorageStore, DomThemeView>;

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn boot() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }

    let Some(page) = Page::mount() else {
        log::warn!("no window or document; page behaviours disabled");
        return;
    };
    let previous = PAGE.with(|slot| slot.replace(Some(page)));
    if let Some(mut previous) = previous {
        previous.dispose();
    }
}

/// Unhook every listener and release the camera.
#[wasm_bindgen(js_name = disposePage)]
pub fn dispose_page() {
    let page = PAGE.with(|slot| slot.borrow_mut().take());
    if let Some(mut page) = page {
        page.dispose();
    }
}

// =============================================================================
// JS INTEROP HELPERS
// =============================================================================

/// `name` and `message` pulled off a thrown JS value.
pub(crate) struct JsFailure {
    name: String,
    message: String,
}

impl JsFailure {
    pub(crate) fn from_value(value: &JsValue) -> Self {
        let name = property(value, "name").unwrap_or_else(|| "Error".to_owned());
        let message = property(value, "message")
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self { name, message }
    }

    pub(crate) fn into_start_error(self) -> ScanError {
        ScanError::Start { name: self.name, message: self.message }
    }
}

impl fmt::Display for JsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// String property of a JS value; `None` when missing or not a string.
pub(crate) fn property(value: &JsValue, key: &str) -> Option<String> {
    Reflect::get(value, &JsValue::from_str(key)).ok()?.as_string()
}

/// String property of a JS object, empty when absent.
pub(crate) fn string_field(value: &JsValue, key: &str) -> String {
    property(value, key).unwrap_or_default()
}

fn ready_state(document: &Document) -> String {
    string_field(document, "readyState")
}

fn load_config(reader: Option<&Element>) -> ScannerConfig {
    let Some(reader) = reader else {
        return ScannerConfig::default();
    };
    ScannerConfig::from_lookup(|key| reader.get_attribute(key)).unwrap_or_else(|err| {
        log::warn!("{err}; using default scanner settings");
        ScannerConfig::default()
    })
}

// =============================================================================
// PAGE
// =============================================================================

pub struct Page {
    window: Window,
    document: Document,
    ids: ElementIds,
    scanner: Rc<BrowserScanner>,
    theme: Option<Rc<BrowserTheme>>,
    camera_picker: Option<DomCameraPicker>,
    listeners: Vec<EventListener>,
}

impl Page {
    /// Bind controllers to the current document and wire the listeners.
    #[must_use]
    pub fn mount() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let ids = ElementIds::default();

        let config = load_config(document.get_element_by_id(ids.reader).as_ref());
        let scanner = Rc::new(ScannerController::new(
            Html5QrcodeHost::new(ids.reader),
            BrowserMedia::new(&document, ids.diagnostics),
            DomForm::bind(&window, &document, &ids),
            DomDiagnostics::bind(&document, ids.diagnostics),
            GlooTimer,
            config,
        ));
        let theme = document.document_element().map(|root| {
            Rc::new(ThemeController::new(
                LocalStorageStore::open(&window, STORAGE_KEY),
                DomThemeView::bind(&window, &document, root, &ids),
            ))
        });
        let camera_picker = DomCameraPicker::bind(&document, ids.camera_select);

        let mut page = Self { window, document, ids, scanner, theme, camera_picker, listeners: Vec::new() };
        page.initialize();
        Some(page)
    }

    fn initialize(&mut self) {
        self.bind_theme();
        self.bind_scanner();
        log::info!("page bound with {} listeners", self.listeners.len());
    }

    /// Drop every listener and stop the scanner.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        let scanner = Rc::clone(&self.scanner);
        spawn_local(async move { scanner.dispose().await });
    }

    fn bind_theme(&mut self) {
        let Some(theme) = self.theme.clone() else {
            return;
        };
        if ready_state(&self.document) != "loading" {
            theme.initialize();
        }

        let on_ready = Rc::clone(&theme);
        let document = self.document.clone();
        self.listeners.push(EventListener::new(&self.document, "readystatechange", move |_| {
            if ready_state(&document) == "complete" {
                on_ready.initialize();
            }
        }));
        let on_loaded = Rc::clone(&theme);
        self.listeners.push(EventListener::new(&self.document, "DOMContentLoaded", move |_| {
            on_loaded.initialize();
        }));

        let toggle_id = self.ids.theme_toggle;
        self.on_click(toggle_id, move || {
            let theme = theme.toggle();
            log::debug!("theme switched to {}", theme.as_str());
        });
    }

    fn bind_scanner(&mut self) {
        let ids = self.ids.clone();

        let scanner = Rc::clone(&self.scanner);
        let picker = self.camera_picker.clone();
        if ready_state(&self.document) == "complete" {
            run_page_load(scanner, picker);
        } else {
            self.listeners.push(EventListener::once(&self.window, "load", move |_| run_page_load(scanner, picker)));
        }

        let scanner = Rc::clone(&self.scanner);
        let picker = self.camera_picker.clone();
        self.on_click(ids.start_button, move || {
            let scanner = Rc::clone(&scanner);
            let device = picker.as_ref().and_then(CameraPicker::selected);
            spawn_local(async move { start(&scanner, device.as_deref()).await });
        });

        let scanner = Rc::clone(&self.scanner);
        self.on_click(ids.stop_button, move || {
            let scanner = Rc::clone(&scanner);
            spawn_local(async move { scanner.stop_session().await });
        });

        let scanner = Rc::clone(&self.scanner);
        let picker = self.camera_picker.clone();
        self.on_click(ids.test_button, move || {
            let scanner = Rc::clone(&scanner);
            let device = picker.as_ref().and_then(CameraPicker::selected);
            spawn_local(async move {
                if scanner.preview_camera(device.as_deref()).await == PreviewOutcome::Failed {
                    log::warn!("camera preview failed");
                }
            });
        });

        if let Some(form) = self.scanner.form().element() {
            let binding = self.scanner.form().clone();
            self.listeners.push(EventListener::new(form, "submit", move |_| binding.normalize_manual_entry()));
        }
    }

    fn on_click(&mut self, id: &str, mut action: impl FnMut() + 'static) {
        let Some(target) = self.document.get_element_by_id(id) else {
            log::debug!("no #{id} on this page");
            return;
        };
        let options = EventListenerOptions::enable_prevent_default();
        self.listeners.push(EventListener::new_with_options(&target, "click", options, move |event| {
            event.prevent_default();
            action();
        }));
    }
}

fn run_page_load(scanner: Rc<BrowserScanner>, picker: Option<DomCameraPicker>) {
    spawn_local(async move {
        match scanner.run_startup(picker.as_ref()).await {
            Some(outcome) => report_start(&outcome),
            None => log::info!("auto-start disabled"),
        }
    });
}

async fn start(scanner: &Rc<BrowserScanner>, device: Option<&str>) {
    report_start(&scanner.start_session(device).await);
}

fn report_start(outcome: &StartOutcome) {
    match outcome {
        StartOutcome::Started(strategy) => log::info!("scanning with {}", strategy.description),
        StartOutcome::Exhausted => log::warn!("scanner could not be started"),
        StartOutcome::Busy => log::debug!("start request ignored while another start is running"),
    }
}
