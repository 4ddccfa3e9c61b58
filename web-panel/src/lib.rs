//! Browser binding for the library page
//!
//! Built with `wasm-pack build --target web web-panel` and loaded by the
//! page template. On start it looks up the scan controls and the media
//! table, hands them to [`ScanPanel`] and [`TableSorter`], and wires one
//! listener per control.

mod fetch;
mod table;
mod view;

use dovi_shelf::{classify, Lang, PanelConfig, ScanPanel, TableSorter};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, Window};

pub use fetch::{FetchScanService, LocalStorageStore};
pub use table::{DomRow, DomTable};
pub use view::DomView;

/// Global the page template may set to override [`PanelConfig`] defaults.
const CONFIG_GLOBAL: &str = "DOVI_SHELF_CONFIG";
/// Auto-refresh interval in seconds, injected by the server.
const AUTO_REFRESH_GLOBAL: &str = "AUTO_REFRESH_INTERVAL";

/// Profile rank (0-7) for page scripts that want to reuse the ordering.
#[wasm_bindgen(js_name = profileRank)]
pub fn profile_rank(hdr_format: &str, hdr_detail: &str, el_type: &str) -> u8 {
    classify(hdr_format, hdr_detail, el_type).as_u8()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))?;
    if ready_state.as_string().as_deref() == Some("loading") {
        let target = document.clone();
        let on_ready = Closure::once_into_js(move || {
            if let Err(e) = boot(window, document) {
                web_sys::console::error_2(&"dovi-shelf: start-up failed:".into(), &e);
            }
        });
        target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        Ok(())
    } else {
        boot(window, document)
    }
}

fn boot(window: Window, document: Document) -> Result<(), JsValue> {
    let config = page_config(&window);

    // Table first so the page settles into its stored order right away
    let table = DomTable::from_document(&document);
    let sort_select = table.sort_select().cloned();
    let sorter = Rc::new(RefCell::new(TableSorter::new(table, LocalStorageStore::from_window(&window))));
    if let Err(e) = sorter.borrow_mut().apply(None) {
        web_sys::console::warn_2(&"dovi-shelf: initial sort failed:".into(), &e);
    }
    if let Some(select) = sort_select {
        let sorter = sorter.clone();
        let source = select.clone();
        listen(&select, "change", move |_| {
            if let Err(e) = sorter.borrow_mut().choose(&source.value()) {
                web_sys::console::warn_2(&"dovi-shelf: sort failed:".into(), &e);
            }
        })?;
    }

    let view = DomView::from_document(window, &document);
    let panel = Rc::new(ScanPanel::new(FetchScanService::new(&config.base_url), view, config));

    if let Some(button) = panel.view().scan_button() {
        let panel = panel.clone();
        listen(button, "click", move |_| {
            let panel = panel.clone();
            spawn_local(async move {
                panel.trigger_full_scan().await;
            });
        })?;
    }

    // Registered once here, not on every list refresh
    if let Some(select) = panel.view().file_select() {
        let panel = panel.clone();
        listen(select, "change", move |_| {
            let value = panel.view().selected_file().unwrap_or_default();
            panel.select_file(&value);
        })?;
    }

    if let Some(button) = panel.view().scan_file_button() {
        let panel = panel.clone();
        listen(button, "click", move |_| {
            let panel = panel.clone();
            spawn_local(async move {
                let selected = panel.view().selected_file();
                panel.trigger_file_scan(selected.as_deref()).await;
            });
        })?;
    }

    spawn_local(async move {
        panel.initialize().await;
    });
    Ok(())
}

/// Injected config object (if any), then `?lang=` and the browser language,
/// then the injected auto-refresh interval.
fn page_config(window: &Window) -> PanelConfig {
    let mut config: PanelConfig = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
        .ok()
        .filter(|v| v.is_object())
        .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
        .unwrap_or_default();

    let query = window.location().search().ok();
    let browser_lang = window.navigator().language();
    config.lang = Lang::negotiate(query.as_deref(), browser_lang.as_deref(), config.lang);

    let interval = js_sys::Reflect::get(window, &JsValue::from_str(AUTO_REFRESH_GLOBAL))
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|secs| secs.is_finite() && *secs > 0.0);
    if let Some(secs) = interval {
        config.auto_refresh_secs = Some(secs as u64);
    }
    config
}

/// Attach `handler` for the lifetime of the page.
fn listen<T: AsRef<EventTarget>>(
    target: &T,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub(crate) fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Text a JS exception shows when concatenated into a string, e.g.
/// `TypeError: Failed to fetch`.
pub(crate) fn js_error_text(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_null() {
        return "null".into();
    }
    if value.is_undefined() {
        return "undefined".into();
    }
    String::from(value.unchecked_ref::<js_sys::Object>().to_string())
}

pub(crate) fn warn_js(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        web_sys::console::warn_2(&format!("dovi-shelf: {} failed:", what).into(), &e);
    }
}
