//! [`PanelView`] over the page's scan controls

use dovi_shelf::panel::{Control, FileOption, MessageKind, PanelView, SCANNED_OPTION_COLOR};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlOptionElement, HtmlSelectElement, Window};

use crate::{by_id, warn_js};

/// Handles to the scan controls, looked up once at start-up. Any of them
/// may be missing on a trimmed-down page.
pub struct DomView {
    window: Window,
    scan_button: Option<HtmlButtonElement>,
    scan_file_button: Option<HtmlButtonElement>,
    loading: Option<Element>,
    message: Option<HtmlElement>,
    file_select: Option<HtmlSelectElement>,
}

impl DomView {
    pub fn from_document(window: Window, document: &Document) -> Self {
        Self {
            window,
            scan_button: by_id(document, "scanButton"),
            scan_file_button: by_id(document, "scanFileButton"),
            loading: by_id(document, "loadingIndicator"),
            message: by_id(document, "message"),
            file_select: by_id(document, "fileSelect"),
        }
    }

    pub fn scan_button(&self) -> Option<&HtmlButtonElement> {
        self.scan_button.as_ref()
    }

    pub fn scan_file_button(&self) -> Option<&HtmlButtonElement> {
        self.scan_file_button.as_ref()
    }

    pub fn file_select(&self) -> Option<&HtmlSelectElement> {
        self.file_select.as_ref()
    }

    /// Current picker value; `None` without a picker.
    pub fn selected_file(&self) -> Option<String> {
        self.file_select.as_ref().map(|s| s.value())
    }

    fn button(&self, control: Control) -> Option<&HtmlButtonElement> {
        match control {
            Control::ScanAll => self.scan_button.as_ref(),
            Control::ScanFile => self.scan_file_button.as_ref(),
        }
    }

    fn set_message_visible(&self, visible: bool) {
        if let Some(message) = &self.message {
            let display = if visible { "block" } else { "none" };
            warn_js("message display", message.style().set_property("display", display));
        }
    }

    fn fill_select(&self, select: &HtmlSelectElement, placeholder: &str, options: &[FileOption]) -> Result<(), JsValue> {
        select.set_inner_html("");
        let first = HtmlOptionElement::new_with_text_and_value(placeholder, "")?;
        select.append_child(&first)?;

        for option in options {
            let element = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value)?;
            if option.scanned {
                element.style().set_property("color", SCANNED_OPTION_COLOR)?;
            }
            select.append_child(&element)?;
        }
        Ok(())
    }
}

impl PanelView for DomView {
    fn begin_busy(&self, control: Control) {
        if let Some(button) = self.button(control) {
            button.set_disabled(true);
        }
        if let Some(loading) = &self.loading {
            warn_js("loading indicator", loading.class_list().add_1("active"));
        }
        self.set_message_visible(false);
    }

    fn end_busy(&self, control: Control) {
        if let Some(loading) = &self.loading {
            warn_js("loading indicator", loading.class_list().remove_1("active"));
        }
        if let Some(button) = self.button(control) {
            button.set_disabled(false);
        }
    }

    fn show_message(&self, kind: MessageKind, text: &str) {
        let Some(message) = &self.message else { return };
        message.set_class_name("message");
        if let Some(class) = kind.css_class() {
            warn_js("message class", message.class_list().add_1(class));
        }
        message.set_text_content(Some(text));
        self.set_message_visible(true);
    }

    fn populate_files(&self, placeholder: &str, options: &[FileOption]) {
        if let Some(select) = &self.file_select {
            warn_js("file list", self.fill_select(select, placeholder, options));
        }
    }

    fn set_scan_file_available(&self, available: bool) {
        let Some(button) = &self.scan_file_button else { return };
        let classes = button.class_list();
        let result = if available { classes.remove_1("hidden") } else { classes.add_1("hidden") };
        warn_js("scan file button", result);
        button.set_disabled(!available);
    }

    fn schedule_reload(&self, delay: Duration) {
        let location = self.window.location();
        let reload = Closure::once_into_js(move || {
            warn_js("reload", location.reload());
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(reload.unchecked_ref(), millis);
        warn_js("reload timer", scheduled.map(|_| ()));
    }
}
