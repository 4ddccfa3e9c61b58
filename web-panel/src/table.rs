//! [`SortableTable`] over `#mediaTable` and `#sortSelect`

use dovi_shelf::table::{FilenameCell, SortMode, SortableTable, TableRow};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlSelectElement};

use crate::by_id;

const FILENAME_CELL: &str = r#"td[data-label="Poster / Dateiname"]"#;

/// A server-rendered `<tr>`.
#[derive(Clone)]
pub struct DomRow(Element);

impl DomRow {
    fn attr(&self, name: &str) -> String {
        self.0.get_attribute(name).unwrap_or_default()
    }
}

fn text_of(parent: &Element, selector: &str) -> Option<String> {
    parent
        .query_selector(selector)
        .ok()
        .flatten()
        .map(|e| e.text_content().unwrap_or_default())
}

impl TableRow for DomRow {
    fn hdr_format(&self) -> String {
        self.attr("data-hdr-format")
    }

    fn hdr_detail(&self) -> String {
        self.attr("data-hdr-detail")
    }

    fn el_type(&self) -> String {
        self.attr("data-el-type")
    }

    fn filename(&self) -> String {
        let Some(cell) = self.0.query_selector(FILENAME_CELL).ok().flatten() else {
            return String::new();
        };
        FilenameCell {
            title: cell.get_attribute("title"),
            poster_title: text_of(&cell, ".poster-title"),
            fallback: text_of(&cell, ".filename-fallback"),
            text: cell.text_content().unwrap_or_default(),
        }
        .resolve()
    }
}

pub struct DomTable {
    body: Option<Element>,
    sort_select: Option<HtmlSelectElement>,
}

impl DomTable {
    pub fn from_document(document: &Document) -> Self {
        let body = by_id::<Element>(document, "mediaTable")
            .and_then(|table| table.query_selector("tbody").ok().flatten());
        Self { body, sort_select: by_id(document, "sortSelect") }
    }

    pub fn sort_select(&self) -> Option<&HtmlSelectElement> {
        self.sort_select.as_ref()
    }
}

impl SortableTable for DomTable {
    type Row = DomRow;
    type Error = JsValue;

    fn rows(&self) -> Vec<DomRow> {
        let Some(body) = &self.body else { return Vec::new() };
        let Ok(list) = body.query_selector_all("tr") else { return Vec::new() };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(DomRow)
            .collect()
    }

    // appendChild moves an element that is already in the document
    fn reattach(&mut self, rows: &[DomRow]) -> Result<(), JsValue> {
        let Some(body) = &self.body else { return Ok(()) };
        for row in rows {
            body.append_child(&row.0)?;
        }
        Ok(())
    }

    fn show_mode(&mut self, mode: SortMode) {
        if let Some(select) = &self.sort_select {
            select.set_value(mode.as_str());
        }
    }
}
