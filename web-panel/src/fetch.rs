//! `fetch`-backed [`ScanService`] and `localStorage`-backed preferences

use dovi_shelf::api::{
    endpoint, ApiError, FileListing, ScanFileReply, ScanFileRequest, ScanService, ScanSummary,
    FILES_PATH, SCAN_FILE_PATH, SCAN_PATH,
};
use dovi_shelf::prefs::{PreferenceStore, StoreError};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Storage, Window};

use crate::js_error_text;

pub struct FetchScanService {
    base: String,
}

impl FetchScanService {
    /// Empty `base` targets the page's own origin.
    pub fn new(base: &str) -> Self {
        Self { base: base.to_string() }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;

        let init = RequestInit::new();
        init.set_method(method);
        if let Some(body) = body {
            let headers = Headers::new().map_err(transport)?;
            headers.set("Content-Type", "application/json").map_err(transport)?;
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));
        }

        let request = Request::new_with_str_and_init(&endpoint(&self.base, path), &init).map_err(transport)?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;

        // Status is not checked; the server explains failures in the body
        let json = JsFuture::from(response.json().map_err(decode)?)
            .await
            .map_err(decode)?;
        serde_wasm_bindgen::from_value(json).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn transport(e: JsValue) -> ApiError {
    ApiError::Transport(js_error_text(&e))
}

fn decode(e: JsValue) -> ApiError {
    ApiError::Decode(js_error_text(&e))
}

impl ScanService for FetchScanService {
    async fn scan_all(&self) -> Result<ScanSummary, ApiError> {
        self.call("POST", SCAN_PATH, None).await
    }

    async fn list_files(&self) -> Result<FileListing, ApiError> {
        self.call("GET", FILES_PATH, None).await
    }

    async fn scan_file(&self, path: &str) -> Result<ScanFileReply, ApiError> {
        let body = serde_json::to_string(&ScanFileRequest { file_path: path.to_string() })?;
        self.call("POST", SCAN_FILE_PATH, Some(body)).await
    }
}

/// `window.localStorage`. Absent in some private-browsing modes, in which
/// case reads miss and writes fail.
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn from_window(window: &Window) -> Self {
        Self { storage: window.local_storage().ok().flatten() }
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(js_error_text(&e)))
    }
}
