//! Library server contract
//!
//! The page talks to three JSON endpoints owned by the library server:
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | `POST /scan` | - | `{ "new_files": 3 }` |
//! | `GET /get_files` | - | `{ "success": true, "files": [{ "path", "name", "scanned" }] }` |
//! | `POST /scan_file` | `{ "file_path": "..." }` | `{ "success": true, "message": "..." }` |
//!
//! [`ScanService`] is the seam over those endpoints. The terminal front-end
//! implements it with an HTTP client, the browser crate with `fetch`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCAN_PATH: &str = "/scan";
pub const FILES_PATH: &str = "/get_files";
pub const SCAN_FILE_PATH: &str = "/scan_file";

/// Reply to a full library scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    #[serde(default)]
    pub new_files: i64,
}

/// Reply to the file listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    /// Already analysed by the server
    #[serde(default)]
    pub scanned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFileRequest {
    pub file_path: String,
}

/// Reply to a single-file scan. `message` is already localised by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFileReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Why a request produced no usable reply.
///
/// `Display` is what ends up in the message area, so both variants render as
/// the bare cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never completed (connection refused, aborted, CORS, ...)
    #[error("{0}")]
    Transport(String),

    /// Body was not the expected JSON
    #[error("{0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// The three server operations.
///
/// No `Send` bound: the browser implementation holds JS handles and its
/// futures run on the page's event loop.
#[allow(async_fn_in_trait)]
pub trait ScanService {
    async fn scan_all(&self) -> Result<ScanSummary, ApiError>;
    async fn list_files(&self) -> Result<FileListing, ApiError>;
    async fn scan_file(&self, path: &str) -> Result<ScanFileReply, ApiError>;
}

/// Join a base URL and an endpoint path. An empty base gives a
/// same-origin relative path.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
