//! Media table ordering
//!
//! The library page renders one table row per file, annotated server-side
//! with `data-hdr-format`, `data-hdr-detail` and `data-el-type`. This module
//! orders those rows without touching their contents: rows are read through
//! [`TableRow`], sorted, and handed back to the [`SortableTable`] to be moved
//! into place.
//!
//! Two orders exist:
//!
//! - **profile**: by [`ProfileRank`], ties broken by filename
//! - **filename**: by filename alone
//!
//! Filenames compare case-insensitively. Both sorts are stable, so rows that
//! compare equal keep their server-rendered order.

mod sorter;

pub use sorter::TableSorter;

use crate::profile::{self, ProfileRank};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Profile,
    #[default]
    Filename,
}

impl SortMode {
    /// Value written to the sort selector and to preference storage.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Profile => "profile",
            SortMode::Filename => "filename",
        }
    }

    /// Interpret a stored or selected value. Anything but "profile" sorts by
    /// filename, matching how the page has always treated unknown values.
    pub fn from_preference(value: &str) -> Self {
        if value == "profile" {
            SortMode::Profile
        } else {
            SortMode::Filename
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    /// Strict parse for command-line input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "profile" => Ok(SortMode::Profile),
            "filename" => Ok(SortMode::Filename),
            other => Err(format!("unknown sort mode '{}' (expected profile or filename)", other)),
        }
    }
}

/// The filename cell of a row (`td[data-label="Poster / Dateiname"]`).
///
/// Each field is `None` when the corresponding attribute or element is
/// missing. `text` is the full text content of the cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameCell {
    /// `title` attribute of the cell
    pub title: Option<String>,
    /// Text of a nested `.poster-title`
    pub poster_title: Option<String>,
    /// Text of a nested `.filename-fallback`
    pub fallback: Option<String>,
    pub text: String,
}

impl FilenameCell {
    /// Pick the filename: non-empty title attribute, then poster title, then
    /// fallback element, then the whole cell text. Result is trimmed.
    pub fn resolve(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.trim().to_string();
        }
        self.poster_title
            .as_deref()
            .or(self.fallback.as_deref())
            .unwrap_or(&self.text)
            .trim()
            .to_string()
    }
}

/// Read access to one table row.
pub trait TableRow {
    fn hdr_format(&self) -> String;
    fn hdr_detail(&self) -> String;
    fn el_type(&self) -> String;
    /// Resolved filename, or "" when the row has no filename cell.
    fn filename(&self) -> String;

    fn profile_rank(&self) -> ProfileRank {
        profile::classify(&self.hdr_format(), &self.hdr_detail(), &self.el_type())
    }
}

/// A row as plain data. Missing attributes deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRow {
    #[serde(default)]
    pub hdr_format: String,
    #[serde(default)]
    pub hdr_detail: String,
    #[serde(default)]
    pub el_type: String,
    #[serde(default)]
    pub filename: String,
}

impl MediaRow {
    pub fn new(hdr_format: &str, hdr_detail: &str, el_type: &str, filename: &str) -> Self {
        Self {
            hdr_format: hdr_format.to_string(),
            hdr_detail: hdr_detail.to_string(),
            el_type: el_type.to_string(),
            filename: filename.to_string(),
        }
    }
}

impl TableRow for MediaRow {
    fn hdr_format(&self) -> String {
        self.hdr_format.clone()
    }

    fn hdr_detail(&self) -> String {
        self.hdr_detail.clone()
    }

    fn el_type(&self) -> String {
        self.el_type.clone()
    }

    fn filename(&self) -> String {
        self.filename.clone()
    }

    fn profile_rank(&self) -> ProfileRank {
        profile::classify(&self.hdr_format, &self.hdr_detail, &self.el_type)
    }
}

/// Stable sort by profile rank, then case-insensitive filename.
pub fn sort_by_profile<R: TableRow>(rows: &mut [R]) {
    rows.sort_by_cached_key(|r| (r.profile_rank(), r.filename().to_lowercase()));
}

/// Stable sort by case-insensitive filename.
pub fn sort_by_filename<R: TableRow>(rows: &mut [R]) {
    rows.sort_by_cached_key(|r| r.filename().to_lowercase());
}

/// Sort `rows` in place according to `mode`.
pub fn sort_rows<R: TableRow>(rows: &mut [R], mode: SortMode) {
    match mode {
        SortMode::Profile => sort_by_profile(rows),
        SortMode::Filename => sort_by_filename(rows),
    }
}

/// The part of the page a [`TableSorter`] works on: the media table body and
/// the optional sort selector.
pub trait SortableTable {
    type Row: TableRow;
    type Error;

    /// Current rows in document order. Empty when the page has no table.
    fn rows(&self) -> Vec<Self::Row>;

    /// Move the given rows into this order. Rows are existing handles; none
    /// are created or dropped from the document.
    fn reattach(&mut self, rows: &[Self::Row]) -> Result<(), Self::Error>;

    /// Reflect the effective mode in the sort selector, if there is one.
    fn show_mode(&mut self, _mode: SortMode) {}
}

/// In-memory table, used by the terminal front-end and tests.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    pub rows: Vec<MediaRow>,
    pub shown_mode: Option<SortMode>,
}

impl RowTable {
    pub fn new(rows: Vec<MediaRow>) -> Self {
        Self { rows, shown_mode: None }
    }
}

impl SortableTable for RowTable {
    type Row = MediaRow;
    type Error = std::convert::Infallible;

    fn rows(&self) -> Vec<MediaRow> {
        self.rows.clone()
    }

    fn reattach(&mut self, rows: &[MediaRow]) -> Result<(), Self::Error> {
        self.rows = rows.to_vec();
        Ok(())
    }

    fn show_mode(&mut self, mode: SortMode) {
        self.shown_mode = Some(mode);
    }
}
