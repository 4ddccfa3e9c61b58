//! dovi-shelf - scan trigger and HDR profile sorting for a Dolby Vision library page
//!
//! The library server renders a table of media files, each row annotated
//! with the HDR format, HDR detail and enhancement-layer type found by its
//! scanner. This crate is the client side of that page:
//!
//! - it asks the server to scan the whole library or a single file, and
//!   reports the result to the user
//! - it orders the table by HDR profile quality or by filename, and
//!   remembers the chosen order
//!
//! The same logic runs in the browser (see the `web-panel` crate) and in the
//! `dovi-shelf` terminal front-end.
//!
//! # Quick Start
//!
//! ```
//! use dovi_shelf::profile::{classify, ProfileRank};
//! use dovi_shelf::table::{sort_by_profile, MediaRow};
//!
//! assert_eq!(classify("Dolby Vision", "Profile 7", "FEL"), ProfileRank::DolbyVisionFel);
//!
//! let mut rows = vec![
//!     MediaRow::new("SDR", "", "", "old.mkv"),
//!     MediaRow::new("Dolby Vision", "Profile 7", "FEL", "remux.mkv"),
//! ];
//! sort_by_profile(&mut rows);
//! assert_eq!(rows[0].filename, "remux.mkv");
//! ```
//!
//! # Profile Ranking
//!
//! | Rank | Bucket |
//! |------|--------|
//! | 0 | Dolby Vision profile 7, FEL |
//! | 1 | Dolby Vision profile 7, MEL |
//! | 2 | Profile 8 |
//! | 3 | Profile 5 |
//! | 4 | HDR10+ |
//! | 5 | HDR10 / HLG / PQ |
//! | 6 | SDR |
//! | 7 | Unknown |
//!
//! # Modules
//!
//! - [`profile`]: label classification into [`ProfileRank`]
//! - [`table`]: row sorting and the persisted sort mode
//! - [`panel`]: scan buttons, file picker, reload scheduling
//! - [`api`]: server endpoints and wire types
//! - [`i18n`]: English and German message catalogues

pub mod api;
#[cfg(feature = "native")]
pub mod client;
pub mod config;
pub mod i18n;
pub mod panel;
pub mod prefs;
pub mod profile;
pub mod table;

pub use api::{ApiError, ScanService};
pub use config::PanelConfig;
pub use i18n::Lang;
pub use panel::{MessageKind, PanelView, ScanOutcome, ScanPanel};
pub use prefs::{MemoryStore, PreferenceStore, StoreError, SORT_MODE_KEY};
pub use profile::{classify, ProfileRank};
pub use table::{MediaRow, SortMode, SortableTable, TableRow, TableSorter};
