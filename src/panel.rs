//! Scan panel
//!
//! The top of the library page has two ways to ask the server for work: a
//! "scan library" button and a file picker with a "scan this file" button.
//! [`ScanPanel`] owns the behaviour behind them. It talks to the server
//! through a [`ScanService`] and to the page through a [`PanelView`], so the
//! same logic drives the browser page and the terminal front-end.
//!
//! # Failure handling
//!
//! Every action is one-shot. A transport or decode failure is shown as a
//! message, the busy state is cleared, and the user can simply try again.
//! Nothing is retried automatically.

use crate::api::{ApiError, FileEntry, ScanService};
use crate::config::PanelConfig;
use crate::i18n::{translate, Lang};
use std::time::Duration;

/// Text colour for files the server has already analysed.
pub const SCANNED_OPTION_COLOR: &str = "#4ecca3";

const SCANNED_SUFFIX: &str = " ✓";

/// The two busy-able buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ScanAll,
    ScanFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Info,
    Error,
}

impl MessageKind {
    /// Modifier class added next to `message`. Errors use the bare style.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            MessageKind::Success => Some("success"),
            MessageKind::Info => Some("info"),
            MessageKind::Error => None,
        }
    }
}

/// One entry of the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOption {
    pub value: String,
    pub label: String,
    pub scanned: bool,
}

impl From<&FileEntry> for FileOption {
    fn from(file: &FileEntry) -> Self {
        let label = if file.scanned {
            format!("{}{}", file.name, SCANNED_SUFFIX)
        } else {
            file.name.clone()
        };
        Self { value: file.path.clone(), label, scanned: file.scanned }
    }
}

/// What a scan action ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub kind: MessageKind,
    pub message: String,
    /// Page reload scheduled after this delay
    pub reload: Option<Duration>,
}

/// Page elements the panel drives.
///
/// Methods take `&self`: DOM handles are shared references and the page
/// event loop never runs two handlers at once.
pub trait PanelView {
    /// Disable `control`, show the loading indicator, hide the message.
    fn begin_busy(&self, control: Control);
    /// Hide the loading indicator and re-enable `control`.
    fn end_busy(&self, control: Control);
    fn show_message(&self, kind: MessageKind, text: &str);
    /// Replace all picker entries: placeholder (empty value) first.
    fn populate_files(&self, placeholder: &str, options: &[FileOption]);
    /// Show and enable, or hide and disable, the scan-file button.
    fn set_scan_file_available(&self, available: bool);
    fn schedule_reload(&self, delay: Duration);
}

pub struct ScanPanel<S, V> {
    service: S,
    view: V,
    config: PanelConfig,
}

impl<S: ScanService, V: PanelView> ScanPanel<S, V> {
    pub fn new(service: S, view: V, config: PanelConfig) -> Self {
        Self { service, view, config }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn lang(&self) -> Lang {
        self.config.lang
    }

    /// Page load: fill the picker and arm the auto-refresh timer.
    pub async fn initialize(&self) {
        if let Err(e) = self.refresh_file_list().await {
            tracing::warn!(error = %e, "initial file list failed");
        }
        if let Some(interval) = self.config.auto_refresh() {
            tracing::debug!(secs = interval.as_secs(), "auto refresh armed");
            self.view.schedule_reload(interval);
        }
    }

    /// Ask the server to scan the whole library.
    pub async fn trigger_full_scan(&self) -> ScanOutcome {
        self.view.begin_busy(Control::ScanAll);
        let result = self.service.scan_all().await;
        self.view.end_busy(Control::ScanAll);

        let outcome = match result {
            Ok(summary) if summary.new_files > 0 => ScanOutcome {
                kind: MessageKind::Success,
                message: translate(
                    "scan_complete",
                    self.lang(),
                    &[("count", summary.new_files.to_string().as_str())],
                ),
                reload: Some(self.config.reload_delay),
            },
            Ok(_) => ScanOutcome {
                kind: MessageKind::Info,
                message: translate("scan_no_new_files", self.lang(), &[]),
                reload: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "library scan failed");
                ScanOutcome {
                    kind: MessageKind::Error,
                    message: translate("scan_error", self.lang(), &[("error", e.to_string().as_str())]),
                    reload: None,
                }
            }
        };

        self.finish(&outcome);
        outcome
    }

    /// Reload the picker from the server. Returns the number of files, or 0
    /// when the server reported failure (the picker is left as it was).
    pub async fn refresh_file_list(&self) -> Result<usize, ApiError> {
        let listing = self.service.list_files().await.map_err(|e| {
            tracing::warn!(error = %e, "loading file list failed");
            e
        })?;

        if !listing.success {
            tracing::debug!("server declined file listing");
            return Ok(0);
        }

        let options: Vec<FileOption> = listing.files.iter().map(FileOption::from).collect();
        self.view
            .populate_files(&translate("file_select_placeholder", self.lang(), &[]), &options);
        // Repopulating resets the selection to the placeholder
        self.view.set_scan_file_available(false);
        Ok(options.len())
    }

    /// Picker change handler.
    pub fn select_file(&self, value: &str) {
        self.view.set_scan_file_available(!value.is_empty());
    }

    /// Scan the picked file. No selection is a silent no-op (`None`).
    pub async fn trigger_file_scan(&self, selected: Option<&str>) -> Option<ScanOutcome> {
        let path = selected.filter(|p| !p.is_empty())?;

        self.view.begin_busy(Control::ScanFile);
        let result = self.service.scan_file(path).await;
        self.view.end_busy(Control::ScanFile);

        let outcome = match result {
            Ok(reply) if reply.success => {
                let outcome = ScanOutcome {
                    kind: MessageKind::Success,
                    message: translate("file_scan_success", self.lang(), &[("message", reply.message.as_str())]),
                    reload: Some(self.config.reload_delay),
                };
                // Reload is armed first so a stalled listing cannot hold it back
                self.finish(&outcome);
                if let Err(e) = self.refresh_file_list().await {
                    tracing::warn!(error = %e, "file list refresh after scan failed");
                }
                return Some(outcome);
            }
            Ok(reply) => ScanOutcome {
                kind: MessageKind::Info,
                message: translate("file_scan_failed", self.lang(), &[("message", reply.message.as_str())]),
                reload: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, file = path, "file scan failed");
                ScanOutcome {
                    kind: MessageKind::Error,
                    message: translate("file_scan_error", self.lang(), &[("error", e.to_string().as_str())]),
                    reload: None,
                }
            }
        };

        self.finish(&outcome);
        Some(outcome)
    }

    fn finish(&self, outcome: &ScanOutcome) {
        self.view.show_message(outcome.kind, &outcome.message);
        if let Some(delay) = outcome.reload {
            self.view.schedule_reload(delay);
        }
    }
}
