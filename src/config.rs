//! Panel configuration

use crate::i18n::Lang;
use serde::Deserialize;
use std::time::Duration;

/// Delay between a successful scan message and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_millis(2000);

/// Settings shared by the terminal and browser front-ends.
///
/// Deserializes from the object the page injects, e.g.
/// `{ "lang": "de", "auto_refresh_secs": 300 }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Server root. Empty means same origin.
    pub base_url: String,
    pub lang: Lang,
    #[serde(skip)]
    pub reload_delay: Duration,
    /// Full page reload interval in seconds; 0 or absent disables it.
    pub auto_refresh_secs: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            lang: Lang::default(),
            reload_delay: RELOAD_DELAY,
            auto_refresh_secs: None,
        }
    }
}

impl PanelConfig {
    pub fn auto_refresh(&self) -> Option<Duration> {
        self.auto_refresh_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
