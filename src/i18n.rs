//! Message catalogues
//!
//! User-facing text lives in `locale/<lang>.json`, embedded at build time.
//! Lookups fall back to English and then to the key itself, so a missing
//! translation degrades to something readable instead of an empty message.
//! Placeholders are written `{name}` and filled from the `args` slice.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    De,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::De];

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::De => "de",
        }
    }

    /// Pick the display language.
    ///
    /// 1. a supported `lang` parameter in the query string (`?lang=de`)
    /// 2. an accept-language value mentioning "de", then "en"
    /// 3. `fallback`
    pub fn negotiate(query: Option<&str>, accept_language: Option<&str>, fallback: Lang) -> Lang {
        if let Some(lang) = query.and_then(Lang::from_query) {
            return lang;
        }
        let accept = accept_language.unwrap_or_default().to_lowercase();
        if accept.contains("de") {
            Lang::De
        } else if accept.contains("en") {
            Lang::En
        } else {
            fallback
        }
    }

    /// The supported `lang` parameter of a query string, with or without
    /// the leading `?`.
    pub fn from_query(query: &str) -> Option<Lang> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query.trim_start_matches('?')).ok()?;
        pairs
            .into_iter()
            .find(|(k, _)| k == "lang")
            .and_then(|(_, v)| v.parse().ok())
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "de" => Ok(Lang::De),
            other => Err(format!("unsupported language '{}' (expected en or de)", other)),
        }
    }
}

type Catalog = HashMap<String, String>;

static CATALOGS: Lazy<HashMap<Lang, Catalog>> = Lazy::new(|| {
    let mut catalogs = HashMap::new();
    catalogs.insert(Lang::En, parse_catalog(Lang::En, include_str!("../locale/en.json")));
    catalogs.insert(Lang::De, parse_catalog(Lang::De, include_str!("../locale/de.json")));
    catalogs
});

fn parse_catalog(lang: Lang, json: &str) -> Catalog {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::error!(%lang, error = %e, "embedded message catalogue is invalid");
        Catalog::new()
    })
}

/// Raw catalogue for `lang`.
pub fn catalog(lang: Lang) -> &'static HashMap<String, String> {
    static EMPTY: Lazy<Catalog> = Lazy::new(Catalog::new);
    CATALOGS.get(&lang).unwrap_or(&EMPTY)
}

/// Look up `key` in `lang` (then English, then the key itself) and fill in
/// `{name}` placeholders.
pub fn translate(key: &str, lang: Lang, args: &[(&str, &str)]) -> String {
    let template = catalog(lang)
        .get(key)
        .or_else(|| catalog(Lang::En).get(key))
        .map(String::as_str)
        .unwrap_or(key);

    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}
