//! Reads page configuration embedded in the document
//!
//! A page opts into non-default selectors or timings with
//! `<script id="pagefx-config" type="application/json">{...}</script>`.

use pagefx_core::Config;
use pagefx_core::ConfigError;
use web_sys::Document;

/// Id of the embedded configuration element
pub const CONFIG_ELEMENT_ID: &str = "pagefx-config";

/// Configuration for `document`, plus the reason defaults were used instead
///
/// A missing element is not an error. A malformed one falls back to
/// defaults and reports why, so the caller can log it once logging is up.
#[must_use]
pub fn load(document: &Document) -> (Config, Option<ConfigError>) {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());

    match text {
        None => (Config::default(), None),
        Some(text) if text.trim().is_empty() => (Config::default(), None),
        Some(text) => match Config::from_json(&text) {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        },
    }
}
