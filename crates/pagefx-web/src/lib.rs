//! Browser entry point for the enhancement layer
//!
//! Loaded as a wasm module by the document page. On start it waits for the
//! DOM to finish parsing, reads the embedded configuration, installs every
//! component through the `web-sys` page and publishes the utility surface.

#![forbid(unsafe_code)]

pub mod console;
pub mod global;
pub mod page;
pub mod settings;

use std::rc::Rc;

use pagefx_core::{DomError, InitError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub use page::WebPage;

/// Module start hook
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = when_ready(boot) {
        web_sys::console::error_1(&JsValue::from_str(&format!(
            "page enhancements not started: {err}"
        )));
    }
}

/// Runs `task` once the document is parsed
fn when_ready(task: fn()) -> Result<(), DomError> {
    let window = web_sys::window().ok_or(DomError::WindowNotAvailable)?;
    let document = window.document().ok_or(DomError::DocumentNotAvailable)?;

    if document.ready_state() != "loading" {
        task();
        return Ok(());
    }

    let callback = Closure::once_into_js(task);
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        .map_err(|_| DomError::ListenFailed {
            event: "DOMContentLoaded",
            reason: "listener rejected".to_string(),
        })
}

fn boot() {
    match try_boot() {
        Ok(()) => info!("page enhancements ready"),
        Err(err) => error!(%err, "page enhancements failed to start"),
    }
}

fn try_boot() -> Result<(), InitError> {
    let page = Rc::new(WebPage::new()?);
    let (config, rejected) = settings::load(page.document());

    console::init(&config.log_level);
    if let Some(err) = rejected {
        warn!(%err, "ignoring embedded configuration, using defaults");
    }

    let enhancements = pagefx_core::install(&page, &config, StdRng::seed_from_u64(seed()))?;
    global::publish(page.window(), &config.global_name, &enhancements.utilities)?;
    Ok(())
}

/// Entropy for particle placement; quality does not matter here
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seed() -> u64 {
    let random = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    random ^ (js_sys::Date::now() as u64)
}
