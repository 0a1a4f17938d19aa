//! Publishes the utility surface on `window`
//!
//! Scripts on the page call `window.NexSkool.confetti()`,
//! `window.NexSkool.animateProgress(selector, percent)` and
//! `window.NexSkool.scrollTo(id)`. Arguments of the wrong type make the call
//! a no-op instead of throwing.

use std::rc::Rc;

use js_sys::{Object, Reflect};
use pagefx_core::Utilities;
use pagefx_core::error::{DomError, Result};
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::page::WebPage;

/// Reads a percentage passed either as a number or a numeric string
fn percent_arg(value: &JsValue) -> Option<f64> {
    parse_percent(value.as_f64(), value.as_string().as_deref())
}

fn parse_percent(number: Option<f64>, text: Option<&str>) -> Option<f64> {
    number
        .or_else(|| text.and_then(|s| s.trim().parse().ok()))
        .filter(|p: &f64| p.is_finite())
}

fn define(object: &Object, name: &str, function: &JsValue) -> Result<()> {
    Reflect::set(object, &JsValue::from_str(name), function)
        .map(|_| ())
        .map_err(|_| DomError::AttributeFailed {
            name: name.to_string(),
            reason: "could not define function".to_string(),
        })
}

/// Sets `window[name]` to an object exposing `utilities`
///
/// # Errors
///
/// Returns an error if the object cannot be attached to the window.
pub fn publish(window: &Window, name: &str, utilities: &Rc<Utilities<WebPage>>) -> Result<()> {
    let object = Object::new();

    let surface = Rc::clone(utilities);
    let confetti = Closure::<dyn Fn() -> u32>::new(move || {
        u32::try_from(surface.confetti()).unwrap_or(u32::MAX)
    });
    define(&object, "confetti", confetti.as_ref())?;
    confetti.forget();

    let surface = Rc::clone(utilities);
    let animate = Closure::<dyn Fn(JsValue, JsValue) -> bool>::new(
        move |selector: JsValue, percent: JsValue| {
            match (selector.as_string(), percent_arg(&percent)) {
                (Some(selector), Some(percent)) => surface.animate_progress(&selector, percent),
                _ => {
                    tracing::warn!("animateProgress expects (selector, percent)");
                    false
                }
            }
        },
    );
    define(&object, "animateProgress", animate.as_ref())?;
    animate.forget();

    let surface = Rc::clone(utilities);
    let scroll = Closure::<dyn Fn(JsValue) -> bool>::new(move |id: JsValue| {
        id.as_string().is_some_and(|id| surface.scroll_to(&id))
    });
    define(&object, "scrollTo", scroll.as_ref())?;
    scroll.forget();

    Reflect::set(window, &JsValue::from_str(name), &object)
        .map(|_| ())
        .map_err(|_| DomError::AttributeFailed {
            name: name.to_string(),
            reason: "could not attach global object".to_string(),
        })?;

    tracing::debug!(name, "utility surface published");
    Ok(())
}
