//! `web-sys` implementation of the DOM facade
//!
//! Listener and observer closures are leaked with `Closure::forget`: the
//! enhancement layer never tears its watchers down, so they live exactly as
//! long as the page.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::Array;
use pagefx_core::dom::{
    Dom, EventKind, Events, Handler, PageEvent, Response, Target, Timers, Visibility,
    VisibilityHandler, Watch, WatchOptions,
};
use pagefx_core::error::{DomError, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// The live browser page
#[derive(Debug, Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    /// Binds to the current window and document
    ///
    /// # Errors
    ///
    /// Returns an error when not running in a browser context.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(DomError::WindowNotAvailable)?;
        let document = window.document().ok_or(DomError::DocumentNotAvailable)?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn event_target<'a>(&'a self, target: &'a Target<Element>) -> &'a EventTarget {
        match target {
            Target::Node(node) => node.as_ref(),
            Target::Document => self.document.as_ref(),
            Target::Window => self.window.as_ref(),
        }
    }
}

/// Renders a thrown JS value for an error message
fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"))
}

fn html(node: &Element) -> Option<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
}

impl Dom for WebPage {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }
        self.document.get_element_by_id(id)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value)
            .map_err(|e| DomError::AttributeFailed {
                name: name.to_string(),
                reason: describe(&e),
            })
    }

    fn remove_attribute(&self, node: &Element, name: &str) -> Result<()> {
        node.remove_attribute(name)
            .map_err(|e| DomError::AttributeFailed {
                name: name.to_string(),
                reason: describe(&e),
            })
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list()
            .add_1(class)
            .map_err(|e| DomError::ClassFailed {
                class: class.to_string(),
                reason: describe(&e),
            })
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list()
            .remove_1(class)
            .map_err(|e| DomError::ClassFailed {
                class: class.to_string(),
                reason: describe(&e),
            })
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn style(&self, node: &Element, property: &str) -> String {
        html(node)
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<()> {
        let el = html(node).ok_or_else(|| DomError::StyleFailed {
            property: property.to_string(),
            reason: "not an HTML element".to_string(),
        })?;
        el.style()
            .set_property(property, value)
            .map_err(|e| DomError::StyleFailed {
                property: property.to_string(),
                reason: describe(&e),
            })
    }

    fn scroll_height(&self, node: &Element) -> f64 {
        f64::from(node.scroll_height())
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn click(&self, node: &Element) {
        if let Some(el) = html(node) {
            el.click();
        }
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| DomError::CreateFailed {
                tag: tag.to_string(),
                reason: describe(&e),
            })
    }

    fn set_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn append_to_body(&self, node: &Element) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| DomError::InsertFailed("document has no body".to_string()))?;
        body.append_child(node)
            .map(|_| ())
            .map_err(|e| DomError::InsertFailed(describe(&e)))
    }

    fn detach(&self, node: &Element) {
        node.remove();
    }

    fn inject_stylesheet(&self, css: &str) -> Result<()> {
        let style = self.create_element("style")?;
        style.set_text_content(Some(css));
        let head = self
            .document
            .head()
            .ok_or_else(|| DomError::InsertFailed("document has no head".to_string()))?;
        head.append_child(&style)
            .map(|_| ())
            .map_err(|e| DomError::InsertFailed(describe(&e)))
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }
}

impl Events for WebPage {
    fn listen(&self, target: Target<Element>, kind: EventKind, mut handler: Handler) -> Result<()> {
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let page_event = PageEvent {
                kind,
                code: event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::code),
            };
            if handler(&page_event) == Response::PreventDefault {
                event.prevent_default();
            }
        });

        self.event_target(&target)
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            .map_err(|e| DomError::ListenFailed {
                event: kind.as_str(),
                reason: describe(&e),
            })?;

        closure.forget();
        Ok(())
    }
}

impl Visibility for WebPage {
    fn watch(
        &self,
        targets: &[Element],
        options: &WatchOptions,
        mut handler: VisibilityHandler<Element>,
    ) -> Result<()> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if handler(&target) == Watch::Stop {
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| DomError::ObserveFailed(describe(&e)))?;
        for target in targets {
            observer.observe(target);
        }

        callback.forget();
        Ok(())
    }
}

impl Timers for WebPage {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<()> {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || task()).forget();
        Ok(())
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> Result<()> {
        let callback = Closure::once_into_js(move || task());
        self.window
            .request_animation_frame(callback.unchecked_ref())
            .map(|_| ())
            .map_err(|e| DomError::ScheduleFailed(describe(&e)))
    }
}
