//! DOM facade consumed by every component
//!
//! Components never touch a browser API directly. They register typed
//! callbacks against these traits, which lets the same behavior run against
//! `web-sys` in the browser and against an in-memory page in host tests.
//!
//! The facade is single-threaded: handlers are `FnMut` boxes without `Send`,
//! and implementations hand out nodes by value (`Node: Clone`).

use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// Read and write access to the document tree
pub trait Dom {
    /// Handle to an element of the page
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// First element matching `selector`, if any
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Every element matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// Element carrying the given `id` attribute
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The document body
    fn body(&self) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the attribute cannot be written.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the attribute cannot be removed.
    fn remove_attribute(&self, node: &Self::Node, name: &str) -> Result<()>;

    #[inline]
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// # Errors
    ///
    /// Returns an error if the class list cannot be updated.
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the class list cannot be updated.
    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<()>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Inline style value of `property` (kebab-case); empty when unset
    fn style(&self, node: &Self::Node, property: &str) -> String;

    /// # Errors
    ///
    /// Returns an error if the inline style cannot be written.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    /// Full content height in pixels, including overflow
    fn scroll_height(&self, node: &Self::Node) -> f64;

    /// Smooth-scrolls `node` into view, aligned to its start edge
    fn scroll_into_view(&self, node: &Self::Node);

    /// Synthesises a click on `node`, running its click listeners
    fn click(&self, node: &Self::Node);

    /// # Errors
    ///
    /// Returns an error if the element cannot be created.
    fn create_element(&self, tag: &str) -> Result<Self::Node>;

    fn set_html(&self, node: &Self::Node, html: &str);

    /// # Errors
    ///
    /// Returns an error if there is no body or the insertion is rejected.
    fn append_to_body(&self, node: &Self::Node) -> Result<()>;

    /// Removes `node` from its parent; no-op when already detached
    fn detach(&self, node: &Self::Node);

    /// Appends a `<style>` element holding `css` to the document head
    ///
    /// # Errors
    ///
    /// Returns an error if the stylesheet cannot be inserted.
    fn inject_stylesheet(&self, css: &str) -> Result<()>;

    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> f64;
}

/// Event kinds the enhancement layer listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DoubleClick,
    MouseEnter,
    MouseLeave,
    KeyDown,
    Resize,
}

impl EventKind {
    /// DOM event type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::KeyDown => "keydown",
            Self::Resize => "resize",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq)]
pub enum Target<N> {
    Node(N),
    Document,
    Window,
}

/// Event data handed to handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvent {
    pub kind: EventKind,
    /// Physical key code (`KeyboardEvent.code`) for keyboard events
    pub code: Option<String>,
}

impl PageEvent {
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self { kind, code: None }
    }

    #[must_use]
    pub fn key(code: impl Into<String>) -> Self {
        Self {
            kind: EventKind::KeyDown,
            code: Some(code.into()),
        }
    }
}

/// What the platform should do with the event after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Proceed,
    PreventDefault,
}

/// Event handler
pub type Handler = Box<dyn FnMut(&PageEvent) -> Response>;

/// Listener registration
pub trait Events: Dom {
    /// Attaches `handler` to `target` for the page's lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be registered.
    fn listen(&self, target: Target<Self::Node>, kind: EventKind, handler: Handler) -> Result<()>;
}

/// Visibility watch parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    /// Visible ratio in [0, 1] at which a target counts as visible
    pub threshold: f64,
    /// Root margin in CSS shorthand, e.g. `-100px 0px -50% 0px`
    pub root_margin: String,
}

/// Whether to keep watching a target after its handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    Keep,
    Stop,
}

/// Called with each target that became visible
pub type VisibilityHandler<N> = Box<dyn FnMut(&N) -> Watch>;

/// Viewport intersection watching
pub trait Visibility: Dom {
    /// Watches `targets` with a shared `handler`
    ///
    /// # Errors
    ///
    /// Returns an error if the observer cannot be created.
    fn watch(
        &self,
        targets: &[Self::Node],
        options: &WatchOptions,
        handler: VisibilityHandler<Self::Node>,
    ) -> Result<()>;
}

/// Deferred work on the UI event loop
pub trait Timers {
    /// Runs `task` once after `delay`
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be scheduled.
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<()>;

    /// Runs `task` before the next repaint
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be requested.
    fn next_frame(&self, task: Box<dyn FnOnce()>) -> Result<()>;
}

/// Everything a component needs from the page
///
/// `'static` because components capture the page in callbacks that outlive
/// the installing call.
pub trait Page: Events + Visibility + Timers + 'static {}

impl<T: Events + Visibility + Timers + 'static> Page for T {}

/// Converts a millisecond count from configuration into a timer delay
#[inline]
#[must_use]
pub const fn millis(ms: u32) -> Duration {
    Duration::from_millis(ms as u64)
}
