//! In-memory page for host tests
//!
//! Implements the whole facade without a browser: a small element tree with
//! a selector matcher (tag, `.class`, `#id`, `[attr]`, `[attr="v"]`,
//! `[attr^="v"]`, descendant combinator, `,` groups), a listener registry,
//! simulated visibility changes and a virtual clock driven by [`MockPage::advance`].

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{
    Dom, EventKind, Events, Handler, PageEvent, Response, Target, Timers, Visibility,
    VisibilityHandler, Watch, WatchOptions,
};
use crate::error::{DomError, Result};

/// Frame length of the virtual clock
pub const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll_height: f64,
    html: String,
}

struct Listener {
    target: Target<NodeId>,
    kind: EventKind,
    handler: Rc<RefCell<Handler>>,
}

struct Watcher {
    options: WatchOptions,
    targets: RefCell<Vec<NodeId>>,
    handler: RefCell<VisibilityHandler<NodeId>>,
}

struct Timer {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

pub struct MockPage {
    nodes: RefCell<Vec<Element>>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    listeners: RefCell<Vec<Listener>>,
    watchers: RefCell<Vec<Rc<Watcher>>>,
    timers: RefCell<Vec<Timer>>,
    now: Cell<u64>,
    seq: Cell<u64>,
    viewport: Cell<f64>,
    scrolled: RefCell<Vec<NodeId>>,
    stylesheets: RefCell<Vec<String>>,
    frame_delay: Cell<u64>,
    timers_failing: Cell<bool>,
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPage {
    /// Empty document with `<html>`, `<head>` and `<body>`, 1280px wide
    #[must_use]
    pub fn new() -> Self {
        let page = Self {
            nodes: RefCell::new(vec![Element {
                tag: "html".to_string(),
                ..Element::default()
            }]),
            root: NodeId(0),
            head: NodeId(1),
            body: NodeId(2),
            listeners: RefCell::new(Vec::new()),
            watchers: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            now: Cell::new(0),
            seq: Cell::new(0),
            viewport: Cell::new(1280.0),
            scrolled: RefCell::new(Vec::new()),
            stylesheets: RefCell::new(Vec::new()),
            frame_delay: Cell::new(FRAME_MS),
            timers_failing: Cell::new(false),
        };
        page.append(page.root, "head", &[]);
        page.append(page.root, "body", &[]);
        page
    }

    #[must_use]
    pub const fn body_node(&self) -> NodeId {
        self.body
    }

    /// Appends a new element under `parent` and returns it
    pub fn append(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            parent: Some(parent),
            ..Element::default()
        });
        nodes[parent.0].children.push(id);
        id
    }

    /// Delay before `next_frame` tasks run, as in a throttled background tab
    pub fn set_frame_delay(&self, ms: u64) {
        self.frame_delay.set(ms);
    }

    /// Makes `set_timeout` and `next_frame` reject new tasks
    pub fn set_timers_failing(&self, failing: bool) {
        self.timers_failing.set(failing);
    }

    pub fn set_scroll_height(&self, node: NodeId, height: f64) {
        self.nodes.borrow_mut()[node.0].scroll_height = height;
    }

    pub fn set_viewport_width(&self, width: f64) {
        self.viewport.set(width);
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    #[must_use]
    pub fn html(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].html.clone()
    }

    #[must_use]
    pub fn scrolled(&self) -> Vec<NodeId> {
        self.scrolled.borrow().clone()
    }

    #[must_use]
    pub fn stylesheets(&self) -> Vec<String> {
        self.stylesheets.borrow().clone()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now.get()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Whether any watcher still observes `node`
    #[must_use]
    pub fn is_watched(&self, node: NodeId) -> bool {
        self.watchers
            .borrow()
            .iter()
            .any(|w| w.targets.borrow().contains(&node))
    }

    /// Options of every watcher observing `node`
    #[must_use]
    pub fn watch_options(&self, node: NodeId) -> Vec<WatchOptions> {
        self.watchers
            .borrow()
            .iter()
            .filter(|w| w.targets.borrow().contains(&node))
            .map(|w| w.options.clone())
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self, target: &Target<NodeId>, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| &l.target == target && l.kind == kind)
            .count()
    }

    /// Delivers `event` to every listener on `target`
    pub fn dispatch(&self, target: &Target<NodeId>, event: &PageEvent) -> Response {
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| &l.target == target && l.kind == event.kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        handlers
            .iter()
            .map(|h| {
                let mut handler = h.borrow_mut();
                (*handler)(event)
            })
            .fold(Response::Proceed, |acc, r| {
                if r == Response::PreventDefault {
                    r
                } else {
                    acc
                }
            })
    }

    pub fn click_node(&self, node: NodeId) -> Response {
        self.dispatch(&Target::Node(node), &PageEvent::new(EventKind::Click))
    }

    pub fn double_click(&self, node: NodeId) -> Response {
        self.dispatch(&Target::Node(node), &PageEvent::new(EventKind::DoubleClick))
    }

    pub fn hover(&self, node: NodeId) -> Response {
        self.dispatch(&Target::Node(node), &PageEvent::new(EventKind::MouseEnter))
    }

    pub fn leave(&self, node: NodeId) -> Response {
        self.dispatch(&Target::Node(node), &PageEvent::new(EventKind::MouseLeave))
    }

    pub fn press(&self, code: &str) -> Response {
        self.dispatch(&Target::Document, &PageEvent::key(code))
    }

    /// Changes the viewport width and fires `resize` on the window
    pub fn resize(&self, width: f64) -> Response {
        self.viewport.set(width);
        self.dispatch(&Target::Window, &PageEvent::new(EventKind::Resize))
    }

    /// Reports `node` as `ratio` visible to every watcher observing it
    pub fn show(&self, node: NodeId, ratio: f64) {
        let watchers: Vec<_> = self.watchers.borrow().iter().map(Rc::clone).collect();
        for watcher in watchers {
            let observed = watcher.targets.borrow().contains(&node);
            if !observed || ratio <= 0.0 || ratio < watcher.options.threshold {
                continue;
            }
            let decision = {
                let mut handler = watcher.handler.borrow_mut();
                (*handler)(&node)
            };
            if decision == Watch::Stop {
                watcher.targets.borrow_mut().retain(|t| *t != node);
            }
        }
    }

    /// Moves the virtual clock forward, running every timer that falls due
    pub fn advance(&self, ms: u64) {
        let until = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let position = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                position.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }
        self.now.set(until);
    }

    fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay_ms,
            seq,
            task,
        });
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let groups = parse_selector(selector);
        let candidates = self.descendants(scope);
        let nodes = self.nodes.borrow();
        candidates
            .into_iter()
            .filter(|id| groups.iter().any(|chain| matches_chain(&nodes, *id, chain)))
            .collect()
    }

    fn attr_of(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

impl Dom for MockPage {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(self.root, selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.root, selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.select(*scope, selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr_of(*n, "id").as_deref() == Some(id))
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr_of(*node, name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let attrs = &mut nodes[node.0].attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) -> Result<()> {
        self.nodes.borrow_mut()[node.0].attrs.retain(|(k, _)| k != name);
        Ok(())
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<()> {
        if self.has_class(node, class) {
            return Ok(());
        }
        let joined = match self.attr_of(*node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &joined)
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<()> {
        let Some(existing) = self.attr_of(*node, "class") else {
            return Ok(());
        };
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        self.set_attribute(node, "class", &kept.join(" "))
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.attr_of(*node, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        style.retain(|(k, _)| k != property);
        if !value.is_empty() {
            style.push((property.to_string(), value.to_string()));
        }
        Ok(())
    }

    fn scroll_height(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].scroll_height
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolled.borrow_mut().push(*node);
    }

    fn click(&self, node: &NodeId) {
        self.click_node(*node);
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Element {
            tag: tag.to_string(),
            ..Element::default()
        });
        Ok(id)
    }

    fn set_html(&self, node: &NodeId, html: &str) {
        self.nodes.borrow_mut()[node.0].html = html.to_string();
    }

    fn append_to_body(&self, node: &NodeId) -> Result<()> {
        self.detach(node);
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].parent = Some(self.body);
        nodes[self.body.0].children.push(*node);
        Ok(())
    }

    fn detach(&self, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| c != node);
        }
    }

    fn inject_stylesheet(&self, css: &str) -> Result<()> {
        let style = self.append(self.head, "style", &[]);
        self.set_html(&style, css);
        self.stylesheets.borrow_mut().push(css.to_string());
        Ok(())
    }

    fn viewport_width(&self) -> f64 {
        self.viewport.get()
    }
}

impl Events for MockPage {
    fn listen(&self, target: Target<NodeId>, kind: EventKind, handler: Handler) -> Result<()> {
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }
}

impl Visibility for MockPage {
    fn watch(
        &self,
        targets: &[NodeId],
        options: &WatchOptions,
        handler: VisibilityHandler<NodeId>,
    ) -> Result<()> {
        self.watchers.borrow_mut().push(Rc::new(Watcher {
            options: options.clone(),
            targets: RefCell::new(targets.to_vec()),
            handler: RefCell::new(handler),
        }));
        Ok(())
    }
}

impl Timers for MockPage {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Result<()> {
        if self.timers_failing.get() {
            return Err(DomError::ScheduleFailed("timers disabled".to_string()));
        }
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.schedule(delay_ms, task);
        Ok(())
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> Result<()> {
        if self.timers_failing.get() {
            return Err(DomError::ScheduleFailed("frames disabled".to_string()));
        }
        self.schedule(self.frame_delay.get(), task);
        Ok(())
    }
}

// ============================================================================
// SELECTOR MATCHING
// ============================================================================

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug)]
enum AttrTest {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

/// Splits on `sep` outside of brackets
fn split_outside_brackets(input: &str, sep: fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0_u32;
    for ch in input.chars() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && sep(ch) {
            if !current.trim().is_empty() {
                parts.push(current.trim().to_string());
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn parse_selector(selector: &str) -> Vec<Vec<Compound>> {
    split_outside_brackets(selector, |c| c == ',')
        .iter()
        .map(|group| {
            split_outside_brackets(group, char::is_whitespace)
                .iter()
                .map(String::as_str)
                .map(parse_compound)
                .collect()
        })
        .collect()
}

fn parse_compound(input: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();
    let read_name = |chars: &mut std::iter::Peekable<std::str::Chars<'_>>| {
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        name
    };

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                compound.classes.push(read_name(&mut chars));
            }
            '#' => {
                chars.next();
                compound.id = Some(read_name(&mut chars));
            }
            '[' => {
                chars.next();
                let body: String = chars.by_ref().take_while(|c| *c != ']').collect();
                compound.attrs.push(parse_attr(&body));
            }
            _ => {
                let name = read_name(&mut chars);
                if name.is_empty() {
                    chars.next();
                } else {
                    compound.tag = Some(name.to_lowercase());
                }
            }
        }
    }
    compound
}

fn parse_attr(body: &str) -> AttrTest {
    let unquote = |v: &str| v.trim().trim_matches('"').trim_matches('\'').to_string();
    if let Some((name, value)) = body.split_once("^=") {
        AttrTest::Prefix(name.trim().to_string(), unquote(value))
    } else if let Some((name, value)) = body.split_once('=') {
        AttrTest::Equals(name.trim().to_string(), unquote(value))
    } else {
        AttrTest::Present(body.trim().to_string())
    }
}

fn attr(element: &Element, name: &str) -> Option<String> {
    element
        .attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

fn matches_compound(element: &Element, compound: &Compound) -> bool {
    let tag_ok = compound.tag.as_ref().is_none_or(|t| *t == element.tag);
    let id_ok = compound
        .id
        .as_ref()
        .is_none_or(|id| attr(element, "id").as_deref() == Some(id.as_str()));
    let classes = attr(element, "class").unwrap_or_default();
    let classes_ok = compound
        .classes
        .iter()
        .all(|c| classes.split_whitespace().any(|have| have == c));
    let attrs_ok = compound.attrs.iter().all(|test| match test {
        AttrTest::Present(name) => attr(element, name).is_some(),
        AttrTest::Equals(name, value) => attr(element, name).as_deref() == Some(value.as_str()),
        AttrTest::Prefix(name, value) => {
            attr(element, name).is_some_and(|v| v.starts_with(value.as_str()))
        }
    });
    tag_ok && id_ok && classes_ok && attrs_ok
}

fn matches_chain(nodes: &[Element], id: NodeId, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(&nodes[id.0], last) {
        return false;
    }
    let mut remaining = ancestors;
    let mut cursor = nodes[id.0].parent;
    while let Some((wanted, rest)) = remaining.split_last() {
        let Some(ancestor) = cursor else {
            return false;
        };
        if matches_compound(&nodes[ancestor.0], wanted) {
            remaining = rest;
        }
        cursor = nodes[ancestor.0].parent;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matching() {
        let page = MockPage::new();
        let nav = page.append(page.body, "nav", &[("class", "sommaire")]);
        let link = page.append(nav, "a", &[("href", "#intro")]);
        let outside = page.append(page.body, "a", &[("href", "https://example.org")]);
        let section = page.append(
            page.body,
            "details",
            &[("class", "section-block"), ("id", "intro")],
        );

        assert_eq!(page.query_all(".sommaire a"), vec![link]);
        assert_eq!(page.query_all(r##"a[href^="#"]"##), vec![link]);
        assert_eq!(page.query_all("a"), vec![link, outside]);
        assert_eq!(page.query_all(".section-block[id]"), vec![section]);
        assert_eq!(
            page.query(r#".section-block[id="intro"]"#),
            Some(section)
        );
        assert_eq!(page.query_all(".sommaire, .section-block"), vec![nav, section]);
        assert_eq!(page.element_by_id("intro"), Some(section));
        assert_eq!(page.element_by_id(""), None);
    }

    #[test]
    fn test_timers_run_in_due_order() {
        let page = MockPage::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = Rc::clone(&log);
            page.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(label)),
            )
            .unwrap();
        }
        page.advance(15);
        assert_eq!(*log.borrow(), vec!["a"]);
        page.advance(100);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(page.pending_timers(), 0);
        assert_eq!(page.now_ms(), 115);
    }

    #[test]
    fn test_class_updates() {
        let page = MockPage::new();
        let node = page.append(page.body, "div", &[("class", "card")]);
        page.add_class(&node, "active").unwrap();
        page.add_class(&node, "active").unwrap();
        assert_eq!(page.attribute(&node, "class").as_deref(), Some("card active"));
        page.remove_class(&node, "card").unwrap();
        assert!(!page.has_class(&node, "card"));
        assert!(page.has_class(&node, "active"));
    }
}
