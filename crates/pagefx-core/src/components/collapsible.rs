//! Animated open/close of collapsible sections
//!
//! Each section runs a four-state machine. Toggle clicks are only accepted
//! in the resting states; a click during `Opening` or `Closing` is
//! swallowed so the timed transition always completes.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::CollapsibleConfig;
use crate::dom::{EventKind, Page, Response, Target, millis};
use crate::error::Result;

use super::report;

const OPEN: &str = "open";

/// Open/close state of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl SectionState {
    /// Whether a timed transition is in flight
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

struct Section<N> {
    container: N,
    toggle: N,
    content: Option<N>,
    state: Cell<SectionState>,
}

/// Controller for every section that has a toggle control
pub struct Collapsible<P: Page> {
    page: Rc<P>,
    duration_ms: u32,
    sections: Vec<Rc<Section<P::Node>>>,
}

impl<P: Page> Collapsible<P> {
    /// Closes every section with a toggle and intercepts its clicks
    ///
    /// # Errors
    ///
    /// Returns an error if a section cannot be closed or a listener cannot
    /// be registered.
    pub fn install(page: &Rc<P>, config: &CollapsibleConfig) -> Result<Rc<Self>> {
        let mut sections = Vec::new();
        for container in page.query_all(&config.sections) {
            let Some(toggle) = page.query_within(&container, &config.toggle) else {
                continue;
            };
            page.remove_attribute(&container, OPEN)?;
            let content = page.query_within(&container, &config.content);
            sections.push(Rc::new(Section {
                container,
                toggle,
                content,
                state: Cell::new(SectionState::Closed),
            }));
        }

        let this = Rc::new(Self {
            page: Rc::clone(page),
            duration_ms: config.duration_ms,
            sections,
        });

        for (index, section) in this.sections.iter().enumerate() {
            let component = Rc::clone(&this);
            page.listen(
                Target::Node(section.toggle.clone()),
                EventKind::Click,
                Box::new(move |_| {
                    component.toggle_at(index);
                    Response::PreventDefault
                }),
            )?;
        }

        info!(sections = this.sections.len(), "collapsible sections initialised");
        Ok(this)
    }

    /// Toggles the section whose container is `container`.
    /// Returns the state after the call, or `None` for an unknown section.
    pub fn toggle(&self, container: &P::Node) -> Option<SectionState> {
        let index = self.sections.iter().position(|s| &s.container == container)?;
        self.toggle_at(index)
    }

    #[must_use]
    pub fn state(&self, container: &P::Node) -> Option<SectionState> {
        self.sections
            .iter()
            .find(|s| &s.container == container)
            .map(|s| s.state.get())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Clicks the toggle of the section with id `id` after `delay_ms`
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be scheduled.
    pub fn schedule_auto_open(self: &Rc<Self>, id: &str, delay_ms: u32) -> Result<()> {
        let component = Rc::clone(self);
        let id = id.to_string();
        self.page.set_timeout(
            millis(delay_ms),
            Box::new(move || {
                let toggle = component.sections.iter().find_map(|s| {
                    (component.page.attribute(&s.container, "id").as_deref() == Some(id.as_str()))
                        .then(|| s.toggle.clone())
                });
                match toggle {
                    Some(toggle) => component.page.click(&toggle),
                    None => debug!(id = %id, "auto-open section not found"),
                }
            }),
        )
    }

    fn toggle_at(&self, index: usize) -> Option<SectionState> {
        let section = self.sections.get(index)?;
        let state = section.state.get();
        if state.is_transient() {
            debug!(?state, "toggle ignored during transition");
        } else if state == SectionState::Closed {
            self.open(section);
        } else {
            self.close(section);
        }
        Some(section.state.get())
    }

    fn open(&self, section: &Rc<Section<P::Node>>) {
        report(
            self.page.set_attribute(&section.container, OPEN, ""),
            "open section",
        );
        let Some(content) = section.content.clone() else {
            section.state.set(SectionState::Open);
            return;
        };

        report(self.page.set_style(&content, "max-height", "0"), "collapse content");
        report(self.page.set_style(&content, "opacity", "0"), "hide content");
        section.state.set(SectionState::Opening);

        // A throttled frame may land after the transition already settled.
        let page = Rc::clone(&self.page);
        let growing = Rc::clone(section);
        let grow = content.clone();
        report(
            self.page.next_frame(Box::new(move || {
                if growing.state.get() != SectionState::Opening {
                    return;
                }
                let height = format!("{}px", page.scroll_height(&grow));
                report(page.set_style(&grow, "max-height", &height), "expand content");
                report(page.set_style(&grow, "opacity", "1"), "show content");
            })),
            "schedule expand",
        );

        let page = Rc::clone(&self.page);
        let settled = Rc::clone(section);
        let release = content.clone();
        let scheduled = self.page.set_timeout(
            millis(self.duration_ms),
            Box::new(move || Self::finish_open(&*page, &settled, &release)),
        );
        if let Err(err) = scheduled {
            warn!(%err, "open transition not scheduled, settling now");
            Self::finish_open(&*self.page, section, &content);
        }
    }

    fn finish_open(page: &P, section: &Section<P::Node>, content: &P::Node) {
        report(page.set_style(content, "max-height", "none"), "release height");
        report(page.set_style(content, "opacity", "1"), "show content");
        section.state.set(SectionState::Open);
    }

    fn close(&self, section: &Rc<Section<P::Node>>) {
        let Some(content) = section.content.clone() else {
            report(
                self.page.remove_attribute(&section.container, OPEN),
                "close section",
            );
            section.state.set(SectionState::Closed);
            return;
        };

        let height = format!("{}px", self.page.scroll_height(&content));
        report(self.page.set_style(&content, "max-height", &height), "pin content");
        report(self.page.set_style(&content, "opacity", "1"), "show content");
        section.state.set(SectionState::Closing);

        let page = Rc::clone(&self.page);
        let shrinking = Rc::clone(section);
        let shrink = content.clone();
        report(
            self.page.next_frame(Box::new(move || {
                if shrinking.state.get() != SectionState::Closing {
                    return;
                }
                report(page.set_style(&shrink, "max-height", "0"), "collapse content");
                report(page.set_style(&shrink, "opacity", "0"), "hide content");
            })),
            "schedule collapse",
        );

        let page = Rc::clone(&self.page);
        let settled = Rc::clone(section);
        let folded = content.clone();
        let scheduled = self.page.set_timeout(
            millis(self.duration_ms),
            Box::new(move || Self::finish_close(&*page, &settled, &folded)),
        );
        if let Err(err) = scheduled {
            warn!(%err, "close transition not scheduled, settling now");
            Self::finish_close(&*self.page, section, &content);
        }
    }

    fn finish_close(page: &P, section: &Section<P::Node>, content: &P::Node) {
        report(page.set_style(content, "max-height", "0"), "collapse content");
        report(page.set_style(content, "opacity", "0"), "hide content");
        report(page.remove_attribute(&section.container, OPEN), "close section");
        section.state.set(SectionState::Closed);
    }
}
