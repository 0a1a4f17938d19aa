//! Progress fills grow to their declared width once in view

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::ProgressConfig;
use crate::dom::{Page, Watch, WatchOptions, millis};
use crate::error::Result;

use super::report;

const ZERO: &str = "0%";

/// Per-bar progress of the fill animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarState {
    /// Held at zero; `target` is the width it will grow to
    Pending { target: String },
    /// Growth scheduled; the bar is no longer watched
    Animated,
}

/// Animates each progress fill at most once
pub struct ProgressBars<P: Page> {
    page: Rc<P>,
    delay_ms: u32,
    bars: RefCell<Vec<(P::Node, BarState)>>,
}

impl<P: Page> ProgressBars<P> {
    /// Records each bar's declared width, zeroes it and watches it
    ///
    /// # Errors
    ///
    /// Returns an error if a bar cannot be zeroed or the visibility watch
    /// cannot be created.
    pub fn install(page: &Rc<P>, config: &ProgressConfig) -> Result<Rc<Self>> {
        let nodes = page.query_all(&config.selector);
        let mut bars = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let declared = page.style(node, "width");
            let target = if declared.is_empty() {
                ZERO.to_string()
            } else {
                declared
            };
            page.set_style(node, "width", ZERO)?;
            bars.push((node.clone(), BarState::Pending { target }));
        }

        let this = Rc::new(Self {
            page: Rc::clone(page),
            delay_ms: config.delay_ms,
            bars: RefCell::new(bars),
        });

        if nodes.is_empty() {
            debug!("no progress bars");
            return Ok(this);
        }

        let options = WatchOptions {
            threshold: config.threshold,
            root_margin: "0px".to_string(),
        };
        let component = Rc::clone(&this);
        page.watch(
            &nodes,
            &options,
            Box::new(move |bar| {
                component.start(bar);
                Watch::Stop
            }),
        )?;

        info!(bars = nodes.len(), "progress bars initialised");
        Ok(this)
    }

    /// Schedules growth of a pending bar. A width written since install
    /// (e.g. by `animate_progress`) wins over the recorded one.
    /// Returns whether anything was scheduled.
    pub fn start(&self, bar: &P::Node) -> bool {
        let recorded = {
            let mut bars = self.bars.borrow_mut();
            let Some(entry) = bars.iter_mut().find(|(node, _)| node == bar) else {
                return false;
            };
            match std::mem::replace(&mut entry.1, BarState::Animated) {
                BarState::Pending { target } => target,
                BarState::Animated => return false,
            }
        };
        let current = self.page.style(bar, "width");
        let target = if current.is_empty() || current == ZERO {
            recorded
        } else {
            debug!(width = %current, "keeping width set since install");
            current
        };
        report(self.page.set_style(bar, "width", ZERO), "reset progress");

        let page = Rc::clone(&self.page);
        let node = bar.clone();
        report(
            self.page.set_timeout(
                millis(self.delay_ms),
                Box::new(move || report(page.set_style(&node, "width", &target), "progress width")),
            ),
            "schedule progress",
        );
        true
    }

    #[must_use]
    pub fn state(&self, bar: &P::Node) -> Option<BarState> {
        self.bars
            .borrow()
            .iter()
            .find(|(node, _)| node == bar)
            .map(|(_, state)| state.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.borrow().is_empty()
    }
}
