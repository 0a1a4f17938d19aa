//! Fade-and-rise of content blocks on first visibility

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::config::RevealConfig;
use crate::dom::{Page, Watch, WatchOptions};
use crate::error::Result;

use super::report;

/// Per-element progress of the reveal animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Hidden and offset, waiting to become visible
    Pending,
    /// Shown; never animated again
    Animated,
}

/// Reveals each matched element at most once
pub struct Reveal<P: Page> {
    page: Rc<P>,
    finished_class: String,
    tracked: RefCell<Vec<(P::Node, RevealState)>>,
}

impl<P: Page> Reveal<P> {
    /// Puts every matched element in its hidden resting state and watches it
    ///
    /// # Errors
    ///
    /// Returns an error if the resting styles cannot be applied or the
    /// visibility watch cannot be created.
    pub fn install(page: &Rc<P>, config: &RevealConfig) -> Result<Rc<Self>> {
        let elements = page.query_all(&config.selectors.join(", "));

        for element in &elements {
            page.set_style(element, "opacity", "0")?;
            page.set_style(element, "transform", &config.hidden_transform)?;
            page.set_style(element, "transition", &config.transition)?;
        }

        let this = Rc::new(Self {
            page: Rc::clone(page),
            finished_class: config.finished_class.clone(),
            tracked: RefCell::new(
                elements
                    .iter()
                    .map(|e| (e.clone(), RevealState::Pending))
                    .collect(),
            ),
        });

        if !elements.is_empty() {
            let options = WatchOptions {
                threshold: config.threshold,
                root_margin: config.root_margin.clone(),
            };
            let component = Rc::clone(&this);
            page.watch(
                &elements,
                &options,
                Box::new(move |element| {
                    component.reveal(element);
                    Watch::Keep
                }),
            )?;
        }

        info!(elements = elements.len(), "elements observed for reveal");
        Ok(this)
    }

    /// Shows `element` if it is still pending; returns whether it changed
    pub fn reveal(&self, element: &P::Node) -> bool {
        {
            let mut tracked = self.tracked.borrow_mut();
            let Some(entry) = tracked.iter_mut().find(|(node, _)| node == element) else {
                return false;
            };
            if entry.1 == RevealState::Animated {
                return false;
            }
            entry.1 = RevealState::Animated;
        }

        report(self.page.set_style(element, "opacity", "1"), "reveal opacity");
        report(
            self.page.set_style(element, "transform", "translateY(0)"),
            "reveal transform",
        );
        report(
            self.page.add_class(element, &self.finished_class),
            "reveal marker",
        );
        true
    }

    #[must_use]
    pub fn state(&self, element: &P::Node) -> Option<RevealState> {
        self.tracked
            .borrow()
            .iter()
            .find(|(node, _)| node == element)
            .map(|(_, state)| *state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.borrow().is_empty()
    }
}
