//! Lift effects on pointer enter/leave

use std::rc::Rc;

use tracing::info;

use crate::config::HoverConfig;
use crate::dom::{EventKind, Page, Response, Target};
use crate::error::Result;

use super::report;

/// Transform pair applied on enter and restored on leave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverLift {
    pub enter: &'static str,
    pub leave: &'static str,
}

impl HoverLift {
    pub const BADGE: Self = Self {
        enter: "translateY(-3px) scale(1.1)",
        leave: "translateY(0) scale(1)",
    };
    pub const CARD: Self = Self {
        enter: "translateY(-5px) scale(1.02)",
        leave: "translateY(0) scale(1)",
    };
    pub const SECTION: Self = Self {
        enter: "translateY(-2px)",
        leave: "translateY(0)",
    };
}

/// Binds hover lifts to badges, cards and sections
pub struct HoverEffects;

impl HoverEffects {
    /// Returns the number of elements bound
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be registered.
    pub fn install<P: Page>(page: &Rc<P>, config: &HoverConfig) -> Result<usize> {
        let bound = Self::bind(page, &config.badges, HoverLift::BADGE)?
            + Self::bind(page, &config.cards, HoverLift::CARD)?
            + Self::bind(page, &config.sections, HoverLift::SECTION)?;
        info!(elements = bound, "hover effects initialised");
        Ok(bound)
    }

    /// Binds `lift` to every element matching `selector`
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be registered.
    pub fn bind<P: Page>(page: &Rc<P>, selector: &str, lift: HoverLift) -> Result<usize> {
        let elements = page.query_all(selector);
        for element in &elements {
            for (kind, transform) in [
                (EventKind::MouseEnter, lift.enter),
                (EventKind::MouseLeave, lift.leave),
            ] {
                let page_ref = Rc::clone(page);
                let node = element.clone();
                page.listen(
                    Target::Node(element.clone()),
                    kind,
                    Box::new(move |_| {
                        report(page_ref.set_style(&node, "transform", transform), "hover transform");
                        Response::Proceed
                    }),
                )?;
            }
        }
        Ok(elements.len())
    }
}
