//! Mobile navigation switch on viewport resize

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::ResponsiveConfig;
use crate::dom::{EventKind, Page, Response, Target, millis};
use crate::error::Result;

use super::report;

/// Layout chosen for the current viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Desktop,
    Mobile,
}

impl Layout {
    /// Widths at or below `breakpoint` are mobile
    #[must_use]
    pub fn for_width(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Re-lays out navigation and progress bars on resize
pub struct Responsive<P: Page> {
    page: Rc<P>,
    config: ResponsiveConfig,
    bars: String,
}

impl<P: Page> Responsive<P> {
    /// Listens for window resizes and applies the current layout once
    ///
    /// # Errors
    ///
    /// Returns an error if the resize listener cannot be registered.
    pub fn install(page: &Rc<P>, config: &ResponsiveConfig, bars: &str) -> Result<Rc<Self>> {
        let this = Rc::new(Self {
            page: Rc::clone(page),
            config: config.clone(),
            bars: bars.to_string(),
        });

        let component = Rc::clone(&this);
        page.listen(
            Target::Window,
            EventKind::Resize,
            Box::new(move |_| {
                component.adjust();
                Response::Proceed
            }),
        )?;

        let layout = this.adjust();
        info!(?layout, "responsive layout initialised");
        Ok(this)
    }

    /// Applies the layout for the current viewport width
    pub fn adjust(&self) -> Layout {
        let layout = Layout::for_width(self.page.viewport_width(), self.config.breakpoint);

        if let Some(nav) = self.page.query(&self.config.nav) {
            let result = match layout {
                Layout::Mobile => self.page.add_class(&nav, &self.config.mobile_class),
                Layout::Desktop => self.page.remove_class(&nav, &self.config.mobile_class),
            };
            report(result, "toggle mobile navigation");
        }

        let bars = self.page.query_all(&self.bars);
        for bar in &bars {
            self.settle(bar);
        }
        debug!(?layout, bars = bars.len(), "layout adjusted");
        layout
    }

    /// Re-applies a bar's width with transitions suspended, restoring the
    /// transition shortly after so the reflow is not animated
    fn settle(&self, bar: &P::Node) {
        let width = self.page.style(bar, "width");
        report(self.page.set_style(bar, "transition", "none"), "suspend transition");
        report(self.page.set_style(bar, "width", &width), "reapply width");

        let page = Rc::clone(&self.page);
        let node = bar.clone();
        let transition = self.config.bar_transition.clone();
        report(
            self.page.set_timeout(
                millis(self.config.settle_ms),
                Box::new(move || {
                    report(page.set_style(&node, "transition", &transition), "restore transition");
                }),
            ),
            "schedule transition restore",
        );
    }
}
