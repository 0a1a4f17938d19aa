//! Stand-alone operations callable after initialization
//!
//! The browser binding publishes these on a global object. Each one is a
//! no-op when its target element does not exist.

use std::rc::Rc;

use tracing::debug;

use crate::components::Particles;
use crate::components::report;
use crate::dom::{Page, millis};

pub struct Utilities<P: Page> {
    page: Rc<P>,
    particles: Rc<Particles<P>>,
    burst: u32,
    progress_delay_ms: u32,
}

impl<P: Page> Utilities<P> {
    #[must_use]
    pub fn new(
        page: &Rc<P>,
        particles: &Rc<Particles<P>>,
        burst: u32,
        progress_delay_ms: u32,
    ) -> Rc<Self> {
        Rc::new(Self {
            page: Rc::clone(page),
            particles: Rc::clone(particles),
            burst,
            progress_delay_ms,
        })
    }

    /// Spawns a particle burst; returns how many particles were attached
    pub fn confetti(&self) -> usize {
        match self.particles.burst(self.burst) {
            Ok(spawned) => spawned,
            Err(err) => {
                tracing::warn!(%err, "confetti burst failed");
                0
            }
        }
    }

    /// Zeroes the element matching `selector`, then grows it to `percent`
    /// after a short delay. Returns whether the element exists.
    pub fn animate_progress(&self, selector: &str, percent: f64) -> bool {
        let Some(fill) = self.page.query(selector) else {
            debug!(selector, "progress element not found");
            return false;
        };

        report(self.page.set_style(&fill, "width", "0%"), "reset progress");
        let page = Rc::clone(&self.page);
        let width = format!("{percent}%");
        report(
            self.page.set_timeout(
                millis(self.progress_delay_ms),
                Box::new(move || report(page.set_style(&fill, "width", &width), "progress width")),
            ),
            "schedule progress",
        );
        true
    }

    /// Smooth-scrolls to the element with id `id`; returns whether it exists
    pub fn scroll_to(&self, id: &str) -> bool {
        match self.page.element_by_id(id) {
            Some(target) => {
                self.page.scroll_into_view(&target);
                true
            }
            None => {
                debug!(id, "scroll target not found");
                false
            }
        }
    }
}
