//! Page-wide hue rotation sweep

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::dom::{Page, millis};

use super::report;

const FULL_TURN: u32 = 360;

/// Rotates the body hue in fixed steps until a full turn, then clears the filter
pub struct PartyMode<P: Page> {
    page: Rc<P>,
    step: u32,
    interval_ms: u32,
    /// Current angle while a sweep runs
    hue: Cell<Option<u32>>,
    /// Bumped on every activation so ticks of an older sweep stop
    generation: Cell<u64>,
}

impl<P: Page> PartyMode<P> {
    #[must_use]
    pub fn new(page: &Rc<P>, step: u32, interval_ms: u32) -> Rc<Self> {
        Rc::new(Self {
            page: Rc::clone(page),
            step: step.max(1),
            interval_ms,
            hue: Cell::new(None),
            generation: Cell::new(0),
        })
    }

    /// Starts a sweep from 0°; a sweep already running is superseded
    pub fn activate(self: &Rc<Self>) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.hue.set(Some(0));
        self.apply_filter("hue-rotate(0deg)");
        self.schedule(generation);
        info!("party mode activated");
    }

    /// Angle of the running sweep, `None` when idle
    #[must_use]
    pub fn hue(&self) -> Option<u32> {
        self.hue.get()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.hue.get().is_some()
    }

    fn schedule(self: &Rc<Self>, generation: u64) {
        let this = Rc::clone(self);
        report(
            self.page.set_timeout(
                millis(self.interval_ms),
                Box::new(move || this.tick(generation)),
            ),
            "schedule hue step",
        );
    }

    fn tick(self: &Rc<Self>, generation: u64) {
        if generation != self.generation.get() {
            return;
        }
        let Some(hue) = self.hue.get() else {
            return;
        };

        let hue = hue.saturating_add(self.step);
        if hue >= FULL_TURN {
            self.apply_filter("none");
            self.hue.set(None);
            debug!("hue sweep complete");
            return;
        }

        self.hue.set(Some(hue));
        self.apply_filter(&format!("hue-rotate({hue}deg)"));
        self.schedule(generation);
    }

    fn apply_filter(&self, filter: &str) {
        if let Some(body) = self.page.body() {
            report(self.page.set_style(&body, "filter", filter), "hue filter");
        }
    }
}
