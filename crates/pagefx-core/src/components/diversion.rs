//! Title double-click and hidden key sequence

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, trace};

use crate::config::DiversionConfig;
use crate::dom::{EventKind, Page, Response, Target, millis};
use crate::error::Result;

use super::{KeySequence, Particles, PartyMode, report};

/// Owns the key buffer and the hue sweep
pub struct Diversion<P: Page> {
    page: Rc<P>,
    config: DiversionConfig,
    keys: RefCell<KeySequence>,
    particles: Rc<Particles<P>>,
    party: Rc<PartyMode<P>>,
}

impl<P: Page> Diversion<P> {
    /// Binds the title double-click and the global key listener
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be registered.
    pub fn install(
        page: &Rc<P>,
        config: &DiversionConfig,
        particles: &Rc<Particles<P>>,
    ) -> Result<Rc<Self>> {
        let this = Rc::new(Self {
            page: Rc::clone(page),
            config: config.clone(),
            keys: RefCell::new(KeySequence::new(config.sequence.clone())),
            particles: Rc::clone(particles),
            party: PartyMode::new(page, config.hue_step, config.hue_interval_ms),
        });

        if let Some(title) = page.query(&config.title) {
            let component = Rc::clone(&this);
            let node = title.clone();
            page.listen(
                Target::Node(title),
                EventKind::DoubleClick,
                Box::new(move |_| {
                    component.celebrate_title(&node);
                    Response::Proceed
                }),
            )?;
        }

        let component = Rc::clone(&this);
        page.listen(
            Target::Document,
            EventKind::KeyDown,
            Box::new(move |event| {
                if let Some(code) = event.code.as_deref() {
                    component.key(code);
                }
                Response::Proceed
            }),
        )?;

        info!("diversions armed (double-click the title)");
        Ok(this)
    }

    /// Feeds one key code; returns whether it completed the sequence
    pub fn key(&self, code: &str) -> bool {
        trace!(code, "key recorded");
        let matched = self.keys.borrow_mut().push(code);
        if matched {
            self.party.activate();
            report(
                self.particles.burst(self.config.sequence_burst).map(|_| ()),
                "sequence burst",
            );
        }
        matched
    }

    /// Restarts the title animation and spawns a burst
    pub fn celebrate_title(&self, title: &P::Node) {
        report(self.page.set_style(title, "animation", "none"), "reset title animation");

        let page = Rc::clone(&self.page);
        let node = title.clone();
        let animation = self.config.title_animation.clone();
        report(
            self.page.set_timeout(
                millis(self.config.title_restart_ms),
                Box::new(move || {
                    report(page.set_style(&node, "animation", &animation), "restart title animation");
                }),
            ),
            "schedule title animation",
        );

        report(
            self.particles.burst(self.config.title_burst).map(|_| ()),
            "title burst",
        );
    }

    /// Buffered key codes, oldest first
    #[must_use]
    pub fn recent_keys(&self) -> Vec<String> {
        self.keys
            .borrow()
            .recent()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn party(&self) -> &Rc<PartyMode<P>> {
        &self.party
    }
}
