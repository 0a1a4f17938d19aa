//! One-shot initialization routine
//!
//! Wires every component against the page in a fixed order and returns the
//! handles. Watchers persist for the page's lifetime; there is no teardown.

use std::rc::Rc;

use rand::rngs::StdRng;
use tracing::info;

use crate::components::{
    AnchorScroll, Collapsible, Diversion, HoverEffects, NavHighlighter, Particles, ProgressBars,
    Responsive, Reveal,
};
use crate::config::Config;
use crate::dom::Page;
use crate::error::InitError;
use crate::utilities::Utilities;

/// Injected at startup: particle fall animation and mobile navigation layout
pub const STYLESHEET: &str = r"
@keyframes fall {
    from {
        transform: translateY(-100vh) rotate(0deg);
        opacity: 1;
    }
    to {
        transform: translateY(100vh) rotate(360deg);
        opacity: 0;
    }
}

.mobile-nav {
    flex-direction: column;
    gap: 0.5rem;
}

.mobile-nav a {
    text-align: center;
    width: 100%;
}
";

/// Handles to every installed component
pub struct Enhancements<P: Page> {
    pub anchors: Rc<AnchorScroll<P>>,
    pub navigation: Rc<NavHighlighter<P>>,
    pub reveal: Rc<Reveal<P>>,
    pub progress: Rc<ProgressBars<P>>,
    pub hover_bound: usize,
    pub collapsible: Rc<Collapsible<P>>,
    pub responsive: Rc<Responsive<P>>,
    pub diversion: Rc<Diversion<P>>,
    pub utilities: Rc<Utilities<P>>,
}

/// Installs every behavior on `page`
///
/// # Errors
///
/// Returns an error if `config` is invalid or any component fails to
/// register with the page.
pub fn install<P: Page>(
    page: &Rc<P>,
    config: &Config,
    rng: StdRng,
) -> Result<Enhancements<P>, InitError> {
    config.validate()?;
    info!("enhancement layer starting");

    page.inject_stylesheet(STYLESHEET)?;

    let particles = Particles::new(page, &config.particles, rng);

    let anchors = AnchorScroll::install(page, &config.navigation)?;
    let navigation = NavHighlighter::install(page, &config.navigation)?;
    let reveal = Reveal::install(page, &config.reveal)?;
    let progress = ProgressBars::install(page, &config.progress)?;
    let hover_bound = HoverEffects::install(page, &config.hover)?;
    let collapsible = Collapsible::install(page, &config.collapsible)?;
    let responsive = Responsive::install(page, &config.responsive, &config.progress.selector)?;
    let diversion = Diversion::install(page, &config.diversion, &particles)?;

    if let Some(id) = &config.collapsible.auto_open {
        collapsible.schedule_auto_open(id, config.collapsible.auto_open_delay_ms)?;
    }

    let utilities = Utilities::new(
        page,
        &particles,
        config.particles.count,
        config.progress.manual_delay_ms,
    );

    info!("enhancement layer loaded");
    Ok(Enhancements {
        anchors,
        navigation,
        reveal,
        progress,
        hover_bound,
        collapsible,
        responsive,
        diversion,
        utilities,
    })
}
