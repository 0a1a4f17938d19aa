//! One watcher per visual behavior
//!
//! Components share nothing but read access to the page. Each `install`
//! registers its listeners or visibility watches for the page's lifetime and
//! returns a handle exposing the component's state for inspection.

pub mod anchor_scroll;
pub mod collapsible;
pub mod diversion;
pub mod hover;
pub mod key_sequence;
pub mod nav_highlight;
pub mod particles;
pub mod party;
pub mod progress;
pub mod responsive;
pub mod reveal;

pub use anchor_scroll::AnchorScroll;
pub use collapsible::{Collapsible, SectionState};
pub use diversion::Diversion;
pub use hover::{HoverEffects, HoverLift};
pub use key_sequence::KeySequence;
pub use nav_highlight::NavHighlighter;
pub use particles::Particles;
pub use party::PartyMode;
pub use progress::{BarState, ProgressBars};
pub use responsive::{Layout, Responsive};
pub use reveal::{Reveal, RevealState};

use crate::dom::Dom;
use crate::error::Result;

/// Logs a failed write from inside a handler; handlers have no caller to
/// return errors to.
pub(crate) fn report(result: Result<()>, operation: &'static str) {
    if let Err(err) = result {
        tracing::warn!(%err, operation, "page update failed");
    }
}

/// Clears `class` from every element matching `links`, then sets it on `chosen`
pub(crate) fn mark_active<D: Dom + ?Sized>(
    dom: &D,
    links: &str,
    class: &str,
    chosen: Option<&D::Node>,
) {
    for link in dom.query_all(links) {
        report(dom.remove_class(&link, class), "clear active link");
    }
    if let Some(link) = chosen {
        report(dom.add_class(link, class), "mark active link");
    }
}
