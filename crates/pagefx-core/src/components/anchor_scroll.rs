//! Smooth scrolling for in-page fragment links

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::NavigationConfig;
use crate::dom::{EventKind, Page, Response, Target};
use crate::error::Result;

use super::mark_active;

/// Intercepts clicks on fragment links
pub struct AnchorScroll<P: Page> {
    page: Rc<P>,
    links: String,
    active_class: String,
    anchors: usize,
}

impl<P: Page> AnchorScroll<P> {
    /// Attaches a click handler to every element matching the anchor selector
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be registered.
    pub fn install(page: &Rc<P>, config: &NavigationConfig) -> Result<Rc<Self>> {
        let anchors = page.query_all(&config.anchors);
        let this = Rc::new(Self {
            page: Rc::clone(page),
            links: config.links.clone(),
            active_class: config.active_class.clone(),
            anchors: anchors.len(),
        });

        for anchor in anchors {
            let component = Rc::clone(&this);
            let link = anchor.clone();
            page.listen(
                Target::Node(anchor),
                EventKind::Click,
                Box::new(move |_| {
                    component.follow(&link);
                    Response::PreventDefault
                }),
            )?;
        }

        info!(anchors = this.anchors, "smooth scroll initialised");
        Ok(this)
    }

    /// Scrolls to the fragment target of `link` and marks `link` active.
    ///
    /// Returns `false`, leaving active markers untouched, when the link has
    /// no fragment or its target does not exist.
    pub fn follow(&self, link: &P::Node) -> bool {
        let href = self.page.attribute(link, "href").unwrap_or_default();
        let Some(target) = fragment_id(&href).and_then(|id| self.page.element_by_id(id)) else {
            debug!(href = %href, "fragment target not found");
            return false;
        };

        self.page.scroll_into_view(&target);
        mark_active(&*self.page, &self.links, &self.active_class, Some(link));
        true
    }

    #[must_use]
    pub const fn anchors(&self) -> usize {
        self.anchors
    }
}

/// Element id referenced by a `#fragment` reference
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
