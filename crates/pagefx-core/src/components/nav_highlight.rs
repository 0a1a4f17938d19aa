//! Active navigation link follows the section in view

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::NavigationConfig;
use crate::dom::{Page, Watch, WatchOptions};
use crate::error::Result;

use super::anchor_scroll::fragment_id;
use super::mark_active;

/// Marks the navigation link of whichever section last came into view
pub struct NavHighlighter<P: Page> {
    page: Rc<P>,
    links: String,
    active_class: String,
    sections: usize,
}

impl<P: Page> NavHighlighter<P> {
    /// Watches every identified section. Nothing is watched when the page
    /// has no sections or no fragment links to highlight.
    ///
    /// # Errors
    ///
    /// Returns an error if the visibility watch cannot be created.
    pub fn install(page: &Rc<P>, config: &NavigationConfig) -> Result<Rc<Self>> {
        let sections = page.query_all(&config.sections);
        let has_links = page
            .query_all(&config.links)
            .iter()
            .any(|link| page.attribute(link, "href").as_deref().is_some_and(|h| h.starts_with('#')));

        let this = Rc::new(Self {
            page: Rc::clone(page),
            links: config.links.clone(),
            active_class: config.active_class.clone(),
            sections: if has_links { sections.len() } else { 0 },
        });

        if sections.is_empty() || !has_links {
            debug!("no sections or navigation links, highlighter idle");
            return Ok(this);
        }

        let options = WatchOptions {
            threshold: config.threshold,
            root_margin: config.root_margin.clone(),
        };
        let component = Rc::clone(&this);
        page.watch(
            &sections,
            &options,
            Box::new(move |section| {
                component.highlight(section);
                Watch::Keep
            }),
        )?;

        info!(sections = this.sections, "active navigation initialised");
        Ok(this)
    }

    /// Clears every active marker and sets it on the link pointing at
    /// `section`. Returns that link, if one exists.
    pub fn highlight(&self, section: &P::Node) -> Option<P::Node> {
        let id = self.page.attribute(section, "id")?;
        let link = self.page.query_all(&self.links).into_iter().find(|link| {
            self.page
                .attribute(link, "href")
                .as_deref()
                .and_then(fragment_id)
                == Some(id.as_str())
        });
        mark_active(&*self.page, &self.links, &self.active_class, link.as_ref());
        link
    }

    /// Number of watched sections
    #[must_use]
    pub const fn sections(&self) -> usize {
        self.sections
    }
}
