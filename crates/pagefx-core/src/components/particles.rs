//! Falling emoji particle bursts

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::ParticleConfig;
use crate::dom::{Page, millis};
use crate::error::Result;

use super::report;

/// Spawns self-removing particles over the page
pub struct Particles<P: Page> {
    page: Rc<P>,
    config: ParticleConfig,
    rng: RefCell<StdRng>,
}

/// Randomised placement of one particle
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleStyle {
    pub emoji: String,
    /// Horizontal start position in viewport-width units, in [0, 100)
    pub left_vw: f64,
    pub fall_secs: f64,
}

impl<P: Page> Particles<P> {
    #[must_use]
    pub fn new(page: &Rc<P>, config: &ParticleConfig, rng: StdRng) -> Rc<Self> {
        Rc::new(Self {
            page: Rc::clone(page),
            config: config.clone(),
            rng: RefCell::new(rng),
        })
    }

    /// Spawns `count` particles; each detaches itself after the configured
    /// lifetime. Returns how many were attached.
    ///
    /// # Errors
    ///
    /// Returns an error if a particle cannot be created or attached.
    pub fn burst(&self, count: u32) -> Result<usize> {
        let mut spawned = 0_usize;
        for _ in 0..count {
            let style = self.roll();
            self.spawn(&style)?;
            spawned = spawned.saturating_add(1);
        }
        debug!(spawned, "particle burst");
        Ok(spawned)
    }

    /// Picks the emoji, position and fall duration of the next particle
    pub fn roll(&self) -> ParticleStyle {
        let mut rng = self.rng.borrow_mut();
        let emoji = match self.config.emojis.len() {
            0 => String::new(),
            len => self
                .config
                .emojis
                .get(rng.gen_range(0..len))
                .cloned()
                .unwrap_or_default(),
        };
        let left_vw = rng.r#gen::<f64>() * 100.0;
        let span = (self.config.max_fall_secs - self.config.min_fall_secs).max(0.0);
        let fall_secs = self.config.min_fall_secs + rng.r#gen::<f64>() * span;
        ParticleStyle {
            emoji,
            left_vw,
            fall_secs,
        }
    }

    fn spawn(&self, style: &ParticleStyle) -> Result<()> {
        let particle = self.page.create_element("div")?;
        self.page.set_html(&particle, &style.emoji);
        for (property, value) in [
            ("position", "fixed".to_string()),
            ("left", format!("{}vw", style.left_vw)),
            ("top", "-10px".to_string()),
            ("font-size", "20px".to_string()),
            ("z-index", "9999".to_string()),
            ("pointer-events", "none".to_string()),
            ("animation", format!("fall {}s linear forwards", style.fall_secs)),
        ] {
            self.page.set_style(&particle, property, &value)?;
        }
        self.page.append_to_body(&particle)?;

        let page = Rc::clone(&self.page);
        let node = particle;
        report(
            self.page.set_timeout(
                millis(self.config.lifetime_ms),
                Box::new(move || page.detach(&node)),
            ),
            "schedule particle removal",
        );
        Ok(())
    }
}
