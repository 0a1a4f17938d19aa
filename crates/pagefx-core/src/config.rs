//! Enhancement configuration
//!
//! Every selector, class marker, threshold and delay the components use.
//! Defaults describe the stock document template, so an empty JSON object
//! (or no configuration at all) yields the standard behavior.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
    pub progress: ProgressConfig,
    pub hover: HoverConfig,
    pub collapsible: CollapsibleConfig,
    pub responsive: ResponsiveConfig,
    pub diversion: DiversionConfig,
    pub particles: ParticleConfig,
    /// Name of the global object exposing the utility surface
    pub global_name: String,
    /// Minimum level written to the developer console
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            reveal: RevealConfig::default(),
            progress: ProgressConfig::default(),
            hover: HoverConfig::default(),
            collapsible: CollapsibleConfig::default(),
            responsive: ResponsiveConfig::default(),
            diversion: DiversionConfig::default(),
            particles: ParticleConfig::default(),
            global_name: "NexSkool".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Anchor scrolling and active-link highlighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// In-page links intercepted for smooth scrolling
    pub anchors: String,
    /// Links that carry the active marker
    pub links: String,
    /// Sections watched for visibility; must carry an id
    pub sections: String,
    pub active_class: String,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            anchors: r##"a[href^="#"]"##.to_string(),
            links: ".sommaire a".to_string(),
            sections: ".section-block[id]".to_string(),
            active_class: "active".to_string(),
            threshold: 0.3,
            root_margin: "-100px 0px -50% 0px".to_string(),
        }
    }
}

/// Fade-in on first visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub finished_class: String,
    pub hidden_transform: String,
    pub transition: String,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let selectors = [
            ".section-block",
            ".stat-card",
            ".timeline-item",
            ".anecdote-bloc",
            ".citation",
            ".citation-center",
            ".alert",
            ".note",
            ".success-box",
            ".warning-box",
            ".info-box",
            ".error-box",
            ".NexSchool",
        ];
        Self {
            selectors: selectors.iter().map(ToString::to_string).collect(),
            finished_class: "animated".to_string(),
            hidden_transform: "translateY(30px)".to_string(),
            transition: "opacity 0.6s ease, transform 0.6s ease".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// Progress fill animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressConfig {
    pub selector: String,
    pub threshold: f64,
    /// Pause between zeroing and growing a bar that came into view
    pub delay_ms: u32,
    /// Pause used by the exported `animateProgress`
    pub manual_delay_ms: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            selector: ".progress-fill".to_string(),
            threshold: 0.5,
            delay_ms: 200,
            manual_delay_ms: 100,
        }
    }
}

/// Hover lift effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverConfig {
    pub badges: String,
    pub cards: String,
    pub sections: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            badges: ".emoji-badge".to_string(),
            cards: ".stat-card, .timeline-item".to_string(),
            sections: ".section-block".to_string(),
        }
    }
}

/// Animated open/close of sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollapsibleConfig {
    pub sections: String,
    pub toggle: String,
    pub content: String,
    pub duration_ms: u32,
    /// Section id opened automatically after startup
    pub auto_open: Option<String>,
    pub auto_open_delay_ms: u32,
}

impl Default for CollapsibleConfig {
    fn default() -> Self {
        Self {
            sections: ".section-block".to_string(),
            toggle: "summary".to_string(),
            content: ".contenu-section".to_string(),
            duration_ms: 300,
            auto_open: Some("presentation".to_string()),
            auto_open_delay_ms: 1000,
        }
    }
}

/// Mobile navigation switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsiveConfig {
    pub nav: String,
    /// Widths at or below this are mobile
    pub breakpoint: f64,
    pub mobile_class: String,
    pub settle_ms: u32,
    pub bar_transition: String,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            nav: ".sommaire".to_string(),
            breakpoint: 768.0,
            mobile_class: "mobile-nav".to_string(),
            settle_ms: 10,
            bar_transition: "width 1s ease".to_string(),
        }
    }
}

/// Title double-click and hidden key sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiversionConfig {
    pub title: String,
    pub title_animation: String,
    pub title_restart_ms: u32,
    pub title_burst: u32,
    /// `KeyboardEvent.code` values, oldest first
    pub sequence: Vec<String>,
    pub sequence_burst: u32,
    pub hue_step: u32,
    pub hue_interval_ms: u32,
}

impl Default for DiversionConfig {
    fn default() -> Self {
        let sequence = [
            "ArrowUp",
            "ArrowUp",
            "ArrowDown",
            "ArrowDown",
            "ArrowLeft",
            "ArrowRight",
            "ArrowLeft",
            "ArrowRight",
            "KeyB",
            "KeyA",
        ];
        Self {
            title: "h1".to_string(),
            title_animation: "gradientShift 1s ease-in-out, bounce 0.6s ease-in-out".to_string(),
            title_restart_ms: 10,
            title_burst: 50,
            sequence: sequence.iter().map(ToString::to_string).collect(),
            sequence_burst: 30,
            hue_step: 10,
            hue_interval_ms: 100,
        }
    }
}

/// Falling emoji particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    /// Burst size of the exported `confetti`
    pub count: u32,
    pub lifetime_ms: u32,
    pub emojis: Vec<String>,
    pub min_fall_secs: f64,
    pub max_fall_secs: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 30,
            lifetime_ms: 5000,
            emojis: ["🎉", "✨", "🎊", "⭐", "🌟"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_fall_secs: 2.0,
            max_fall_secs: 5.0,
        }
    }
}

impl Config {
    /// Parses a JSON document; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape,
    /// or if the resulting configuration fails [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make a component misbehave
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("navigation", self.navigation.threshold)?;
        check_threshold("reveal", self.reveal.threshold)?;
        check_threshold("progress", self.progress.threshold)?;

        if self.diversion.sequence.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        if !(self.responsive.breakpoint.is_finite() && self.responsive.breakpoint > 0.0) {
            return Err(ConfigError::InvalidBreakpoint(
                self.responsive.breakpoint.to_string(),
            ));
        }
        if self.particles.emojis.is_empty() {
            return Err(ConfigError::EmptyEmojiSet);
        }
        Ok(())
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange {
            field,
            value: value.to_string(),
        })
    }
}
