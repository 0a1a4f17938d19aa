//! Error types for the enhancement layer
//!
//! Registration and configuration failures are returned to the caller.
//! Failures inside event handlers are logged and swallowed instead, because
//! there is nobody to return them to.

/// Errors raised by a DOM facade implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No window object (not running in a browser context)
    #[error("window is not available")]
    WindowNotAvailable,

    /// No document object
    #[error("document is not available")]
    DocumentNotAvailable,

    /// Element creation failed
    #[error("failed to create <{tag}>: {reason}")]
    CreateFailed { tag: String, reason: String },

    /// Attribute write failed
    #[error("failed to write attribute '{name}': {reason}")]
    AttributeFailed { name: String, reason: String },

    /// Class list update failed
    #[error("failed to update class '{class}': {reason}")]
    ClassFailed { class: String, reason: String },

    /// Inline style write failed
    #[error("failed to set style '{property}': {reason}")]
    StyleFailed { property: String, reason: String },

    /// Node insertion failed
    #[error("failed to insert node: {0}")]
    InsertFailed(String),

    /// Event listener registration failed
    #[error("failed to listen for '{event}': {reason}")]
    ListenFailed { event: &'static str, reason: String },

    /// Visibility observer setup failed
    #[error("failed to observe visibility: {0}")]
    ObserveFailed(String),

    /// Timer or animation frame scheduling failed
    #[error("failed to schedule callback: {0}")]
    ScheduleFailed(String),
}

/// Errors raised while loading configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("invalid configuration document: {0}")]
    Parse(String),

    /// A visibility threshold outside [0, 1]
    #[error("threshold for {field} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: String },

    /// Key sequence with no keys
    #[error("key sequence must not be empty")]
    EmptySequence,

    /// Breakpoint that can never match
    #[error("breakpoint must be positive, got {0}")]
    InvalidBreakpoint(String),

    /// Particle burst with nothing to draw
    #[error("particle emoji set must not be empty")]
    EmptyEmojiSet,
}

/// Errors raised by the initialization routine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, DomError>;
