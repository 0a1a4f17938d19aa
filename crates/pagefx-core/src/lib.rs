//! Client-side enhancement layer for static document pages
//!
//! Adds smooth in-page navigation, active-link tracking, reveal-on-scroll,
//! progress fill animation, hover lifts, animated collapsible sections, a
//! responsive navigation switch and a couple of diversions (particle bursts,
//! a hidden key sequence) to an already rendered document.
//!
//! ## Architecture
//! - Components talk to the page only through the [`dom`] facade traits
//! - Each component owns its state explicitly (per-element enums, key buffer)
//! - Single-threaded: handlers and timers run on the page's event loop
//! - The browser binding lives in the `pagefx-web` crate
//!
//! ## Module Structure
//! - `dom`: facade traits the page must implement
//! - `config`: serde configuration with the stock defaults
//! - `components`: one module per visual behavior
//! - `enhancer`: the initialization routine
//! - `utilities`: operations exposed to page scripts
//! - `error`: error types

#![forbid(unsafe_code)]

pub mod components;
pub mod config;
pub mod dom;
pub mod enhancer;
pub mod error;
pub mod utilities;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use dom::{Dom, Events, Page, Timers, Visibility};
pub use enhancer::{Enhancements, STYLESHEET, install};
pub use error::{ConfigError, DomError, InitError};
pub use utilities::Utilities;
