//! ui
//!
//! Terminal presentation.
//!
//! # Modules
//!
//! - [`output`] - Output primitives honoring verbosity
//! - [`render`] - Event-to-text rendering and the terminal event sink
//!
//! # Design
//!
//! The engine reports structured events; everything that decides how those
//! look on a terminal lives here.

pub mod output;
pub mod render;

pub use render::TerminalSink;
