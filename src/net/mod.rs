//! net
//!
//! Network reachability.
//!
//! - [`probe`] - The [`ConnectivityProbe`] trait and its HTTP implementation
//! - [`mock`] - A probe with a fixed, settable answer

pub mod mock;
pub mod probe;

pub use probe::{ConnectivityProbe, HttpProbe, ProbeError};
