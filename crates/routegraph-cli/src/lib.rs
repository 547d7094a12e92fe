//! routegraph CLI library.
//!
//! Command handlers, output rendering and logging setup for the `routegraph`
//! binary. Kept as a library so handlers can be tested without spawning the
//! process.

pub mod commands;
pub mod logging;
pub mod output;
