//! System-level modules
//!
//! Platform-facing concerns that don't belong to any one execution mode.

pub mod logging;
