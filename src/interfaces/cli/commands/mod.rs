//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod catalog_management;
mod config_gen;
mod course_outline;
mod helpers;
mod participants;
mod user_management;

pub use catalog_management::*;
pub use config_gen::*;
pub use course_outline::*;
pub use participants::*;
pub use user_management::*;
