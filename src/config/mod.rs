//! Configuration management
//!
//! Static configuration is loaded once from TOML + environment variables and
//! stored behind an `ArcSwap` so readers never block.

mod r#impl;
mod structs;

pub use r#impl::{get_config, init_config, init_config_from, set_config, try_get_config};
pub use structs::*;
