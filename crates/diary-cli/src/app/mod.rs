//! Application-level utilities for the secret-diary CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Path resolution for the config file and the notebook directory
//! - Master password handling with retry logic

mod context;
mod password;
mod resolver;

pub use context::AppContext;
pub use resolver::{resolve_config_path, resolve_store_dir};
