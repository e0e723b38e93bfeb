//! # Core Module
//!
//! Shared abstractions used by every pipeline stage.
//!
//! ## Organization
//!
//! - **Config**: Context configuration and its file loader
//! - **Limits**: Fixed capacities of the pipeline's tables and stacks

pub mod config;
pub mod limits;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{Config, ConfigError, ContextConfig};
