//! # Context Configuration
//!
//! Settings fixed at context creation. Everything here can be loaded from TOML
//! or RON through the [`Config`] trait, so an embedder can tune the pipeline
//! without recompiling.
//!
//! ```toml
//! texture_size = 256
//! specular_buffers = 8
//! max_display_lists = 1024
//! op_buffer_slots = 512
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::core::limits::{MAX_DISPLAY_LISTS, MAX_SPECULAR_BUFFERS, OP_BUFFER_MAX_SIZE};

/// # Context Configuration
///
/// Creation-time parameters of a rendering context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Edge length that level-0 texture images are resampled to (power of two)
    pub texture_size: usize,
    /// Capacity of the specular lookup table pool
    pub specular_buffers: usize,
    /// Size of the display-list name space
    pub max_display_lists: usize,
    /// Parameter slots per display-list buffer
    pub op_buffer_slots: usize,
}

impl ContextConfig {
    /// Create a configuration with the given maximum texture dimension
    pub fn new(texture_size: usize) -> Self {
        Self {
            texture_size,
            ..Default::default()
        }
    }

    /// Set the specular table pool capacity
    pub fn with_specular_buffers(mut self, count: usize) -> Self {
        self.specular_buffers = count;
        self
    }

    /// Set the display-list name space size
    pub fn with_max_display_lists(mut self, count: usize) -> Self {
        self.max_display_lists = count;
        self
    }

    /// Set the number of parameter slots per display-list buffer
    pub fn with_op_buffer_slots(mut self, slots: usize) -> Self {
        self.op_buffer_slots = slots;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texture_size == 0 || !self.texture_size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "texture_size must be a non-zero power of two, got {}",
                self.texture_size
            )));
        }
        if self.specular_buffers == 0 {
            return Err(ConfigError::Invalid(
                "specular_buffers must be at least 1".to_string(),
            ));
        }
        if self.max_display_lists < 2 {
            return Err(ConfigError::Invalid(
                "max_display_lists must leave room for at least one list name".to_string(),
            ));
        }
        // A record carrying a 4x4 matrix needs 17 slots.
        if self.op_buffer_slots < 32 {
            return Err(ConfigError::Invalid(format!(
                "op_buffer_slots must be at least 32, got {}",
                self.op_buffer_slots
            )));
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            texture_size: 256,
            specular_buffers: MAX_SPECULAR_BUFFERS,
            max_display_lists: MAX_DISPLAY_LISTS,
            op_buffer_slots: OP_BUFFER_MAX_SIZE,
        }
    }
}

impl Config for ContextConfig {}
