//! Configuration module for listing fetches
//!
//! This module provides the `FetchConfig` struct and its builder for
//! configuring a fetch run with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::FetchConfigBuilder;
pub use types::{ConfigError, FetchConfig};
