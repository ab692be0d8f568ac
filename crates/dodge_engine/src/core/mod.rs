//! # Core Engine Module
//!
//! Shared engine-level settings that several subsystems read.

pub mod config;

pub use config::EngineConfig;
pub use crate::config::{Config, ConfigError};
