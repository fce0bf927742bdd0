//! # vidloop Common Library
//!
//! Shared code for the vidloop crates including:
//! - Error types
//! - TOML configuration model and config file resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
