//! # StyleTwin Common Library
//!
//! Shared code for the StyleTwin services:
//! - Error type used across crates
//! - TOML configuration model and config file discovery
//! - Secret resolution (environment → TOML)

pub mod config;
pub mod error;

pub use error::{Error, Result};
