//! # Gamenight Core
//!
//! The domain layer of the Gamenight backend.
//! This crate holds the admission ports and shared error types with zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::ClientKey;
pub use error::ConfigError;
