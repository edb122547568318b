//! # Samplify Domain
//!
//! Plain data for the Samplify API client.
//!
//! This crate contains:
//! - Session, token grant and credential types
//! - HTTP request/response values exchanged with a transport
//! - The [`Operation`] catalogue of API endpoints and its validation
//! - Error types and the `Result` alias
//! - Environment presets and client options
//!
//! ## Architecture
//! - No dependencies on other Samplify crates
//! - No I/O: everything here is data and pure functions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

pub use config::*;
pub use errors::*;
pub use types::*;
