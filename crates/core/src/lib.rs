//! # Samplify Core
//!
//! Session lifecycle and request dispatch for the Samplify API client.
//!
//! This crate contains:
//! - The [`Transport`] port implemented by infrastructure adapters
//! - The request [`Dispatcher`] and response classification
//! - Token grants ([`TokenService`]) and the [`SessionGuard`] state machine
//! - The [`SamplifyClient`] facade
//!
//! ## Architecture Principles
//! - Only depends on `samplify-domain`
//! - No HTTP library code: all I/O goes through [`Transport`]
//! - Testable against scripted in-memory transports

pub mod cancel;
pub mod client;
pub mod http;
pub mod session;

pub use cancel::with_cancellation;
pub use client::{SamplifyClient, SamplifyClientBuilder};
pub use http::{Dispatcher, Transport};
pub use session::{SessionGuard, TokenService};
pub use tokio_util::sync::CancellationToken;
