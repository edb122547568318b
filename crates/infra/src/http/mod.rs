//! HTTP transport backed by reqwest.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
