//! HTTP transport module
//!
//! # Overview
//!
//! The extractor talks to the network only through the [`Transport`]
//! trait. [`HttpClient`] is the reqwest implementation: it joins paths onto
//! the configured base URL, sends the JSON body and returns the parsed
//! response. It makes exactly one attempt per call.

mod client;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use transport::Transport;

#[cfg(test)]
mod tests;
