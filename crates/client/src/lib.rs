//! Async HTTP client for the corpus API.
//!
//! Chunk uploads and record finalization go out as multipart forms; the
//! auth endpoints speak JSON. Every request carries the bearer credential
//! the client was built with.

pub mod auth;
pub mod client;

/// Loopback HTTP server for exercising the client in tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{Client, Credentials, Error};
