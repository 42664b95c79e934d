//! Core types and trait definitions for the Amity friendship graph.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod friendship;
pub mod service;
pub mod store;
pub mod user;

pub use error::{DomainError, Error, Result};
