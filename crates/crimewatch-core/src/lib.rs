//! Core types and trait definitions for the crimewatch incident store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, ingestion and API crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod district;
pub mod error;
pub mod incident;
pub mod store;

pub use error::{Error, Result};
