//! Core types and trait definitions for the Trialwatch oversight dashboard.
//!
//! This crate is deliberately free of HTTP and spreadsheet dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chart;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod record;
pub mod source;
pub mod view;

pub use error::{Error, Result};
