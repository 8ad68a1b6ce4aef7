//! Core types and trait definitions for the DataLab scheduling core.
//!
//! This crate is deliberately free of HTTP and transport dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The record store that holds events is an external service; this crate
//! only defines the [`store::RecordStore`] contract a backend must satisfy
//! and the [`reschedule::Rescheduler`] procedure that drives it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dates;
pub mod error;
pub mod event;
pub mod filter;
pub mod record;
pub mod reschedule;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
