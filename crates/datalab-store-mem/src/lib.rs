//! In-memory `RecordStore` backend.
//!
//! Used by the test suites and for local development without base
//! credentials. Mirrors the external base's observable behaviour: snapshot
//! queries, field-merge updates, opaque `rec…` identifiers. A one-shot
//! failure-injection hook makes partially-applied cascades reproducible.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
