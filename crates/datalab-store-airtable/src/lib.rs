//! Airtable backend for the DataLab record store.
//!
//! Speaks the Airtable REST API: record GET, list GET with
//! `filterByFormula`/`sort`/`offset` pagination, and field-merge PATCH.
//! The base holds the authoritative copy of every record; this crate only
//! ferries field maps back and forth.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{AirtableConfig, AirtableStore};
