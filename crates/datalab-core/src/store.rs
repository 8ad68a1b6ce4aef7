//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (`datalab-store-airtable`
//! for the real base, `datalab-store-mem` for tests). Higher layers depend
//! on this abstraction, not on any concrete backend.
//!
//! The contract mirrors what the external service actually offers: point
//! reads, one-shot filtered queries with no isolation against concurrent
//! writers, and single-record field-merge updates. There is no multi-record
//! transaction — callers that need one do not get one.

use std::future::Future;

use crate::{
  filter::{FilterExpr, SortSpec},
  record::{FieldMap, Record},
};

/// Abstraction over the external tabular base.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one record by identifier. Returns `None` if it does not exist.
  fn find_by_id<'a>(
    &'a self,
    table: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;

  /// Run a one-shot filtered query. The result is a snapshot at the moment
  /// the backend evaluated it; it is finite and not restartable.
  fn find<'a>(
    &'a self,
    table: &'a str,
    filter: &'a FilterExpr,
    sort: Option<&'a SortSpec>,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Merge `fields` into one record by identifier and return the updated
  /// record. Fields absent from the map are left untouched. Updating a
  /// missing record is a backend-defined error.
  fn update<'a>(
    &'a self,
    table: &'a str,
    id: &'a str,
    fields: FieldMap,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + 'a;
}
