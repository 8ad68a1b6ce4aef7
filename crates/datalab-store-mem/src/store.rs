//! The `MemoryStore` implementation.

use std::{
  collections::{HashMap, HashSet},
  sync::Mutex,
};

use datalab_core::{
  filter::{FilterExpr, SortDirection, SortSpec},
  record::{FieldMap, Record},
  store::RecordStore,
};
use uuid::Uuid;

use crate::{Error, Result};

/// An in-process record base.
///
/// Interior state sits behind a std `Mutex`; every operation takes and
/// releases the lock within a single call, never across an await point.
#[derive(Default)]
pub struct MemoryStore {
  tables:       Mutex<HashMap<String, Vec<Record>>>,
  /// Record ids whose *next* update call fails. Consumed on use.
  failing_next: Mutex<HashSet<String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Insert a record with a freshly minted identifier and return it.
  pub fn seed(&self, table: &str, fields: FieldMap) -> Record {
    let record = Record {
      id: format!("rec{}", Uuid::new_v4().simple()),
      fields,
    };
    self.seed_record(table, record.clone());
    record
  }

  /// Insert a fully-formed record (caller-chosen id).
  pub fn seed_record(&self, table: &str, record: Record) {
    let mut tables = self.tables.lock().unwrap();
    tables.entry(table.to_string()).or_default().push(record);
  }

  /// Make the next `update` of `id` fail with [`Error::InjectedFailure`].
  pub fn fail_next_update(&self, id: &str) {
    self.failing_next.lock().unwrap().insert(id.to_string());
  }

  /// Current copy of a record, for test assertions.
  pub fn get(&self, table: &str, id: &str) -> Option<Record> {
    let tables = self.tables.lock().unwrap();
    tables.get(table)?.iter().find(|r| r.id == id).cloned()
  }

  fn sort_records(records: &mut [Record], sort: &SortSpec) {
    // Dates sort correctly as text in ISO form; the base sorts missing
    // values first and so do we.
    records.sort_by(|a, b| {
      let ka = a.str_field(&sort.field).map(str::to_string);
      let kb = b.str_field(&sort.field).map(str::to_string);
      match sort.direction {
        SortDirection::Asc => ka.cmp(&kb),
        SortDirection::Desc => kb.cmp(&ka),
      }
    });
  }
}

impl RecordStore for MemoryStore {
  type Error = Error;

  async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Record>> {
    Ok(self.get(table, id))
  }

  async fn find(
    &self,
    table: &str,
    filter: &FilterExpr,
    sort: Option<&SortSpec>,
  ) -> Result<Vec<Record>> {
    let tables = self.tables.lock().unwrap();
    let mut matched: Vec<Record> = tables
      .get(table)
      .map(|records| {
        records.iter().filter(|r| filter.matches(r)).cloned().collect()
      })
      .unwrap_or_default();
    drop(tables);

    if let Some(sort) = sort {
      Self::sort_records(&mut matched, sort);
    }
    Ok(matched)
  }

  async fn update(
    &self,
    table: &str,
    id: &str,
    fields: FieldMap,
  ) -> Result<Record> {
    if self.failing_next.lock().unwrap().remove(id) {
      return Err(Error::InjectedFailure(id.to_string()));
    }

    let mut tables = self.tables.lock().unwrap();
    let record = tables
      .get_mut(table)
      .and_then(|records| records.iter_mut().find(|r| r.id == id))
      .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

    // Merge semantics: absent fields stay untouched.
    for (name, value) in fields {
      record.fields.insert(name, value);
    }
    Ok(record.clone())
  }
}

/// Parse a fixture date, panicking on bad input (tests only).
#[cfg(test)]
pub(crate) fn fixture_date(raw: &str) -> chrono::NaiveDate {
  datalab_core::dates::parse_date(raw).expect("fixture date")
}
