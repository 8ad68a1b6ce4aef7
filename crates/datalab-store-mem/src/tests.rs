//! Integration tests driving the reschedule procedure against `MemoryStore`.

use std::sync::Arc;

use datalab_core::{
  Error as CoreError,
  event::EventStatus,
  record::Record,
  reschedule::{RescheduleRequest, Rescheduler},
  schema::EventSchema,
};
use serde_json::json;

use crate::{MemoryStore, store::fixture_date};

fn schema() -> EventSchema { EventSchema::default() }

/// Seed one event record in package `package` at `date`.
fn seed_event(store: &MemoryStore, id: &str, package: &str, date: &str) {
  let s = schema();
  let record = Record::new(id)
    .with_field(&s.date_field, date)
    .with_field(&s.package_field, json!([package]));
  store.seed_record(&s.table, record);
}

fn rescheduler(store: Arc<MemoryStore>) -> Rescheduler<MemoryStore> {
  Rescheduler::new(store, schema())
}

fn date_of(store: &MemoryStore, id: &str) -> String {
  let s = schema();
  store
    .get(&s.table, id)
    .expect("record exists")
    .str_field(&s.date_field)
    .expect("record has a date")
    .to_string()
}

fn cascade_request(event_id: &str, new_date: &str, package: &str) -> RescheduleRequest {
  RescheduleRequest {
    event_id:    event_id.to_string(),
    new_date:    Some(fixture_date(new_date)),
    new_status:  None,
    cascade:     true,
    package_ref: Some(package.to_string()),
  }
}

// ─── Cascade behaviour ───────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_forward_shift() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recE2", "recP1", "2025-03-12");
  seed_event(&store, "recE3", "recP1", "2025-03-15");

  let outcome = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-13", "recP1"))
    .await
    .unwrap();

  assert_eq!(outcome.event_id, "recE1");
  assert_eq!(outcome.cascaded, 2);
  assert!(outcome.report.primary_updated);
  assert_eq!(outcome.report.siblings_attempted, 2);
  assert!(outcome.report.failures.is_empty());

  assert_eq!(date_of(&store, "recE1"), "2025-03-13");
  assert_eq!(date_of(&store, "recE2"), "2025-03-15");
  assert_eq!(date_of(&store, "recE3"), "2025-03-18");
}

#[tokio::test]
async fn backward_shift_moves_siblings_earlier() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recE2", "recP1", "2025-03-12");

  let outcome = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-08", "recP1"))
    .await
    .unwrap();

  assert_eq!(outcome.cascaded, 1);
  assert_eq!(date_of(&store, "recE1"), "2025-03-08");
  assert_eq!(date_of(&store, "recE2"), "2025-03-10");
}

#[tokio::test]
async fn only_strictly_future_siblings_of_the_package_shift() {
  let store = Arc::new(MemoryStore::new());
  // D-2, D-1, D, D+1, D+3 — only D+1 and D+3 are candidates.
  seed_event(&store, "recPast2", "recP1", "2025-03-08");
  seed_event(&store, "recPast1", "recP1", "2025-03-09");
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recNext1", "recP1", "2025-03-11");
  seed_event(&store, "recNext3", "recP1", "2025-03-13");
  // Same date in another package: never touched.
  seed_event(&store, "recOtherPkg", "recP2", "2025-03-11");

  let outcome = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-12", "recP1"))
    .await
    .unwrap();

  assert_eq!(outcome.cascaded, 2);
  assert_eq!(date_of(&store, "recPast2"), "2025-03-08");
  assert_eq!(date_of(&store, "recPast1"), "2025-03-09");
  assert_eq!(date_of(&store, "recNext1"), "2025-03-13");
  assert_eq!(date_of(&store, "recNext3"), "2025-03-15");
  assert_eq!(date_of(&store, "recOtherPkg"), "2025-03-11");
}

#[tokio::test]
async fn zero_delta_leaves_every_sibling_untouched() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recE2", "recP1", "2025-03-12");
  seed_event(&store, "recE3", "recP1", "2025-03-15");

  let outcome = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-10", "recP1"))
    .await
    .unwrap();

  assert_eq!(outcome.cascaded, 0);
  assert_eq!(outcome.report.siblings_attempted, 0);
  assert_eq!(date_of(&store, "recE2"), "2025-03-12");
  assert_eq!(date_of(&store, "recE3"), "2025-03-15");
}

#[tokio::test]
async fn no_cascade_touches_nothing_but_the_primary() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recE2", "recP1", "2025-03-12");
  seed_event(&store, "recE3", "recP1", "2025-03-15");

  let outcome = rescheduler(store.clone())
    .reschedule(RescheduleRequest {
      event_id:    "recE1".to_string(),
      new_date:    Some(fixture_date("2025-03-13")),
      new_status:  None,
      cascade:     false,
      package_ref: None,
    })
    .await
    .unwrap();

  assert_eq!(outcome.cascaded, 0);
  assert_eq!(date_of(&store, "recE1"), "2025-03-13");
  assert_eq!(date_of(&store, "recE2"), "2025-03-12");
  assert_eq!(date_of(&store, "recE3"), "2025-03-15");
}

// ─── Partial failure ─────────────────────────────────────────────────────────

#[tokio::test]
async fn one_failed_sibling_does_not_stop_the_rest() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recA", "recP1", "2025-03-11");
  seed_event(&store, "recB", "recP1", "2025-03-12");
  seed_event(&store, "recC", "recP1", "2025-03-13");
  store.fail_next_update("recB");

  let outcome = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-12", "recP1"))
    .await
    .unwrap();

  assert_eq!(outcome.cascaded, 2);
  assert_eq!(outcome.report.siblings_attempted, 3);
  assert_eq!(outcome.report.failures, vec!["recB".to_string()]);

  assert_eq!(date_of(&store, "recA"), "2025-03-13");
  assert_eq!(date_of(&store, "recB"), "2025-03-12");
  assert_eq!(date_of(&store, "recC"), "2025-03-15");
}

#[tokio::test]
async fn primary_update_failure_is_fatal() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");
  seed_event(&store, "recE2", "recP1", "2025-03-12");
  store.fail_next_update("recE1");

  let err = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-13", "recP1"))
    .await
    .unwrap_err();

  assert!(matches!(err, CoreError::Write(_)));
  assert_eq!(date_of(&store, "recE2"), "2025-03-12");
}

// ─── Field updates ───────────────────────────────────────────────────────────

#[tokio::test]
async fn status_is_persisted_upper_case_and_merge_keeps_other_fields() {
  let store = Arc::new(MemoryStore::new());
  let s = schema();
  seed_event(&store, "recE1", "recP1", "2025-03-10");

  rescheduler(store.clone())
    .reschedule(RescheduleRequest {
      event_id:    "recE1".to_string(),
      new_date:    None,
      new_status:  Some("confirmada".parse::<EventStatus>().unwrap()),
      cascade:     false,
      package_ref: None,
    })
    .await
    .unwrap();

  let record = store.get(&s.table, "recE1").unwrap();
  assert_eq!(record.str_field(&s.status_field), Some("CONFIRMADA"));
  // Untouched fields survive the merge update.
  assert_eq!(record.str_field(&s.date_field), Some("2025-03-10"));
  assert_eq!(record.str_field(&s.package_field), Some("recP1"));
  // The update timestamp is always refreshed.
  assert!(record.str_field(&s.updated_at_field).is_some());
}

// ─── Preconditions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn cascade_without_package_ref_is_rejected_before_any_write() {
  let store = Arc::new(MemoryStore::new());
  seed_event(&store, "recE1", "recP1", "2025-03-10");

  let err = rescheduler(store.clone())
    .reschedule(RescheduleRequest {
      event_id:    "recE1".to_string(),
      new_date:    Some(fixture_date("2025-03-13")),
      new_status:  None,
      cascade:     true,
      package_ref: None,
    })
    .await
    .unwrap_err();

  assert!(matches!(err, CoreError::MissingPackageRef));
  assert_eq!(date_of(&store, "recE1"), "2025-03-10");
}

#[tokio::test]
async fn cascading_a_missing_event_fails_with_not_found() {
  let store = Arc::new(MemoryStore::new());

  let err = rescheduler(store.clone())
    .reschedule(cascade_request("recGhost", "2025-03-13", "recP1"))
    .await
    .unwrap_err();

  assert!(matches!(err, CoreError::EventNotFound(id) if id == "recGhost"));
}

#[tokio::test]
async fn cascading_from_an_event_without_a_date_is_malformed() {
  let store = Arc::new(MemoryStore::new());
  let s = schema();
  store.seed_record(
    &s.table,
    Record::new("recE1").with_field(&s.package_field, json!(["recP1"])),
  );

  let err = rescheduler(store.clone())
    .reschedule(cascade_request("recE1", "2025-03-13", "recP1"))
    .await
    .unwrap_err();

  assert!(matches!(err, CoreError::MalformedRecord { .. }));
}

// ─── Store semantics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn updating_a_missing_record_is_a_store_error() {
  use datalab_core::{record::FieldMap, store::RecordStore};

  let store = MemoryStore::new();
  let err = store
    .update("Eventos", "recGhost", FieldMap::new())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RecordNotFound(_)));
}

#[tokio::test]
async fn seed_mints_opaque_record_ids() {
  use datalab_core::record::FieldMap;

  let store = MemoryStore::new();
  let s = schema();
  let mut fields = FieldMap::new();
  fields.insert(s.date_field.clone(), json!("2025-03-10"));

  let record = store.seed(&s.table, fields);
  assert!(record.id.starts_with("rec"));
  assert!(store.get(&s.table, &record.id).is_some());
}

#[tokio::test]
async fn siblings_come_back_ascending_by_date() {
  use datalab_core::{
    filter::{FilterExpr, SortSpec},
    store::RecordStore,
  };

  let store = MemoryStore::new();
  let s = schema();
  seed_event(&store, "recLate", "recP1", "2025-03-20");
  seed_event(&store, "recEarly", "recP1", "2025-03-11");
  seed_event(&store, "recMid", "recP1", "2025-03-15");

  let filter = FilterExpr::field_eq(&s.package_field, "recP1");
  let sort = SortSpec::ascending(&s.date_field);
  let records = store.find(&s.table, &filter, Some(&sort)).await.unwrap();

  let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, ["recEarly", "recMid", "recLate"]);
}
