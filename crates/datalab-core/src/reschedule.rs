//! The reschedule procedure: move one event, optionally dragging its future
//! package siblings along by the same day delta.
//!
//! There is no transaction spanning the writes. The primary update and each
//! sibling update are independent remote calls, issued strictly in sequence
//! (primary first, then siblings ascending by date). A failure mid-cascade
//! leaves the primary moved and a prefix of siblings shifted; the returned
//! [`CascadeReport`] is the only record of how far the cascade got. Callers
//! must treat it accordingly.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::{
  Error, Result, dates,
  event::EventStatus,
  filter::{FilterExpr, SortSpec},
  record::{FieldMap, Record},
  schema::EventSchema,
  store::RecordStore,
};

// ─── Request / outcome ───────────────────────────────────────────────────────

/// Inputs to one invocation of [`Rescheduler::reschedule`].
#[derive(Debug, Clone)]
pub struct RescheduleRequest {
  pub event_id:    String,
  /// New scheduled date, if the date is changing.
  pub new_date:    Option<NaiveDate>,
  /// New status, if the status is changing. Already validated against the
  /// fixed enumeration by construction.
  pub new_status:  Option<EventStatus>,
  /// Propagate the date shift to future siblings of the same package.
  pub cascade:     bool,
  /// Owning package; required when `cascade` is set.
  pub package_ref: Option<String>,
}

/// Full visibility into how far a cascade progressed.
///
/// `siblings_attempted - siblings_succeeded == failures.len()`; a non-empty
/// `failures` list with `primary_updated == true` is the partially-applied
/// state the procedure cannot roll back.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CascadeReport {
  pub primary_updated:    bool,
  pub siblings_attempted: usize,
  pub siblings_succeeded: usize,
  /// Record ids of siblings whose shift failed.
  pub failures:           Vec<String>,
}

/// Result of one reschedule invocation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RescheduleOutcome {
  pub event_id: String,
  /// Count of siblings successfully shifted (the legacy wire counter).
  pub cascaded: usize,
  pub report:   CascadeReport,
}

// ─── Procedure ───────────────────────────────────────────────────────────────

/// Stateless orchestrator for the reschedule procedure. Holds no durable
/// state between invocations; the base owns the authoritative copy.
pub struct Rescheduler<S> {
  store:  Arc<S>,
  schema: EventSchema,
}

impl<S: RecordStore> Rescheduler<S> {
  pub fn new(store: Arc<S>, schema: EventSchema) -> Self {
    Self { store, schema }
  }

  /// Apply `new_date` and/or `new_status` to the event, then — when
  /// cascading — shift every sibling of the same package scheduled strictly
  /// after the event's *prior* date by the same day delta.
  ///
  /// The primary update's failure is fatal. Sibling failures are logged,
  /// recorded in the report, and never propagated; the loop continues.
  pub async fn reschedule(
    &self,
    req: RescheduleRequest,
  ) -> Result<RescheduleOutcome> {
    if req.cascade && req.package_ref.is_none() {
      return Err(Error::MissingPackageRef);
    }

    // Step 1: capture the prior date before the write below destroys it.
    // Only needed when a cascade will actually run.
    let prior_date = match (&req.new_date, req.cascade) {
      (Some(_), true) => Some(self.read_prior_date(&req.event_id).await?),
      _ => None,
    };

    // Step 2: single-record merge update of the primary event. The updated
    // timestamp is refreshed even when no other field changed.
    let mut patch = FieldMap::new();
    if let Some(date) = req.new_date {
      patch.insert(self.schema.date_field.clone(), Value::from(date.to_string()));
    }
    if let Some(status) = req.new_status {
      patch.insert(
        self.schema.status_field.clone(),
        Value::from(status.as_str()),
      );
    }
    patch.insert(
      self.schema.updated_at_field.clone(),
      Value::from(Utc::now().to_rfc3339()),
    );

    self
      .store
      .update(&self.schema.table, &req.event_id, patch)
      .await
      .map_err(|e| Error::Write(Box::new(e)))?;

    let mut report = CascadeReport { primary_updated: true, ..Default::default() };

    // Steps 3–5: cascade to future siblings.
    if let (Some(prior), Some(new_date), Some(package_ref)) =
      (prior_date, req.new_date, req.package_ref.as_deref())
    {
      let delta = dates::day_delta(prior, new_date);
      if delta != 0 {
        self
          .cascade_siblings(&req.event_id, package_ref, prior, delta, &mut report)
          .await?;
      } else {
        tracing::debug!(event_id = %req.event_id, "zero day delta, skipping cascade");
      }
    }

    tracing::info!(
      event_id = %req.event_id,
      cascaded = report.siblings_succeeded,
      failed = report.failures.len(),
      "reschedule complete"
    );

    Ok(RescheduleOutcome {
      event_id: req.event_id,
      cascaded: report.siblings_succeeded,
      report,
    })
  }

  /// Read the event's current scheduled date. Fails when the event does not
  /// exist or its date cannot be interpreted — both before anything has
  /// been written.
  async fn read_prior_date(&self, event_id: &str) -> Result<NaiveDate> {
    let record = self
      .store
      .find_by_id(&self.schema.table, event_id)
      .await
      .map_err(|e| Error::Read(Box::new(e)))?
      .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

    let raw = record.str_field(&self.schema.date_field).ok_or_else(|| {
      Error::MalformedRecord {
        id:     record.id.clone(),
        reason: "event has no scheduled date to shift from".to_string(),
      }
    })?;
    dates::parse_date(raw).map_err(|_| Error::MalformedRecord {
      id:     record.id.clone(),
      reason: format!("unparseable scheduled date {raw:?}"),
    })
  }

  /// Steps 4–5: query the future-sibling snapshot, then shift each one
  /// sequentially. Per-sibling failures are recorded and the loop goes on.
  async fn cascade_siblings(
    &self,
    event_id: &str,
    package_ref: &str,
    prior: NaiveDate,
    delta: i64,
    report: &mut CascadeReport,
  ) -> Result<()> {
    let filter = FilterExpr::And(vec![
      FilterExpr::field_eq(&self.schema.package_field, package_ref),
      FilterExpr::date_after(&self.schema.date_field, prior),
      FilterExpr::RecordIdNot(event_id.to_string()),
    ]);
    let sort = SortSpec::ascending(&self.schema.date_field);

    let siblings = self
      .store
      .find(&self.schema.table, &filter, Some(&sort))
      .await
      .map_err(|e| Error::Read(Box::new(e)))?;

    tracing::debug!(
      event_id,
      package_ref,
      siblings = siblings.len(),
      delta,
      "cascading date shift"
    );

    for sibling in &siblings {
      report.siblings_attempted += 1;
      match self.shift_sibling(sibling, delta).await {
        Ok(()) => report.siblings_succeeded += 1,
        Err(e) => {
          tracing::warn!(
            sibling = %sibling.id,
            error = %e,
            "sibling shift failed, continuing with the rest"
          );
          report.failures.push(sibling.id.clone());
        }
      }
    }
    Ok(())
  }

  async fn shift_sibling(&self, sibling: &Record, delta: i64) -> Result<()> {
    let raw = sibling.str_field(&self.schema.date_field).ok_or_else(|| {
      Error::MalformedRecord {
        id:     sibling.id.clone(),
        reason: "sibling has no scheduled date".to_string(),
      }
    })?;
    let current = dates::parse_date(raw)?;
    let shifted = dates::shift_date(current, delta)?;

    let mut patch = FieldMap::new();
    patch.insert(
      self.schema.date_field.clone(),
      Value::from(shifted.to_string()),
    );
    patch.insert(
      self.schema.updated_at_field.clone(),
      Value::from(Utc::now().to_rfc3339()),
    );

    self
      .store
      .update(&self.schema.table, &sibling.id, patch)
      .await
      .map_err(|e| Error::Write(Box::new(e)))?;
    Ok(())
  }
}
