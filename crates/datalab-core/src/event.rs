//! The typed `Event` entity and its conversion boundary.
//!
//! The base hands back loosely-typed field maps; [`Event::from_record`] is
//! the single place where those are validated into a typed value. Anything
//! that cannot be mapped fails with [`Error::MalformedRecord`] — undefined
//! and null never travel further into the core.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, dates, record::Record, schema::EventSchema};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The fixed status enumeration of an event.
///
/// The base stores the Spanish wire forms in upper case; parsing is
/// case-insensitive so form input like `"confirmada"` normalises to
/// `"CONFIRMADA"` on write. Any status may move to any other status — the
/// procedure enforces membership in this set, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventStatus {
  /// `PRESUPUESTADA`
  Budgeted,
  /// `CONFIRMADA`
  Confirmed,
  /// `ENTREGADA`
  Delivered,
  /// `POSPUESTA`
  Postponed,
}

impl EventStatus {
  /// The upper-case wire form persisted to the base.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Budgeted => "PRESUPUESTADA",
      Self::Confirmed => "CONFIRMADA",
      Self::Delivered => "ENTREGADA",
      Self::Postponed => "POSPUESTA",
    }
  }
}

impl fmt::Display for EventStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EventStatus {
  type Err = Error;

  fn from_str(raw: &str) -> Result<Self> {
    match raw.trim().to_uppercase().as_str() {
      "PRESUPUESTADA" => Ok(Self::Budgeted),
      "CONFIRMADA" => Ok(Self::Confirmed),
      "ENTREGADA" => Ok(Self::Delivered),
      "POSPUESTA" => Ok(Self::Postponed),
      _ => Err(Error::InvalidStatus(raw.to_string())),
    }
  }
}

impl TryFrom<String> for EventStatus {
  type Error = Error;

  fn try_from(raw: String) -> Result<Self> { raw.parse() }
}

impl From<EventStatus> for String {
  fn from(status: EventStatus) -> Self { status.as_str().to_string() }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// One scheduled production/application instance belonging to a package.
///
/// The base owns the authoritative copy; this value is a point-in-time read.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
  pub id:             String,
  #[serde(rename = "fecha")]
  pub scheduled_date: Option<NaiveDate>,
  #[serde(rename = "estado")]
  pub status:         Option<EventStatus>,
  #[serde(rename = "paqueteId")]
  pub package_ref:    Option<String>,
  #[serde(rename = "ultimaActualizacion")]
  pub updated_at:     Option<DateTime<Utc>>,
}

impl Event {
  /// Validate a raw record into a typed event using the injected schema.
  ///
  /// Absent fields become `None`; present-but-unmappable fields fail.
  pub fn from_record(record: &Record, schema: &EventSchema) -> Result<Self> {
    let malformed = |reason: String| Error::MalformedRecord {
      id:     record.id.clone(),
      reason,
    };

    let scheduled_date = match record.str_field(&schema.date_field) {
      Some(raw) => Some(
        dates::parse_date(raw)
          .map_err(|_| malformed(format!("unparseable date {raw:?}")))?,
      ),
      None if record.fields.contains_key(&schema.date_field) => {
        return Err(malformed("date field is not text".to_string()));
      }
      None => None,
    };

    let status = match record.str_field(&schema.status_field) {
      Some(raw) => Some(
        raw
          .parse::<EventStatus>()
          .map_err(|_| malformed(format!("unknown status {raw:?}")))?,
      ),
      None => None,
    };

    let updated_at = match record.str_field(&schema.updated_at_field) {
      Some(raw) => Some(
        DateTime::parse_from_rfc3339(raw)
          .map(|t| t.with_timezone(&Utc))
          .map_err(|_| malformed(format!("unparseable timestamp {raw:?}")))?,
      ),
      None => None,
    };

    Ok(Self {
      id: record.id.clone(),
      scheduled_date,
      status,
      package_ref: record.str_field(&schema.package_field).map(String::from),
      updated_at,
    })
  }
}
