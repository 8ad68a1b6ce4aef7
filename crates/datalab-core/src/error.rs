//! Error types for `datalab-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("event not found: {0}")]
  EventNotFound(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("shifting {date} by {delta} days leaves the supported calendar range")]
  DateOutOfRange { date: NaiveDate, delta: i64 },

  #[error("unknown event status: {0:?}")]
  InvalidStatus(String),

  #[error("malformed record {id}: {reason}")]
  MalformedRecord { id: String, reason: String },

  #[error("cascade requested without a package reference")]
  MissingPackageRef,

  #[error("record store read failed: {0}")]
  Read(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("record store write failed: {0}")]
  Write(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
