//! Query predicates over record fields.
//!
//! The core owns the predicate *semantics*; how a backend executes them is
//! its business. The HTTP backend renders a predicate to the base's formula
//! grammar with [`FilterExpr::to_formula`]; the in-memory backend evaluates
//! it structurally with [`FilterExpr::matches`]. Both must agree, which the
//! tests below pin down.

use chrono::NaiveDate;

use crate::{dates, record::Record};

// ─── Predicates ──────────────────────────────────────────────────────────────

/// A boolean predicate over one record.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
  /// The named field equals the given text (linked-record fields match on
  /// their first linked id).
  FieldEq { field: String, value: String },
  /// The named date field is strictly after the given date. Records with a
  /// missing or unparseable date never match.
  DateAfter { field: String, date: NaiveDate },
  /// The record's own identifier differs from the given one.
  RecordIdNot(String),
  /// All child predicates hold.
  And(Vec<FilterExpr>),
}

impl FilterExpr {
  pub fn field_eq(field: impl Into<String>, value: impl Into<String>) -> Self {
    Self::FieldEq { field: field.into(), value: value.into() }
  }

  pub fn date_after(field: impl Into<String>, date: NaiveDate) -> Self {
    Self::DateAfter { field: field.into(), date }
  }

  /// Render to the base's textual formula grammar.
  pub fn to_formula(&self) -> String {
    match self {
      Self::FieldEq { field, value } => {
        format!("{{{field}}} = {}", quote(value))
      }
      Self::DateAfter { field, date } => {
        format!("IS_AFTER({{{field}}}, {})", quote(&date.to_string()))
      }
      Self::RecordIdNot(id) => format!("RECORD_ID() != {}", quote(id)),
      Self::And(children) => match children.as_slice() {
        [single] => single.to_formula(),
        _ => {
          let parts: Vec<String> =
            children.iter().map(Self::to_formula).collect();
          format!("AND({})", parts.join(", "))
        }
      },
    }
  }

  /// Evaluate the predicate against one record.
  pub fn matches(&self, record: &Record) -> bool {
    match self {
      Self::FieldEq { field, value } => {
        record.str_field(field) == Some(value.as_str())
      }
      Self::DateAfter { field, date } => record
        .str_field(field)
        .and_then(|raw| dates::parse_date(raw).ok())
        .is_some_and(|d| d > *date),
      Self::RecordIdNot(id) => record.id != *id,
      Self::And(children) => children.iter().all(|c| c.matches(record)),
    }
  }
}

fn quote(value: &str) -> String {
  format!("'{}'", value.replace('\'', "\\'"))
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
  Asc,
  Desc,
}

/// A single-field sort, applied by the backend executing the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
  pub field:     String,
  pub direction: SortDirection,
}

impl SortSpec {
  pub fn ascending(field: impl Into<String>) -> Self {
    Self { field: field.into(), direction: SortDirection::Asc }
  }
}
