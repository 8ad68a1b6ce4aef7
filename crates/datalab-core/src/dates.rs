//! Calendar-day arithmetic for the reschedule procedure.
//!
//! Dates are naive: the external base stores plain `YYYY-MM-DD` values with
//! no zone, and day deltas are computed on those values directly. Whether
//! day boundaries should instead be anchored to a producer-local zone is a
//! stakeholder question; until answered, naive arithmetic matches what the
//! base actually holds.

use chrono::{Days, NaiveDate};

use crate::{Error, Result};

/// Whole-day difference between two calendar dates.
///
/// Negative means `new` falls before `old` ("moved earlier").
pub fn day_delta(old: NaiveDate, new: NaiveDate) -> i64 {
  new.signed_duration_since(old).num_days()
}

/// Shift `date` by `delta` days, failing instead of wrapping at the edges
/// of the representable calendar range.
pub fn shift_date(date: NaiveDate, delta: i64) -> Result<NaiveDate> {
  let shifted = if delta >= 0 {
    date.checked_add_days(Days::new(delta as u64))
  } else {
    date.checked_sub_days(Days::new(delta.unsigned_abs()))
  };
  shifted.ok_or(Error::DateOutOfRange { date, delta })
}

/// Parse a `YYYY-MM-DD` value as stored by the record base.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  #[test]
  fn delta_is_antisymmetric() {
    let a = d("2025-03-10");
    let b = d("2025-03-13");
    assert_eq!(day_delta(a, b), 3);
    assert_eq!(day_delta(b, a), -3);
    assert_eq!(day_delta(a, a), 0);
  }

  #[test]
  fn shift_round_trips_through_delta() {
    let a = d("2025-02-27");
    let b = d("2025-07-04");
    assert_eq!(shift_date(a, day_delta(a, b)).unwrap(), b);
    assert_eq!(shift_date(b, day_delta(b, a)).unwrap(), a);
  }

  #[test]
  fn shift_crosses_leap_day() {
    assert_eq!(shift_date(d("2024-02-28"), 1).unwrap(), d("2024-02-29"));
    assert_eq!(shift_date(d("2025-02-28"), 1).unwrap(), d("2025-03-01"));
    assert_eq!(shift_date(d("2024-03-01"), -1).unwrap(), d("2024-02-29"));
  }

  #[test]
  fn shift_out_of_range_fails() {
    let err = shift_date(NaiveDate::MAX, 1).unwrap_err();
    assert!(matches!(err, Error::DateOutOfRange { delta: 1, .. }));
  }

  #[test]
  fn parse_rejects_garbage() {
    assert!(matches!(parse_date("not-a-date"), Err(Error::InvalidDate(_))));
    assert!(matches!(parse_date("2025-13-40"), Err(Error::InvalidDate(_))));
    assert_eq!(parse_date(" 2025-03-10 ").unwrap(), d("2025-03-10"));
  }
}
