//! Handlers for `/eventos` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/eventos` | `?paqueteId` required; package listing ascending by date |
//! | `GET`  | `/eventos/:id` | Single decoded event |
//! | `POST` | `/eventos/reschedule` | Body: [`RescheduleBody`]; moves an event, optionally cascading |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use datalab_core::{
  dates,
  event::{Event, EventStatus},
  filter::{FilterExpr, SortSpec},
  reschedule::{CascadeReport, RescheduleRequest, Rescheduler},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ApiError {
  ApiError::Store(Box::new(e))
}

// ─── Reschedule ──────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /eventos/reschedule`.
///
/// `fecha` and `estado` arrive as raw text so that malformed values produce
/// a 400 with a named reason instead of a generic body-rejection.
#[derive(Debug, Deserialize)]
pub struct RescheduleBody {
  pub id:                  String,
  pub fecha:               Option<String>,
  pub estado:              Option<String>,
  #[serde(rename = "updateFutureDates", default)]
  pub update_future_dates: bool,
  #[serde(rename = "paqueteId")]
  pub paquete_id:          Option<String>,
}

/// Response of `POST /eventos/reschedule`.
#[derive(Debug, Serialize)]
pub struct RescheduleResponse {
  pub success:               bool,
  #[serde(rename = "eventoId")]
  pub evento_id:             String,
  #[serde(rename = "updatedFutureEvents")]
  pub updated_future_events: usize,
  pub message:               String,
  /// Full cascade visibility; `updatedFutureEvents` alone cannot tell
  /// "all siblings shifted" from "some silently failed".
  pub cascade:               CascadeReport,
}

/// `POST /eventos/reschedule`
pub async fn reschedule<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RescheduleBody>,
) -> Result<Json<RescheduleResponse>, ApiError>
where
  S: RecordStore,
{
  let new_date = body.fecha.as_deref().map(dates::parse_date).transpose()?;
  let new_status = body
    .estado
    .as_deref()
    .map(|raw| raw.parse::<EventStatus>())
    .transpose()?;

  let outcome = Rescheduler::new(state.store.clone(), state.schema.clone())
    .reschedule(RescheduleRequest {
      event_id: body.id,
      new_date,
      new_status,
      cascade: body.update_future_dates,
      package_ref: body.paquete_id,
    })
    .await?;

  let message = if outcome.report.failures.is_empty() {
    format!("evento actualizado, {} eventos futuros movidos", outcome.cascaded)
  } else {
    format!(
      "evento actualizado, {} eventos futuros movidos, {} fallidos",
      outcome.cascaded,
      outcome.report.failures.len()
    )
  };

  Ok(Json(RescheduleResponse {
    success:               true,
    evento_id:             outcome.event_id,
    updated_future_events: outcome.cascaded,
    message,
    cascade:               outcome.report,
  }))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /eventos/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Event>, ApiError>
where
  S: RecordStore,
{
  let record = state
    .store
    .find_by_id(&state.schema.table, &id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;

  let event = Event::from_record(&record, &state.schema)?;
  Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the package whose events to return.
  #[serde(rename = "paqueteId")]
  pub paquete_id: String,
}

/// `GET /eventos?paqueteId=<id>` — ascending by scheduled date.
pub async fn list_by_package<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: RecordStore,
{
  let filter =
    FilterExpr::field_eq(&state.schema.package_field, &params.paquete_id);
  let sort = SortSpec::ascending(&state.schema.date_field);

  let records = state
    .store
    .find(&state.schema.table, &filter, Some(&sort))
    .await
    .map_err(store_err)?;

  // Records other flows wrote badly should not take the listing down.
  let events = records
    .iter()
    .filter_map(|record| match Event::from_record(record, &state.schema) {
      Ok(event) => Some(event),
      Err(e) => {
        tracing::warn!(record = %record.id, error = %e, "skipping undecodable event");
        None
      }
    })
    .collect();
  Ok(Json(events))
}
