//! JSON REST API for the DataLab scheduling core.
//!
//! Exposes an axum [`Router`] backed by any
//! [`datalab_core::store::RecordStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", datalab_api::api_router(state))
//! ```

pub mod error;
pub mod events;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use datalab_core::{schema::EventSchema, store::RecordStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub schema: EventSchema,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), schema: self.schema.clone() }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/eventos", get(events::list_by_package::<S>))
    .route("/eventos/{id}", get(events::get_one::<S>))
    .route("/eventos/reschedule", post(events::reschedule::<S>))
    .with_state(state)
}
