//! Field-name mapping for the external base.
//!
//! Table and field names live in deployment configuration, not in code:
//! the base is schemaless from our side, and operators rename columns.
//! Everything that touches a field name receives an [`EventSchema`] at
//! construction instead of reading ambient globals, so tests can pin a
//! fixed mapping.

use serde::Deserialize;

/// Names of the events table and its fields in the external base.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSchema {
  #[serde(default = "default_table")]
  pub table:            String,
  #[serde(default = "default_date_field")]
  pub date_field:       String,
  #[serde(default = "default_status_field")]
  pub status_field:     String,
  #[serde(default = "default_package_field")]
  pub package_field:    String,
  #[serde(default = "default_updated_at_field")]
  pub updated_at_field: String,
}

impl Default for EventSchema {
  fn default() -> Self {
    Self {
      table:            default_table(),
      date_field:       default_date_field(),
      status_field:     default_status_field(),
      package_field:    default_package_field(),
      updated_at_field: default_updated_at_field(),
    }
  }
}

fn default_table() -> String { "Eventos".to_string() }
fn default_date_field() -> String { "Fecha".to_string() }
fn default_status_field() -> String { "Estado".to_string() }
fn default_package_field() -> String { "Paquete".to_string() }
fn default_updated_at_field() -> String { "Ultima actualizacion".to_string() }
