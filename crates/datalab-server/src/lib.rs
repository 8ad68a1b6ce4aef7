//! Server wiring for the DataLab API.

use datalab_core::schema::EventSchema;
use datalab_store_airtable::AirtableConfig;
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` with
/// `DATALAB_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:     String,
  #[serde(default = "default_port")]
  pub port:     u16,
  /// Credentials and base id for the external record base.
  pub airtable: AirtableConfig,
  /// Table/field names of the events table; Spanish base defaults apply.
  #[serde(default)]
  pub schema:   EventSchema,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
