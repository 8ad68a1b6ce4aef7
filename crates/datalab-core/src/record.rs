//! Raw records as the external base returns them.
//!
//! A record is an identifier plus a loosely-typed field map. Typed access
//! belongs in [`crate::event`]; this module only smooths over the base's
//! representational quirks (linked-record fields arrive as arrays of ids).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The field map of a record, keyed by the base's display field names.
pub type FieldMap = serde_json::Map<String, Value>;

/// One record of the external tabular base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
  pub id:     String,
  #[serde(default)]
  pub fields: FieldMap,
}

impl Record {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into(), fields: FieldMap::new() }
  }

  /// Builder-style field setter, used when seeding test fixtures.
  pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
    self.fields.insert(name.to_string(), value.into());
    self
  }

  /// A field as text. Linked-record fields are arrays of ids; the first
  /// entry is taken, matching how the forms write single links.
  pub fn str_field(&self, name: &str) -> Option<&str> {
    match self.fields.get(name)? {
      Value::String(s) => Some(s.as_str()),
      Value::Array(items) => items.first().and_then(Value::as_str),
      _ => None,
    }
  }
}
