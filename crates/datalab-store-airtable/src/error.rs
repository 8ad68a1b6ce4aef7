//! Error type for `datalab-store-airtable`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("record not found: {0}")]
  RecordNotFound(String),

  #[error("Airtable rejected the request ({status}): {message}")]
  Api { status: u16, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
