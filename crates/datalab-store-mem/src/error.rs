//! Error type for `datalab-store-mem`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("record not found: {0}")]
  RecordNotFound(String),

  #[error("injected failure updating {0}")]
  InjectedFailure(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
