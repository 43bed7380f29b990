//! Error types for DOI parsing

use thiserror::Error;

/// Reasons a string is rejected as a DOI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoiError {
    #[error("expected a DOI, but received an empty string")]
    EmptyInput,

    #[error("no DOI follows the {marker:?} prefix")]
    InvalidIdentifier { marker: String },

    #[error("the host {0:?} is not a DOI resolver")]
    UnsupportedHost(String),

    #[error("the scheme {0:?} is not permitted in a DOI URL")]
    UnsupportedScheme(String),

    #[error("malformed DOI {0:?}: expected 10.<registrant>/<suffix>")]
    MalformedDoi(String),
}

impl DoiError {
    /// Stable machine-readable tag for the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            DoiError::EmptyInput => "empty_input",
            DoiError::InvalidIdentifier { .. } => "invalid_identifier",
            DoiError::UnsupportedHost(_) => "unsupported_host",
            DoiError::UnsupportedScheme(_) => "unsupported_scheme",
            DoiError::MalformedDoi(_) => "malformed_doi",
        }
    }
}
