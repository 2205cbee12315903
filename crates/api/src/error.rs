//! Shared error types for the api crate.

use thiserror::Error;

use prep_core::model::{
    AttemptEntryError, CatalogItemError, ParseIdError, QuestionError, UserError,
};

/// Errors raised while normalizing a response envelope into a list or item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    #[error("expected a JSON array or an object wrapping one, got {found}")]
    UnexpectedShape { found: &'static str },

    #[error("envelope field {field:?} is not an array")]
    FieldNotArray { field: String },

    #[error("failed to decode payload: {0}")]
    Payload(String),
}

/// Errors raised while converting a wire DTO into the domain model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DtoError {
    #[error("missing field {field:?}")]
    MissingField { field: &'static str },

    #[error("non-numeric id in field {field:?}: {raw}")]
    BadId { field: &'static str, raw: String },

    #[error("unknown status code {code} for question {question}")]
    BadStatus { question: u64, code: u8 },

    #[error("unparsable option letter {raw:?} for question {question}")]
    BadLetter { question: u64, raw: String },

    #[error("unknown difficulty {raw:?}")]
    BadDifficulty { raw: String },

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Entry(#[from] AttemptEntryError),

    #[error(transparent)]
    Catalog(#[from] CatalogItemError),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<ParseIdError> for DtoError {
    fn from(err: ParseIdError) -> Self {
        DtoError::BadId {
            field: "id",
            raw: err.to_string(),
        }
    }
}

/// Errors surfaced by the remote gateways.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Dto(#[from] DtoError),
}

impl ApiError {
    /// Whether the failure was a non-2xx response (as opposed to transport
    /// or decoding trouble).
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::HttpStatus(_))
    }
}

/// Errors surfaced by session stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
