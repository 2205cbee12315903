use thiserror::Error;

use crate::model::{AttemptEntryError, CatalogItemError, QuestionError, UserError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    AttemptEntry(#[from] AttemptEntryError),
    #[error(transparent)]
    Catalog(#[from] CatalogItemError),
    #[error(transparent)]
    User(#[from] UserError),
}
