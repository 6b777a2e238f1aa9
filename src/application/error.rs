use thiserror::Error;

use crate::domain::todo::TodoId;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;
