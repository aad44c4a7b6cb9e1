//! Parse errors for the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid receipt: {0}")]
    InvalidReceipt(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
