use thiserror::Error;

use evote_store::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    /// Election, candidate or receipt does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error("election is not active")]
    Closed,

    #[error("election has not started yet")]
    NotStarted,

    #[error("election has ended")]
    Ended,

    #[error("voter identity is missing or unknown")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("you have already voted in this election")]
    AlreadyVoted,

    #[error("request cancelled before the vote was recorded")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl CastError {
    /// Stable label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Closed => "closed",
            Self::NotStarted => "not_started",
            Self::Ended => "ended",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::AlreadyVoted => "already_voted",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    /// Map a failed ballot write. A uniqueness violation is the authoritative
    /// duplicate signal.
    pub(crate) fn from_write(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => Self::AlreadyVoted,
            StoreError::Aborted(_) => Self::Cancelled,
            other => Self::Internal(other.to_string()),
        }
    }

    /// Map a failed lookup, turning "missing" into `missing`.
    pub(crate) fn from_lookup(e: StoreError, missing: CastError) -> Self {
        if e.is_not_found() {
            missing
        } else {
            Self::Internal(e.to_string())
        }
    }
}
