use thiserror::Error;

use evote_store::StoreError;
use evote_types::VoterId;

#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("voter {0} not found")]
    VoterNotFound(VoterId),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EligibilityError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
