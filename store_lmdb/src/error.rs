use heed::MdbError;
use thiserror::Error;

use evote_store::StoreError;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("key already exists: {0}")]
    KeyExist(String),

    #[error("transaction aborted: {0}")]
    Aborted(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corruption: {0}")]
    Corruption(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        match e {
            heed::Error::Mdb(MdbError::KeyExist) => Self::KeyExist("unique key".to_string()),
            heed::Error::Mdb(MdbError::Corrupted) => Self::Corruption(e.to_string()),
            other => Self::Heed(other.to_string()),
        }
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for LmdbError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for LmdbError {
    fn from(e: std::io::Error) -> Self {
        Self::Heed(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(what) => StoreError::NotFound(what),
            LmdbError::KeyExist(what) => StoreError::Duplicate(what),
            LmdbError::Aborted(why) => StoreError::Aborted(why),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::Corruption(msg) => StoreError::Corruption(msg),
            LmdbError::Heed(msg) => StoreError::Backend(msg),
        }
    }
}
