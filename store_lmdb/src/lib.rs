//! LMDB storage backend for the evote core.
//!
//! Implements every storage trait from `evote-store` using the `heed` LMDB
//! bindings. Each table maps to one LMDB database within a single environment.
//! LMDB allows one write transaction at a time, and uniqueness is enforced
//! with `NO_OVERWRITE` puts, so the participation constraint holds across
//! threads and processes sharing the environment.

pub mod audit;
pub mod ballot;
pub mod candidate;
pub mod election;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod voter;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use write_batch::WriteBatch;
