//! Vote casting.
//!
//! [`VoteCaster::cast_vote`] validates the election window and the voter,
//! then writes the anonymised vote and the participation row in one storage
//! transaction. The participation row's uniqueness is what makes a second
//! cast fail; the read-only pre-check only produces the friendly error early.

pub mod caster;
pub mod error;

pub use caster::{CastOutcome, VoteCaster};
pub use error::CastError;
