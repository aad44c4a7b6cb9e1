//! Eligibility: which elections a voter may take part in.
//!
//! [`matcher`] is a pure predicate over two jurisdictions and an election
//! type. [`resolver`] applies it to the active elections of a stored voter
//! and attaches the status derived from the current time.

pub mod error;
pub mod matcher;
pub mod resolver;

pub use error::EligibilityError;
pub use matcher::{is_eligible, local_body_matches, wards_match};
pub use resolver::{EligibilityResolver, EligibleElection};
