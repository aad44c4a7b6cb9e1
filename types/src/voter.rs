//! Registered voters.

use serde::{Deserialize, Serialize};

use crate::{Jurisdiction, VoterId};

/// A registered voter.
///
/// Verification and blocking are driven by the administrative workflow; the
/// vote-casting core only reads them. Whether a voter has voted in a given
/// election is not stored here: it is the existence of a participation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub full_name: String,
    /// Public voter card number (e.g. `VOTE-123456`).
    #[serde(default)]
    pub voter_code: String,
    #[serde(default)]
    pub mobile: String,
    pub jurisdiction: Jurisdiction,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_blocked: bool,
}

impl Voter {
    /// Verified by an administrator and not blocked.
    pub fn may_vote(&self) -> bool {
        self.is_verified && !self.is_blocked
    }
}
