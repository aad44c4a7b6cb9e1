//! The two records written by a successful cast.
//!
//! [`VoteRecord`] carries what was chosen but not who chose it.
//! [`ParticipationRecord`] carries who took part but not what they chose.
//! Nothing links one to the other.

use serde::{Deserialize, Serialize};

use crate::{CandidateId, ElectionId, ReceiptHash, Timestamp, VoterId};

/// An anonymised vote. Has no voter field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub receipt: ReceiptHash,
    /// Whole-second resolution.
    pub cast_at: Timestamp,
}

/// The fact that a voter took part in an election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub voter_id: VoterId,
    pub election_id: ElectionId,
    /// Whole-second resolution.
    pub participated_at: Timestamp,
}
