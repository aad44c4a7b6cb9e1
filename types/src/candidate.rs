//! Candidates and parties. Display metadata only.

use serde::{Deserialize, Serialize};

use crate::{CandidateId, ElectionId, PartyId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

/// A candidate standing in exactly one election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub election_id: ElectionId,
    /// `None` for independents.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub ward_number: String,
}
