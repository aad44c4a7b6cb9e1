//! Eligible-election resolution for a stored voter.

use std::sync::Arc;

use evote_store::{ElectionStore, VoterStore};
use evote_types::{Clock, Election, ElectionStatus, VoterId};

use crate::matcher::is_eligible;
use crate::EligibilityError;

/// An election the voter may take part in, with its status as of the
/// resolution instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibleElection {
    pub election: Election,
    pub status: ElectionStatus,
}

pub struct EligibilityResolver<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> EligibilityResolver<S>
where
    S: VoterStore + ElectionStore + ?Sized,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Active elections whose jurisdiction admits the voter, ordered by end
    /// time ascending. Status is derived here from the clock; nothing stored
    /// about status is consulted.
    pub fn list_eligible_elections(
        &self,
        voter_id: VoterId,
    ) -> Result<Vec<EligibleElection>, EligibilityError> {
        let voter = self.store.get_voter(voter_id).map_err(|e| {
            if e.is_not_found() {
                EligibilityError::VoterNotFound(voter_id)
            } else {
                EligibilityError::Store(e)
            }
        })?;

        let now = self.clock.now();
        let eligible: Vec<EligibleElection> = self
            .store
            .active_elections()?
            .into_iter()
            .filter(|e| is_eligible(&voter.jurisdiction, &e.jurisdiction, &e.election_type))
            .map(|election| EligibleElection {
                status: election.status_at(now),
                election,
            })
            .collect();

        tracing::debug!(count = eligible.len(), "resolved eligible elections");
        Ok(eligible)
    }
}
