//! The vote-casting state machine.
//!
//! Each step is a hard gate; nothing is retried:
//! 1. load the election
//! 2. check the window (activation flag, then start, then end)
//! 3. load the voter
//! 4. require a verified, unblocked voter
//! 5. require the candidate to stand in this election
//! 6. pre-check participation
//! 7. derive the receipt from the cast instant
//! 8. write vote + participation atomically
//! 9. emit `VOTE_CAST` to the audit sink
//!
//! Logging on this path never puts the voter id next to the receipt or the
//! candidate id.

use std::sync::Arc;

use evote_audit::AuditSink;
use evote_crypto::ReceiptHasher;
use evote_store::{BallotStore, CandidateStore, ElectionStore, VoterStore};
use evote_types::{
    AuditEvent, CancelFlag, CandidateId, Clock, ElectionId, ParticipationRecord, ReceiptHash,
    VoteRecord, VoterId,
};

use crate::CastError;

/// What the voter gets back from a successful cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastOutcome {
    pub receipt: ReceiptHash,
    pub election_title: String,
}

pub struct VoteCaster<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
}

impl<S> VoteCaster<S>
where
    S: VoterStore + ElectionStore + CandidateStore + BallotStore + ?Sized,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            clock,
            audit,
        }
    }

    pub fn cast_vote(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
        cancel: &CancelFlag,
    ) -> Result<CastOutcome, CastError> {
        let result = self.try_cast(voter_id, election_id, candidate_id, cancel);
        if let Err(e) = &result {
            tracing::info!(election_id = %election_id, reason = e.reason(), "vote rejected");
        }
        result
    }

    fn try_cast(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
        cancel: &CancelFlag,
    ) -> Result<CastOutcome, CastError> {
        let election = self.store.get_election(election_id).map_err(|e| {
            CastError::from_lookup(e, CastError::NotFound(format!("election {election_id}")))
        })?;

        let now = self.clock.now();
        if !election.is_active {
            return Err(CastError::Closed);
        }
        if now < election.starts_at {
            return Err(CastError::NotStarted);
        }
        if now > election.ends_at {
            return Err(CastError::Ended);
        }

        let voter = self
            .store
            .get_voter(voter_id)
            .map_err(|e| CastError::from_lookup(e, CastError::Unauthorized))?;
        if !voter.is_verified {
            return Err(CastError::Forbidden(
                "voter has not been verified by an administrator".to_string(),
            ));
        }
        if voter.is_blocked {
            return Err(CastError::Forbidden("voter is blocked".to_string()));
        }

        let candidate = self.store.get_candidate(candidate_id).map_err(|e| {
            CastError::from_lookup(e, CastError::NotFound(format!("candidate {candidate_id}")))
        })?;
        if candidate.election_id != election_id {
            return Err(CastError::NotFound(format!(
                "candidate {candidate_id} in election {election_id}"
            )));
        }

        if self
            .store
            .has_participated(voter_id, election_id)
            .map_err(|e| CastError::Internal(e.to_string()))?
        {
            return Err(CastError::AlreadyVoted);
        }

        let instant = self.clock.now();
        let receipt = ReceiptHasher::generate(voter_id, election_id, instant);
        let recorded_at = instant.truncate_to_secs();

        let vote = VoteRecord {
            election_id,
            candidate_id,
            receipt,
            cast_at: recorded_at,
        };
        let participation = ParticipationRecord {
            voter_id,
            election_id,
            participated_at: recorded_at,
        };
        self.store
            .record_ballot(&vote, &participation, cancel)
            .map_err(CastError::from_write)?;

        tracing::info!(election_id = %election_id, "vote recorded");

        self.audit.record(AuditEvent::vote_cast(
            election_id,
            &receipt,
            &election.title,
            recorded_at,
        ));

        Ok(CastOutcome {
            receipt,
            election_title: election.title,
        })
    }

    /// Public receipt check: the stored vote row for `receipt`, which names
    /// the election and the recorded second but no voter.
    pub fn verify_receipt(&self, receipt: &ReceiptHash) -> Result<VoteRecord, CastError> {
        self.store
            .vote_by_receipt(receipt)
            .map_err(|e| CastError::from_lookup(e, CastError::NotFound("receipt".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evote_nullables::{NullAuditSink, NullClock, NullStore};
    use evote_types::{Candidate, Election, ElectionType, Jurisdiction, Timestamp, Voter};

    const HOUR: u64 = 3600;
    const NOW: u64 = 1_750_000_000;

    struct Fixture {
        store: Arc<NullStore>,
        clock: Arc<NullClock>,
        audit: Arc<NullAuditSink>,
        caster: VoteCaster<NullStore>,
    }

    fn fixture_with(audit: NullAuditSink) -> Fixture {
        let store = Arc::new(NullStore::new());
        let clock = Arc::new(NullClock::new(Timestamp::from_nanos(NOW * 1_000_000_000 + 123_456_789)));
        let audit = Arc::new(audit);
        store
            .put_voter(&Voter {
                id: VoterId::new(1),
                full_name: "Rahul K".into(),
                voter_code: "VOTE-000001".into(),
                mobile: String::new(),
                jurisdiction: Jurisdiction::new("Kollam", "Chavara", "Panmana", "3"),
                is_verified: true,
                is_blocked: false,
            })
            .unwrap();
        store
            .put_election(&Election {
                id: ElectionId::new(10),
                title: "Kollam District Panchayat".into(),
                description: String::new(),
                election_type: ElectionType::DistrictPanchayat,
                jurisdiction: Jurisdiction::district("Kollam"),
                starts_at: Timestamp::from_secs(NOW - HOUR),
                ends_at: Timestamp::from_secs(NOW + HOUR),
                is_active: true,
                is_published: false,
            })
            .unwrap();
        for (id, election) in [(100, 10), (200, 20)] {
            store
                .put_candidate(&Candidate {
                    id: CandidateId::new(id),
                    election_id: ElectionId::new(election),
                    party_id: None,
                    full_name: format!("Candidate {id}"),
                    bio: String::new(),
                    photo: String::new(),
                    ward_number: String::new(),
                })
                .unwrap();
        }
        let caster = VoteCaster::new(store.clone(), clock.clone(), audit.clone());
        Fixture {
            store,
            clock,
            audit,
            caster,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(NullAuditSink::new())
    }

    fn cast(f: &Fixture) -> Result<CastOutcome, CastError> {
        f.caster.cast_vote(
            VoterId::new(1),
            ElectionId::new(10),
            CandidateId::new(100),
            &CancelFlag::new(),
        )
    }

    fn edit_election(f: &Fixture, edit: impl FnOnce(&mut Election)) {
        let mut e = f.store.get_election(ElectionId::new(10)).unwrap();
        edit(&mut e);
        f.store.put_election(&e).unwrap();
    }

    fn edit_voter(f: &Fixture, edit: impl FnOnce(&mut Voter)) {
        let mut v = f.store.get_voter(VoterId::new(1)).unwrap();
        edit(&mut v);
        f.store.put_voter(&v).unwrap();
    }

    #[test]
    fn successful_cast_returns_receipt_and_title() {
        let f = fixture();
        let outcome = cast(&f).unwrap();
        assert_eq!(outcome.election_title, "Kollam District Panchayat");
        let expected = ReceiptHasher::generate(VoterId::new(1), ElectionId::new(10), f.clock.now());
        assert_eq!(outcome.receipt, expected);

        let votes = f.store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].candidate_id, CandidateId::new(100));
        assert_eq!(votes[0].cast_at, Timestamp::from_secs(NOW));
        assert!(f.store.has_participated(VoterId::new(1), ElectionId::new(10)).unwrap());
    }

    #[test]
    fn second_cast_is_already_voted() {
        let f = fixture();
        cast(&f).unwrap();
        f.clock.advance_secs(1);
        assert_eq!(cast(&f).unwrap_err(), CastError::AlreadyVoted);
        assert_eq!(f.store.votes().len(), 1);
    }

    #[test]
    fn unknown_election_is_not_found() {
        let f = fixture();
        let err = f
            .caster
            .cast_vote(VoterId::new(1), ElectionId::new(99), CandidateId::new(100), &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, CastError::NotFound(_)));
    }

    #[test]
    fn inactive_election_is_closed_even_inside_window() {
        let f = fixture();
        edit_election(&f, |e| e.is_active = false);
        assert_eq!(cast(&f).unwrap_err(), CastError::Closed);
    }

    #[test]
    fn future_election_is_not_started() {
        let f = fixture();
        edit_election(&f, |e| e.starts_at = Timestamp::from_secs(NOW + 60));
        assert_eq!(cast(&f).unwrap_err(), CastError::NotStarted);
    }

    #[test]
    fn past_election_is_ended() {
        let f = fixture();
        edit_election(&f, |e| e.ends_at = Timestamp::from_secs(NOW - 1));
        assert_eq!(cast(&f).unwrap_err(), CastError::Ended);
        assert!(f.store.votes().is_empty());
    }

    #[test]
    fn window_is_checked_before_voter() {
        let f = fixture();
        edit_election(&f, |e| e.ends_at = Timestamp::from_secs(NOW - 1));
        let err = f
            .caster
            .cast_vote(VoterId::new(404), ElectionId::new(10), CandidateId::new(100), &CancelFlag::new())
            .unwrap_err();
        assert_eq!(err, CastError::Ended);
    }

    #[test]
    fn unknown_voter_is_unauthorized() {
        let f = fixture();
        let err = f
            .caster
            .cast_vote(VoterId::new(404), ElectionId::new(10), CandidateId::new(100), &CancelFlag::new())
            .unwrap_err();
        assert_eq!(err, CastError::Unauthorized);
    }

    #[test]
    fn unverified_or_blocked_voter_is_forbidden() {
        let f = fixture();
        edit_voter(&f, |v| v.is_verified = false);
        assert!(matches!(cast(&f).unwrap_err(), CastError::Forbidden(_)));

        edit_voter(&f, |v| {
            v.is_verified = true;
            v.is_blocked = true;
        });
        assert!(matches!(cast(&f).unwrap_err(), CastError::Forbidden(_)));
        assert!(f.store.participations().is_empty());
    }

    #[test]
    fn candidate_from_another_election_is_not_found() {
        let f = fixture();
        let err = f
            .caster
            .cast_vote(VoterId::new(1), ElectionId::new(10), CandidateId::new(200), &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, CastError::NotFound(_)));
        let err = f
            .caster
            .cast_vote(VoterId::new(1), ElectionId::new(10), CandidateId::new(999), &CancelFlag::new())
            .unwrap_err();
        assert!(matches!(err, CastError::NotFound(_)));
    }

    #[test]
    fn storage_failure_is_internal_and_writes_nothing() {
        let f = fixture();
        f.store.fail_ballot_writes(true);
        assert!(matches!(cast(&f).unwrap_err(), CastError::Internal(_)));
        assert!(f.store.votes().is_empty());
        assert!(f.store.participations().is_empty());
        assert!(f.audit.events().is_empty());
    }

    #[test]
    fn cancelled_cast_is_rolled_back() {
        let f = fixture();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = f
            .caster
            .cast_vote(VoterId::new(1), ElectionId::new(10), CandidateId::new(100), &cancel)
            .unwrap_err();
        assert_eq!(err, CastError::Cancelled);
        assert!(f.store.votes().is_empty());
        // The voter may resubmit.
        cast(&f).unwrap();
    }

    #[test]
    fn audit_event_is_anonymous() {
        let f = fixture();
        let outcome = cast(&f).unwrap();
        let events = f.audit.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!(event.is_vote_cast());
        assert_eq!(event.actor_id, None);
        assert_eq!(event.metadata["receipt"], outcome.receipt.to_hex());
        assert_eq!(event.metadata["election_id"], 10);
        assert!(!event.metadata.contains_key("voter_id"));
        assert!(!event.metadata.contains_key("candidate_id"));
    }

    #[test]
    fn failing_audit_sink_does_not_fail_the_vote() {
        let f = fixture_with(NullAuditSink::failing());
        assert!(cast(&f).is_ok());
        assert_eq!(f.store.votes().len(), 1);
    }

    #[test]
    fn receipt_verification() {
        let f = fixture();
        let outcome = cast(&f).unwrap();
        let vote = f.caster.verify_receipt(&outcome.receipt).unwrap();
        assert_eq!(vote.election_id, ElectionId::new(10));
        assert!(matches!(
            f.caster.verify_receipt(&ReceiptHash::new([0; 32])),
            Err(CastError::NotFound(_))
        ));
    }
}
