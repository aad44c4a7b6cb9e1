//! Seeding from JSON fixtures.
//!
//! Voters, parties, elections and candidates are maintained by external
//! administrative tooling; this is how their records reach the store. Times
//! in the file are Unix seconds.
//!
//! ```json
//! {
//!   "voters": [{"id": 1, "full_name": "…", "jurisdiction": {"district": "Kollam", …}, "is_verified": true}],
//!   "parties": [{"id": 1, "name": "Green Front"}],
//!   "elections": [{"id": 1, "title": "…", "election_type": "Grama Panchayat",
//!                  "jurisdiction": {…}, "starts_at": 1750000000, "ends_at": 1750086400}],
//!   "candidates": [{"id": 1, "election_id": 1, "party_id": 1, "full_name": "…"}]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use evote_store::{AuditStore, CandidateStore, ElectionStore, VoterStore};
use evote_types::{
    AuditEvent, Candidate, Election, ElectionId, ElectionType, Jurisdiction, Party, Timestamp,
    Voter,
};

use crate::NodeError;

pub const DATA_IMPORTED: &str = "DATA_IMPORTED";

#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub voters: Vec<Voter>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub elections: Vec<ElectionFixture>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct ElectionFixture {
    pub id: ElectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub election_type: ElectionType,
    #[serde(default)]
    pub jurisdiction: Jurisdiction,
    pub starts_at: u64,
    pub ends_at: u64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_published: bool,
}

fn default_active() -> bool {
    true
}

impl From<ElectionFixture> for Election {
    fn from(f: ElectionFixture) -> Self {
        Self {
            id: f.id,
            title: f.title,
            description: f.description,
            election_type: f.election_type,
            jurisdiction: f.jurisdiction,
            starts_at: Timestamp::from_secs(f.starts_at),
            ends_at: Timestamp::from_secs(f.ends_at),
            is_active: f.is_active,
            is_published: f.is_published,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub voters: usize,
    pub parties: usize,
    pub elections: usize,
    pub candidates: usize,
}

impl Fixtures {
    pub fn from_json(json: &str) -> Result<Self, NodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Import(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Reject windows that end before they start and candidates whose
    /// election is neither in this file nor already stored.
    fn validate<S>(&self, store: &S) -> Result<(), NodeError>
    where
        S: ElectionStore + ?Sized,
    {
        for e in &self.elections {
            if e.ends_at < e.starts_at {
                return Err(NodeError::Import(format!(
                    "election {} ends before it starts",
                    e.id
                )));
            }
        }
        let in_file: HashSet<ElectionId> = self.elections.iter().map(|e| e.id).collect();
        for c in &self.candidates {
            if in_file.contains(&c.election_id) {
                continue;
            }
            match store.get_election(c.election_id) {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    return Err(NodeError::Import(format!(
                        "candidate {} references unknown election {}",
                        c.id, c.election_id
                    )))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Validate, then upsert every record and append one audit entry.
    pub fn apply<S>(self, store: &S, now: Timestamp) -> Result<ImportSummary, NodeError>
    where
        S: VoterStore + ElectionStore + CandidateStore + AuditStore + ?Sized,
    {
        self.validate(store)?;

        let summary = ImportSummary {
            voters: self.voters.len(),
            parties: self.parties.len(),
            elections: self.elections.len(),
            candidates: self.candidates.len(),
        };

        for voter in &self.voters {
            store.put_voter(voter)?;
        }
        for party in &self.parties {
            store.put_party(party)?;
        }
        for election in self.elections {
            store.put_election(&election.into())?;
        }
        for candidate in &self.candidates {
            store.put_candidate(candidate)?;
        }

        store.append_audit(
            &AuditEvent::new(DATA_IMPORTED, now.truncate_to_secs())
                .with_meta("voters", summary.voters)
                .with_meta("parties", summary.parties)
                .with_meta("elections", summary.elections)
                .with_meta("candidates", summary.candidates),
        )?;

        tracing::info!(
            voters = summary.voters,
            parties = summary.parties,
            elections = summary.elections,
            candidates = summary.candidates,
            "fixtures imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evote_nullables::NullStore;
    use evote_types::{CandidateId, VoterId};

    const FIXTURES: &str = r#"{
        "voters": [{
            "id": 1,
            "full_name": "Anjali Nair",
            "voter_code": "VOTE-000001",
            "jurisdiction": {"district": "Kollam", "block": "Chavara", "local_body_name": "Panmana", "ward": "3"},
            "is_verified": true
        }],
        "parties": [{"id": 1, "name": "Green Front", "logo": "green.png"}],
        "elections": [{
            "id": 1,
            "title": "Panmana Ward 3",
            "election_type": "Grama Panchayat",
            "jurisdiction": {"district": "Kollam", "block": "Chavara", "local_body_name": "Panmana", "ward": "3"},
            "starts_at": 1750000000,
            "ends_at": 1750086400
        }],
        "candidates": [
            {"id": 1, "election_id": 1, "party_id": 1, "full_name": "Ravi K"},
            {"id": 2, "election_id": 1, "full_name": "Suma P"}
        ]
    }"#;

    #[test]
    fn imports_every_table_and_audits() {
        let store = NullStore::new();
        let summary = Fixtures::from_json(FIXTURES)
            .unwrap()
            .apply(&store, Timestamp::from_secs(1_749_000_000))
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                voters: 1,
                parties: 1,
                elections: 1,
                candidates: 2
            }
        );

        let voter = store.get_voter(VoterId::new(1)).unwrap();
        assert!(voter.is_verified);
        assert!(!voter.is_blocked);

        let election = store.get_election(ElectionId::new(1)).unwrap();
        assert_eq!(election.election_type, ElectionType::GramaPanchayat);
        assert_eq!(election.starts_at, Timestamp::from_secs(1_750_000_000));
        assert!(election.is_active);

        let independent = store.get_candidate(CandidateId::new(2)).unwrap();
        assert_eq!(independent.party_id, None);

        let audit = store.recent_audit(10).unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].event.action, DATA_IMPORTED);
        assert_eq!(audit[0].event.metadata["candidates"], 2);
    }

    #[test]
    fn dangling_candidate_is_rejected_before_any_write() {
        let store = NullStore::new();
        let fixtures = Fixtures::from_json(
            r#"{
                "voters": [{"id": 5, "full_name": "X", "jurisdiction": {"district": "Kollam"}}],
                "candidates": [{"id": 9, "election_id": 42, "full_name": "Nobody"}]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            fixtures.apply(&store, Timestamp::EPOCH),
            Err(NodeError::Import(_))
        ));
        assert!(store.get_voter(VoterId::new(5)).is_err());
        assert_eq!(store.audit_count().unwrap(), 0);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let fixtures = Fixtures::from_json(
            r#"{"elections": [{"id": 1, "title": "T", "election_type": "Municipality",
                "starts_at": 200, "ends_at": 100}]}"#,
        )
        .unwrap();
        assert!(fixtures.apply(&NullStore::new(), Timestamp::EPOCH).is_err());
    }

    #[test]
    fn unknown_election_type_is_kept() {
        let store = NullStore::new();
        Fixtures::from_json(
            r#"{"elections": [{"id": 3, "title": "T", "election_type": "Cooperative Society",
                "starts_at": 1, "ends_at": 2, "is_active": false}]}"#,
        )
        .unwrap()
        .apply(&store, Timestamp::EPOCH)
        .unwrap();
        let e = store.get_election(ElectionId::new(3)).unwrap();
        assert_eq!(e.election_type, ElectionType::Other("Cooperative Society".into()));
        assert!(!e.is_active);
    }
}
