//! Structured audit events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ElectionId, ReceiptHash, Timestamp};

/// Action name for a successful cast.
pub const VOTE_CAST: &str = "VOTE_CAST";

/// One state-changing action, as handed to an audit sink.
///
/// `actor_id` is optional so that events on the vote path can be recorded
/// without naming the voter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: String,
    #[serde(default)]
    pub actor_id: Option<u64>,
    #[serde(default)]
    pub actor_role: Option<String>,
    #[serde(default)]
    pub target_id: Option<u64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub timestamp: Timestamp,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            action: action.into(),
            actor_id: None,
            actor_role: None,
            target_id: None,
            metadata: Map::new(),
            timestamp,
        }
    }

    pub fn with_actor(mut self, id: u64, role: impl Into<String>) -> Self {
        self.actor_id = Some(id);
        self.actor_role = Some(role.into());
        self
    }

    pub fn with_target(mut self, id: u64) -> Self {
        self.target_id = Some(id);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// The anonymous `VOTE_CAST` event: election, receipt and title, no actor.
    pub fn vote_cast(
        election_id: ElectionId,
        receipt: &ReceiptHash,
        election_title: &str,
        timestamp: Timestamp,
    ) -> Self {
        Self::new(VOTE_CAST, timestamp)
            .with_target(election_id.get())
            .with_meta("election_id", election_id.get())
            .with_meta("receipt", receipt.to_hex())
            .with_meta("election_title", election_title)
    }

    pub fn is_vote_cast(&self) -> bool {
        self.action == VOTE_CAST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_cast_has_no_actor() {
        let event = AuditEvent::vote_cast(
            ElectionId::new(4),
            &ReceiptHash::new([7u8; 32]),
            "Ward 3 By-election",
            Timestamp::from_secs(10),
        );
        assert!(event.is_vote_cast());
        assert_eq!(event.actor_id, None);
        assert_eq!(event.actor_role, None);
        assert_eq!(event.metadata["election_id"], 4);
        assert_eq!(event.metadata["receipt"], "07".repeat(32));
        assert_eq!(event.metadata["election_title"], "Ward 3 By-election");
    }

    #[test]
    fn json_shape_is_stable() {
        let event = AuditEvent::new("VOTER_VERIFIED", Timestamp::from_secs(1))
            .with_actor(9, "STAFF")
            .with_target(12);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "VOTER_VERIFIED");
        assert_eq!(json["actor_id"], 9);
        assert_eq!(json["actor_role"], "STAFF");
        assert_eq!(json["target_id"], 12);
        let back: AuditEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
