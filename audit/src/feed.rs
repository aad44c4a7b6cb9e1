//! Live notifications for connected administrators.
//!
//! A single broadcast channel owns the fan-out; each WebSocket connection
//! holds a receiver. A slow client lags and skips messages, a closed one
//! simply drops its receiver; neither affects the others.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use evote_types::AuditEvent;

/// The message pushed to dashboard clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Election title only; never a voter or candidate.
    pub election: String,
}

#[derive(Clone)]
pub struct AdminFeed {
    tx: broadcast::Sender<FeedMessage>,
}

impl AdminFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Forward `event` if it is a vote notification. Returns how many
    /// subscribers it reached.
    pub fn publish(&self, event: &AuditEvent) -> usize {
        if !event.is_vote_cast() {
            return 0;
        }
        let election = event
            .metadata
            .get("election_title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let message = FeedMessage {
            kind: event.action.clone(),
            message: "New vote received".to_string(),
            election,
        };
        // No subscribers is not an error.
        self.tx.send(message).unwrap_or(0)
    }
}
