//! Vote receipts.
//!
//! A receipt is `SHA-256("{voter}-{election}-{unix_nanos}")`, hex-encoded for
//! the voter. The nanosecond instant is never persisted, so linking a stored
//! vote back to a voter requires guessing that exact instant. This is weak,
//! unsalted unlinkability, not a commitment scheme; receipts already handed
//! out depend on this exact preimage format.

use evote_types::{ElectionId, ReceiptHash, Timestamp, VoterId};

use crate::hash::sha256;

pub struct ReceiptHasher;

impl ReceiptHasher {
    /// Derive the receipt for a cast at `instant`.
    pub fn generate(voter_id: VoterId, election_id: ElectionId, instant: Timestamp) -> ReceiptHash {
        let preimage = format!("{}-{}-{}", voter_id, election_id, instant.as_nanos());
        ReceiptHash::new(sha256(preimage.as_bytes()))
    }

    /// Hex form, as returned to clients.
    pub fn generate_hex(voter_id: VoterId, election_id: ElectionId, instant: Timestamp) -> String {
        Self::generate(voter_id, election_id, instant).to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_documented_preimage() {
        let instant = Timestamp::from_nanos(1_700_000_000_123_456_789);
        let receipt = ReceiptHasher::generate(VoterId::new(12), ElectionId::new(3), instant);
        assert_eq!(*receipt.as_bytes(), sha256(b"12-3-1700000000123456789"));
    }

    #[test]
    fn hex_is_64_lowercase_chars() {
        let hex = ReceiptHasher::generate_hex(VoterId::new(1), ElectionId::new(1), Timestamp::from_secs(1));
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn one_nanosecond_changes_the_receipt() {
        let t = Timestamp::from_nanos(1_000);
        let a = ReceiptHasher::generate(VoterId::new(1), ElectionId::new(1), t);
        let b = ReceiptHasher::generate(VoterId::new(1), ElectionId::new(1), Timestamp::from_nanos(1_001));
        assert_ne!(a, b);
    }

    #[test]
    fn voter_and_election_are_delimited() {
        // "1-23-..." and "12-3-..." must not collide.
        let t = Timestamp::from_nanos(5);
        let a = ReceiptHasher::generate(VoterId::new(1), ElectionId::new(23), t);
        let b = ReceiptHasher::generate(VoterId::new(12), ElectionId::new(3), t);
        assert_ne!(a, b);
    }
}
