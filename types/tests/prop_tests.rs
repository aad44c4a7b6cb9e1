use proptest::prelude::*;

use evote_types::{ElectionId, ElectionStatus, ReceiptHash, Timestamp};

proptest! {
    /// Past the end an election is always COMPLETED, whatever the flag.
    #[test]
    fn after_end_is_completed(start in 0u64..1_000_000, len in 0u64..1_000_000, past in 1u64..1_000_000, active: bool) {
        let start = Timestamp::from_secs(start);
        let end = start.plus_secs(len);
        let now = end.plus_secs(past);
        prop_assert_eq!(ElectionStatus::derive(now, start, end, active), ElectionStatus::Completed);
    }

    /// Before the end, the activation flag alone decides PAUSED.
    #[test]
    fn inactive_before_end_is_paused(start in 0u64..1_000_000, len in 0u64..1_000_000, offset in 0u64..2_000_000) {
        let start = Timestamp::from_secs(start);
        let end = start.plus_secs(len);
        let now = Timestamp::from_secs(offset);
        prop_assume!(now <= end);
        prop_assert_eq!(ElectionStatus::derive(now, start, end, false), ElectionStatus::Paused);
    }

    /// Derivation depends only on its inputs.
    #[test]
    fn derivation_is_deterministic(now: u64, start: u64, end: u64, active: bool) {
        let (now, start, end) = (Timestamp::from_nanos(now), Timestamp::from_nanos(start), Timestamp::from_nanos(end));
        prop_assert_eq!(
            ElectionStatus::derive(now, start, end, active),
            ElectionStatus::derive(now, start, end, active)
        );
    }

    /// Big-endian key bytes sort the same way as the ids.
    #[test]
    fn id_key_order_matches_numeric_order(a: u64, b: u64) {
        let (ka, kb) = (ElectionId::new(a).to_be_bytes(), ElectionId::new(b).to_be_bytes());
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    /// Any 32 bytes display as 64 hex chars that parse back to the same receipt.
    #[test]
    fn receipt_hex_parses_back(bytes in prop::array::uniform32(0u8..)) {
        let receipt = ReceiptHash::new(bytes);
        let text = receipt.to_string();
        prop_assert_eq!(text.len(), 64);
        prop_assert_eq!(text.parse::<ReceiptHash>().unwrap(), receipt);
    }

    /// Truncation never moves a timestamp forward and keeps the second.
    #[test]
    fn truncation_is_floor(nanos: u64) {
        let t = Timestamp::from_nanos(nanos);
        let truncated = t.truncate_to_secs();
        prop_assert!(truncated <= t);
        prop_assert_eq!(truncated.as_secs(), t.as_secs());
    }
}
