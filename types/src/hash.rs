//! The vote receipt digest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A 32-byte receipt digest handed to the voter after a successful cast.
///
/// Displayed and parsed as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReceiptHash([u8; 32]);

impl ReceiptHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ReceiptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for ReceiptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for ReceiptHash {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 64 {
            return Err(TypesError::InvalidReceipt(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)
            .map_err(|e| TypesError::InvalidReceipt(e.to_string()))?;
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_hex() {
        let r = ReceiptHash::new([0xAB; 32]);
        assert_eq!(r.to_string(), "ab".repeat(32));
    }

    #[test]
    fn parse_accepts_uppercase() {
        let parsed: ReceiptHash = "AB".repeat(32).parse().unwrap();
        assert_eq!(parsed, ReceiptHash::new([0xAB; 32]));
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_hex() {
        assert!("abcd".parse::<ReceiptHash>().is_err());
        assert!("zz".repeat(32).parse::<ReceiptHash>().is_err());
    }
}
