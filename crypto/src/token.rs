//! Signed bearer tokens.
//!
//! Wire form: `hex(claims_json) "." hex(hmac_sha256(secret, claims_json))`.
//! The claims carry everything the authorization boundary needs to build a
//! caller context without a storage round-trip: subject id, role, the
//! permission list of every role assigned to a staff account, and expiry.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use evote_types::{Role, Timestamp};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired at {0}")]
    Expired(u64),

    #[error("token encoding error: {0}")]
    Encoding(String),
}

/// The identity carried by a bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Voter id for `VOTER`, staff/admin account id otherwise.
    pub sub: u64,
    pub role: Role,
    /// Comma-joined permission names, one entry per assigned staff role.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry, Unix seconds.
    pub exp: u64,
}

/// Issues and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let payload =
            serde_json::to_vec(claims).map_err(|e| TokenError::Encoding(e.to_string()))?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(signature)))
    }

    /// Check signature then expiry, in that order, and return the claims.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<TokenClaims, TokenError> {
        let (payload_hex, signature_hex) =
            token.trim().split_once('.').ok_or(TokenError::Malformed)?;
        if payload_hex.is_empty() || signature_hex.is_empty() {
            return Err(TokenError::Malformed);
        }
        let payload = hex::decode(payload_hex).map_err(|_| TokenError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if now.as_secs() >= claims.exp {
            return Err(TokenError::Expired(claims.exp));
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: u64) -> TokenClaims {
        TokenClaims {
            sub: 7,
            role: Role::Staff,
            roles: vec!["register_voter,view_results".to_string()],
            exp,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new("s3cret");
        let token = signer.issue(&claims(2_000)).unwrap();
        let back = signer.verify(&token, Timestamp::from_secs(1_000)).unwrap();
        assert_eq!(back, claims(2_000));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenSigner::new("a").issue(&claims(2_000)).unwrap();
        let err = TokenSigner::new("b")
            .verify(&token, Timestamp::from_secs(1_000))
            .unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new("s3cret");
        let token = signer.issue(&claims(2_000)).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let mut forged = claims(2_000);
        forged.role = Role::SuperAdmin;
        let forged_payload = hex::encode(serde_json::to_vec(&forged).unwrap());
        let err = signer
            .verify(&format!("{forged_payload}.{sig}"), Timestamp::from_secs(1_000))
            .unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn expiry_is_enforced() {
        let signer = TokenSigner::new("s3cret");
        let token = signer.issue(&claims(2_000)).unwrap();
        assert_eq!(
            signer.verify(&token, Timestamp::from_secs(2_000)).unwrap_err(),
            TokenError::Expired(2_000)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let signer = TokenSigner::new("s3cret");
        for bad in ["", "nodot", "zz.zz", "abcd."] {
            assert_eq!(
                signer.verify(bad, Timestamp::EPOCH).unwrap_err(),
                TokenError::Malformed,
                "{bad}"
            );
        }
    }
}
