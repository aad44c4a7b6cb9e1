//! Cryptographic primitives for evote.
//!
//! - **SHA-256** for vote receipts
//! - **HMAC-SHA256** for the bearer tokens that carry a caller's identity and role

pub mod hash;
pub mod receipt;
pub mod token;

pub use hash::{sha256, sha256_multi};
pub use receipt::ReceiptHasher;
pub use token::{TokenClaims, TokenError, TokenSigner};
