//! Caller identity, resolved once per request from the bearer token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use thiserror::Error;

use evote_crypto::{TokenClaims, TokenError};
use evote_types::{Capability, PermissionSet, Role, VoterId};

use crate::error::RpcError;
use crate::state::AppState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    Missing,

    #[error("invalid token: {0}")]
    Invalid(TokenError),

    #[error("permission denied: {0:?} required")]
    Forbidden(Capability),

    #[error("only voter accounts may do this")]
    NotAVoter,
}

/// Who is calling and what they may do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: u64,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl AuthContext {
    pub fn from_claims(claims: &TokenClaims) -> Self {
        let (permissions, unknown) =
            PermissionSet::from_role_lists(claims.roles.iter().map(String::as_str));
        if !unknown.is_empty() {
            tracing::debug!(subject = claims.sub, ?unknown, "ignoring unknown permissions");
        }
        Self {
            subject: claims.sub,
            role: claims.role,
            permissions,
        }
    }

    pub fn require(&self, capability: Capability) -> Result<(), AuthError> {
        if self.role.allows(self.permissions, capability) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(capability))
        }
    }

    /// Passes if any of `capabilities` is allowed; reports the first otherwise.
    pub fn require_any(&self, capabilities: &[Capability]) -> Result<(), AuthError> {
        match capabilities.iter().find(|c| self.require(**c).is_ok()) {
            Some(_) => Ok(()),
            None => Err(AuthError::Forbidden(
                capabilities.first().copied().unwrap_or(Capability::SuperAdmin),
            )),
        }
    }

    /// The voter id behind a voter-scoped call. Admin accounts have none,
    /// even though the super-admin bypass would let them past `require`.
    pub fn voter_id(&self) -> Result<VoterId, AuthError> {
        self.require(Capability::Voter)?;
        if self.role != Role::Voter {
            return Err(AuthError::NotAVoter);
        }
        Ok(VoterId::new(self.subject))
    }
}

fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts).ok_or(AuthError::Missing)?;
        let claims = state
            .signer
            .verify(token, state.clock.now())
            .map_err(AuthError::Invalid)?;
        Ok(Self::from_claims(&claims))
    }
}
