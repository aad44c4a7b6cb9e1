//! Route handlers and their wire shapes.

use std::collections::HashMap;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use evote_eligibility::EligibleElection;
use evote_store::{AuditEntry, AuditStore, CandidateStore, ElectionStore, StoreError};
use evote_types::{
    Capability, Candidate, CandidateId, ElectionId, Party, PartyId, Permission, ReceiptHash,
};

use crate::auth::AuthContext;
use crate::error::RpcError;
use crate::pagination::LimitParams;
use crate::state::AppState;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

// ── Elections ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ElectionView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub election_type: String,
    pub district: String,
    pub block: String,
    pub local_body_name: String,
    pub ward: String,
    pub start: u64,
    pub end: u64,
    pub status: &'static str,
}

impl From<EligibleElection> for ElectionView {
    fn from(e: EligibleElection) -> Self {
        let EligibleElection { election, status } = e;
        let j = election.jurisdiction;
        Self {
            id: election.id.get(),
            title: election.title,
            description: election.description,
            election_type: election.election_type.to_string(),
            district: j.district,
            block: j.block,
            local_body_name: j.local_body_name,
            ward: j.ward,
            start: election.starts_at.as_secs(),
            end: election.ends_at.as_secs(),
            status: status.as_str(),
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

/// Eligible elections for the calling voter, soonest-ending first.
pub async fn list_elections(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<Vec<ElectionView>>>, RpcError> {
    let voter_id = auth.voter_id()?;
    state.metrics.eligibility_requests.inc();

    let resolver = state.resolver.clone();
    let eligible = state
        .run_blocking(move |_| Ok(resolver.list_eligible_elections(voter_id)?))
        .await?;

    Ok(ApiResponse::ok(
        eligible.into_iter().map(ElectionView::from).collect(),
    ))
}

// ── Candidates ──────────────────────────────────────────────────────────

pub const INDEPENDENT: &str = "Independent";

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub id: u64,
    pub full_name: String,
    pub bio: String,
    pub photo: String,
    pub ward_number: String,
    pub party_name: String,
    pub party_logo: String,
}

impl CandidateView {
    fn new(candidate: Candidate, party: Option<&Party>) -> Self {
        Self {
            id: candidate.id.get(),
            full_name: candidate.full_name,
            bio: candidate.bio,
            photo: candidate.photo,
            ward_number: candidate.ward_number,
            party_name: party.map_or_else(|| INDEPENDENT.to_string(), |p| p.name.clone()),
            party_logo: party.map(|p| p.logo.clone()).unwrap_or_default(),
        }
    }
}

pub async fn list_candidates(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(election_id): Path<u64>,
) -> Result<Json<ApiResponse<Vec<CandidateView>>>, RpcError> {
    auth.require_any(&[
        Capability::Voter,
        Capability::Permission(Permission::ManageCandidates),
    ])?;
    let election_id = ElectionId::new(election_id);

    let store = state.store.clone();
    let views = state
        .run_blocking(move |_| {
            store.get_election(election_id)?;
            let candidates = store.candidates_for_election(election_id)?;

            let mut parties: HashMap<PartyId, Option<Party>> = HashMap::new();
            let mut views = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let party = match candidate.party_id {
                    Some(id) => {
                        if !parties.contains_key(&id) {
                            // A dangling party reference reads as independent.
                            let party = match store.get_party(id) {
                                Ok(p) => Some(p),
                                Err(StoreError::NotFound(_)) => None,
                                Err(e) => return Err(e.into()),
                            };
                            parties.insert(id, party);
                        }
                        parties.get(&id).and_then(Option::as_ref)
                    }
                    None => None,
                };
                views.push(CandidateView::new(candidate, party));
            }
            Ok(views)
        })
        .await?;

    Ok(ApiResponse::ok(views))
}

// ── Voting ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CastRequest {
    pub election_id: u64,
    pub candidate_id: u64,
}

#[derive(Debug, Serialize)]
pub struct CastResponse {
    pub message: String,
    pub receipt: String,
    pub election_title: String,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CastRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CastResponse>>, RpcError> {
    let voter_id = auth.voter_id()?;
    let Json(request) = payload.map_err(|e| RpcError::BadRequest(e.body_text()))?;
    let election_id = ElectionId::new(request.election_id);
    let candidate_id = CandidateId::new(request.candidate_id);

    let started = Instant::now();
    let caster = state.caster.clone();
    let result = state
        .run_blocking(move |cancel| {
            Ok(caster.cast_vote(voter_id, election_id, candidate_id, &cancel))
        })
        .await
        .inspect_err(|e| state.metrics.record_rejection(e.reason()))?;

    let outcome = result.map_err(|e| {
        state.metrics.record_rejection(e.reason());
        RpcError::from(e)
    })?;
    state.metrics.record_cast(started.elapsed());

    Ok(ApiResponse::ok(CastResponse {
        message: "Vote cast successfully".to_string(),
        receipt: outcome.receipt.to_hex(),
        election_title: outcome.election_title,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
    pub election_id: u64,
    pub timestamp: u64,
    pub status: &'static str,
}

/// Public receipt lookup. Reveals the election and the recorded second only.
pub async fn verify_receipt(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<ApiResponse<VerifyResponse>>, RpcError> {
    let hash = params
        .hash
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| RpcError::BadRequest("hash is required".to_string()))?;
    let receipt: ReceiptHash = hash
        .trim()
        .parse()
        .map_err(|_| RpcError::BadRequest("hash must be 64 hexadecimal characters".to_string()))?;

    let caster = state.caster.clone();
    let vote = state
        .run_blocking(move |_| Ok(caster.verify_receipt(&receipt)?))
        .await?;

    Ok(ApiResponse::ok(VerifyResponse {
        verified: true,
        election_id: vote.election_id.get(),
        timestamp: vote.cast_at.as_secs(),
        status: "Recorded",
    }))
}

// ── Audit ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuditLogView {
    pub seq: u64,
    pub action: String,
    pub actor_id: Option<u64>,
    pub actor_role: Option<String>,
    pub target_id: Option<u64>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub timestamp: u64,
}

impl From<AuditEntry> for AuditLogView {
    fn from(entry: AuditEntry) -> Self {
        let event = entry.event;
        Self {
            seq: entry.seq,
            action: event.action,
            actor_id: event.actor_id,
            actor_role: event.actor_role,
            target_id: event.target_id,
            metadata: event.metadata,
            timestamp: event.timestamp.as_secs(),
        }
    }
}

pub async fn audit_logs(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<LimitParams>,
) -> Result<Json<ApiResponse<Vec<AuditLogView>>>, RpcError> {
    auth.require(Capability::Permission(Permission::ViewAuditLogs))?;
    let limit = params.effective_limit();

    let store = state.store.clone();
    let entries = state
        .run_blocking(move |_| Ok(store.recent_audit(limit)?))
        .await?;

    Ok(ApiResponse::ok(
        entries.into_iter().map(AuditLogView::from).collect(),
    ))
}

// ── Metrics ─────────────────────────────────────────────────────────────

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, RpcError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| RpcError::Internal(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
