// Copyright (c) 2026 Crozz Coin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! axum router over [`Ledger`].
//!
//! The acting principal is read from the `x-caller` header; authenticating it
//! is the job of whatever sits in front of this service. Every command result
//! is counted in [`Metrics`] and the ledger gauges are refreshed afterwards.
//!
//! Errors are returned as `{"error": <kind>, "message": <text>}`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::core::access::roles::{AdminUser, Permission, Role};
use crate::core::clock::Clock;
use crate::core::economics::staking::{StakeRecord, StakingPool};
use crate::core::governance::params::{GovernanceParams, ParamType};
use crate::core::governance::proposals::{
    ExecutionOutcome, Proposal, ProposalStatus, ProposalType, VoteRecord,
};
use crate::core::runtime::executor::{Ledger, LedgerError, LedgerEvent, LedgerStats};
use crate::core::state::persistent_state::ledger_commitment;
use crate::core::types::{Address, ProposalId, StakeRecordId, VoteRecordId};
use crate::monitoring::metrics::Metrics;

/// Header carrying the acting principal.
pub const CALLER_HEADER: &str = "x-caller";

/// Default page size for `/v1/events`.
const DEFAULT_EVENT_LIMIT: usize = 100;
const MAX_EVENT_LIMIT: usize = 1_000;

/// Shared handler state.
pub struct AppState<C: Clock> {
    /// Ledger facade.
    pub ledger: Arc<Ledger<C>>,
    /// Metrics registry.
    pub metrics: Arc<Metrics>,
}

type Shared<C> = Arc<AppState<C>>;

/// Build the router.
pub fn router<C: Clock + 'static>(ledger: Arc<Ledger<C>>, metrics: Arc<Metrics>) -> Router {
    let state: Shared<C> = Arc::new(AppState { ledger, metrics });
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text::<C>))
        .route("/v1/stakes", post(stake::<C>))
        .route("/v1/stakes/:id", get(get_stake::<C>))
        .route("/v1/stakes/:id/unstake", post(unstake::<C>))
        .route("/v1/stakes/:id/claim", post(claim::<C>))
        .route("/v1/accounts/:addr", get(account::<C>))
        .route("/v1/pool", get(pool::<C>))
        .route("/v1/pool/fund", post(fund_pool::<C>))
        .route(
            "/v1/proposals",
            post(create_proposal::<C>).get(list_proposals::<C>),
        )
        .route("/v1/proposals/:id", get(get_proposal::<C>))
        .route(
            "/v1/proposals/:id/votes",
            get(proposal_votes::<C>).post(vote::<C>),
        )
        .route("/v1/proposals/:id/finalize", post(finalize::<C>))
        .route("/v1/proposals/:id/execute", post(execute::<C>))
        .route("/v1/admins", get(list_admins::<C>).post(add_admin::<C>))
        .route(
            "/v1/admins/:addr",
            get(get_admin::<C>).delete(remove_admin::<C>),
        )
        .route("/v1/admins/:addr/role", put(update_role::<C>))
        .route("/v1/admins/:addr/permissions", put(set_permission::<C>))
        .route("/v1/params", get(all_params::<C>))
        .route(
            "/v1/params/:param",
            get(get_param::<C>).put(update_param::<C>),
        )
        .route("/v1/events", get(events::<C>))
        .route("/v1/state/root", get(state_root::<C>))
        .route("/v1/stats", get(stats::<C>))
        .with_state(state)
}

// ---- errors ----

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable kind, e.g. `NotOwner`.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Handler error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind,
            message: message.into(),
        }
    }
}

/// HTTP status for a ledger error kind.
pub fn status_for(kind: &str) -> StatusCode {
    match kind {
        "StakeNotFound" | "ProposalNotFound" | "AdminNotFound" => StatusCode::NOT_FOUND,
        "NotAdmin" | "PermissionDenied" | "NotOwner" => StatusCode::FORBIDDEN,
        "ProposalNotActive" | "ProposalExpired" | "AlreadyVoted" | "NotReady"
        | "ProposalNotPassed" | "LastSuperAdmin" | "RewardPoolExhausted" => StatusCode::CONFLICT,
        "Poisoned" => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let kind = e.kind();
        Self {
            status: status_for(kind),
            kind,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(kind = self.kind, message = %self.message, "api internal error");
        }
        let body = ErrorBody {
            error: self.kind.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---- caller identity ----

/// Principal named by the `x-caller` header.
#[derive(Clone, Copy, Debug)]
pub struct Caller(pub Address);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::bad_request("MissingCaller", "x-caller header required"))?;
        let text = raw
            .to_str()
            .map_err(|_| ApiError::bad_request("InvalidCaller", "x-caller is not ascii"))?;
        let addr = text
            .parse::<Address>()
            .map_err(|e| ApiError::bad_request("InvalidCaller", e.to_string()))?;
        Ok(Caller(addr))
    }
}

fn parse_addr(s: &str) -> Result<Address, ApiError> {
    s.parse::<Address>()
        .map_err(|e| ApiError::bad_request("InvalidAddress", e.to_string()))
}

fn parse_param(s: &str) -> Result<ParamType, ApiError> {
    s.parse::<ParamType>()
        .map_err(|e| ApiError::from(LedgerError::from(e)))
}

/// Count the command and refresh gauges.
fn track<C: Clock, T>(
    app: &Shared<C>,
    op: &'static str,
    res: Result<T, LedgerError>,
) -> Result<T, ApiError> {
    match res {
        Ok(v) => {
            app.metrics.command(op, None);
            if let Ok(s) = app.ledger.stats() {
                app.metrics.observe(&s);
            }
            Ok(v)
        }
        Err(e) => {
            app.metrics.command(op, Some(e.kind()));
            Err(e.into())
        }
    }
}

// ---- request/response bodies ----

/// `POST /v1/stakes`, `POST /v1/pool/fund`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Smallest units.
    pub amount: u64,
}

/// New id.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    /// Created id.
    pub id: u64,
}

/// `GET /v1/stakes/:id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StakeView {
    /// Record.
    pub record: StakeRecord,
    /// What a claim would pay now.
    pub claimable: u64,
}

/// `POST /v1/stakes/:id/unstake`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnstakeResponse {
    /// Returned principal.
    pub amount: u64,
    /// Rewards paid.
    pub rewards: u64,
}

/// `POST /v1/stakes/:id/claim`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Rewards paid.
    pub rewards: u64,
}

/// `GET /v1/accounts/:addr`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountView {
    /// Aggregate live stake.
    pub voting_power: u64,
    /// Live records.
    pub stakes: Vec<StakeRecord>,
    /// Admin role.
    pub role: Role,
}

/// `POST /v1/pool/fund`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Reward pool balance after funding.
    pub balance: u64,
}

/// `POST /v1/proposals`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProposalRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Kind and payload.
    pub proposal_type: ProposalType,
}

/// `GET /v1/proposals/:id/votes`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VotesView {
    /// Voting power for.
    pub votes_for: u64,
    /// Voting power against.
    pub votes_against: u64,
    /// Individual votes.
    pub votes: Vec<VoteRecord>,
}

/// `POST /v1/proposals/:id/votes`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    /// true = for.
    pub support: bool,
}

/// Vote receipt.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Vote id.
    pub vote_id: VoteRecordId,
}

/// `POST /v1/proposals/:id/finalize`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Status after finalization.
    pub status: ProposalStatus,
}

/// `POST /v1/admins`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddAdminRequest {
    /// New admin.
    pub address: Address,
    /// `admin` or `super_admin`.
    pub role: String,
}

/// `GET /v1/admins/:addr`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminView {
    /// Role (`user` for non-admins).
    pub role: Role,
    /// Record, if the principal is an admin.
    pub admin: Option<AdminUser>,
}

/// `PUT /v1/admins/:addr/role`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleRequest {
    /// New role.
    pub role: String,
}

/// `PUT /v1/admins/:addr/permissions`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionRequest {
    /// Permission tag.
    pub permission: String,
    /// Grant (true) or revoke (false).
    pub granted: bool,
}

/// Parameter value.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParamView {
    /// Parameter.
    pub param: ParamType,
    /// Value.
    pub value: u64,
}

/// `PUT /v1/params/:param`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParamUpdateRequest {
    /// New value.
    pub value: u64,
}

/// Parameter change receipt.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParamUpdateResponse {
    /// Parameter.
    pub param: ParamType,
    /// Previous value.
    pub old: u64,
    /// New value.
    pub new: u64,
}

/// `GET /v1/events` query.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Return events with `seq > since`.
    #[serde(default)]
    pub since: u64,
    /// Page size.
    pub limit: Option<usize>,
}

/// `GET /v1/state/root`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Hex Merkle root over ledger entities.
    pub root: String,
}

/// `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Package version.
    pub version: String,
    /// Git commit, when known at build time.
    pub git_sha: Option<String>,
    /// Build timestamp, when known.
    pub build_timestamp: Option<String>,
    /// rustc version, when known.
    pub rustc: Option<String>,
}

// ---- handlers ----

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: option_env!("VERGEN_GIT_SHA").map(str::to_string),
        build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP").map(str::to_string),
        rustc: option_env!("VERGEN_RUSTC_SEMVER").map(str::to_string),
    })
}

async fn metrics_text<C: Clock + 'static>(State(app): State<Shared<C>>) -> Response {
    if let Ok(s) = app.ledger.stats() {
        app.metrics.observe(&s);
    }
    match app.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "metrics render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn stake<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Json(req): Json<AmountRequest>,
) -> ApiResult<IdResponse> {
    let id = track(&app, "stake", app.ledger.stake(&caller, req.amount))?;
    Ok(Json(IdResponse { id: id.0 }))
}

async fn get_stake<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(id): Path<u64>,
) -> ApiResult<StakeView> {
    let (record, claimable) = app.ledger.stake_view(StakeRecordId(id))?;
    Ok(Json(StakeView { record, claimable }))
}

async fn unstake<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> ApiResult<UnstakeResponse> {
    let (amount, rewards) = track(
        &app,
        "unstake",
        app.ledger.unstake(&caller, StakeRecordId(id)),
    )?;
    Ok(Json(UnstakeResponse { amount, rewards }))
}

async fn claim<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> ApiResult<ClaimResponse> {
    let rewards = track(
        &app,
        "claim_rewards",
        app.ledger.claim_rewards(&caller, StakeRecordId(id)),
    )?;
    Ok(Json(ClaimResponse { rewards }))
}

async fn account<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(addr): Path<String>,
) -> ApiResult<AccountView> {
    let addr = parse_addr(&addr)?;
    let (voting_power, stakes, role) = app.ledger.account(&addr)?;
    Ok(Json(AccountView {
        voting_power,
        stakes,
        role,
    }))
}

async fn pool<C: Clock + 'static>(State(app): State<Shared<C>>) -> ApiResult<StakingPool> {
    Ok(Json(app.ledger.pool()?))
}

async fn fund_pool<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Json(req): Json<AmountRequest>,
) -> ApiResult<BalanceResponse> {
    let balance = track(
        &app,
        "fund_reward_pool",
        app.ledger.fund_reward_pool(&caller, req.amount),
    )?;
    Ok(Json(BalanceResponse { balance }))
}

async fn create_proposal<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Json(req): Json<CreateProposalRequest>,
) -> ApiResult<IdResponse> {
    let id = track(
        &app,
        "create_proposal",
        app.ledger
            .create_proposal(&caller, req.title, req.description, req.proposal_type),
    )?;
    Ok(Json(IdResponse { id: id.0 }))
}

async fn list_proposals<C: Clock + 'static>(
    State(app): State<Shared<C>>,
) -> ApiResult<Vec<Proposal>> {
    Ok(Json(app.ledger.list_proposals()?))
}

async fn get_proposal<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(id): Path<u64>,
) -> ApiResult<Proposal> {
    Ok(Json(app.ledger.get_proposal(ProposalId(id))?))
}

async fn proposal_votes<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(id): Path<u64>,
) -> ApiResult<VotesView> {
    let (votes_for, votes_against, votes) = app.ledger.proposal_votes(ProposalId(id))?;
    Ok(Json(VotesView {
        votes_for,
        votes_against,
        votes,
    }))
}

async fn vote<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<VoteResponse> {
    let vote_id = track(
        &app,
        "vote_on_proposal",
        app.ledger
            .vote_on_proposal(&caller, ProposalId(id), req.support),
    )?;
    Ok(Json(VoteResponse { vote_id }))
}

async fn finalize<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> ApiResult<StatusResponse> {
    let status = track(
        &app,
        "finalize_proposal",
        app.ledger.finalize_proposal(&caller, ProposalId(id)),
    )?;
    Ok(Json(StatusResponse { status }))
}

async fn execute<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> ApiResult<ExecutionOutcome> {
    let outcome = track(
        &app,
        "execute_proposal",
        app.ledger.execute_proposal(&caller, ProposalId(id)),
    )?;
    Ok(Json(outcome))
}

async fn list_admins<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
) -> ApiResult<Vec<AdminUser>> {
    Ok(Json(app.ledger.list_admins(&caller)?))
}

async fn add_admin<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Json(req): Json<AddAdminRequest>,
) -> Result<StatusCode, ApiError> {
    let role = req
        .role
        .parse::<Role>()
        .map_err(|e| ApiError::from(LedgerError::from(e)))?;
    track(
        &app,
        "add_admin",
        app.ledger.add_admin(&caller, req.address, role),
    )?;
    Ok(StatusCode::CREATED)
}

async fn get_admin<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(addr): Path<String>,
) -> ApiResult<AdminView> {
    let addr = parse_addr(&addr)?;
    let role = app.ledger.get_admin_role(&addr)?;
    let admin = match app.ledger.get_admin(&addr) {
        Ok(a) => Some(a),
        Err(e) if e.kind() == "AdminNotFound" => None,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(AdminView { role, admin }))
}

async fn remove_admin<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(addr): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target = parse_addr(&addr)?;
    track(&app, "remove_admin", app.ledger.remove_admin(&caller, &target))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_role<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(addr): Path<String>,
    Json(req): Json<RoleRequest>,
) -> Result<StatusCode, ApiError> {
    let target = parse_addr(&addr)?;
    let role = req
        .role
        .parse::<Role>()
        .map_err(|e| ApiError::from(LedgerError::from(e)))?;
    track(
        &app,
        "update_admin_role",
        app.ledger.update_admin_role(&caller, &target, role),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_permission<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(addr): Path<String>,
    Json(req): Json<PermissionRequest>,
) -> Result<StatusCode, ApiError> {
    let target = parse_addr(&addr)?;
    let permission = req
        .permission
        .parse::<Permission>()
        .map_err(|e| ApiError::from(LedgerError::from(e)))?;
    track(
        &app,
        "set_permission",
        app.ledger
            .set_permission(&caller, &target, permission, req.granted),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

async fn all_params<C: Clock + 'static>(
    State(app): State<Shared<C>>,
) -> ApiResult<GovernanceParams> {
    Ok(Json(app.ledger.params()?))
}

async fn get_param<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Path(param): Path<String>,
) -> ApiResult<ParamView> {
    let param = parse_param(&param)?;
    Ok(Json(ParamView {
        param,
        value: app.ledger.get_parameter_value(param)?,
    }))
}

async fn update_param<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Caller(caller): Caller,
    Path(param): Path<String>,
    Json(req): Json<ParamUpdateRequest>,
) -> ApiResult<ParamUpdateResponse> {
    let param = parse_param(&param)?;
    let old = track(
        &app,
        "update_governance_parameter",
        app.ledger
            .update_governance_parameter(&caller, param, req.value),
    )?;
    Ok(Json(ParamUpdateResponse {
        param,
        old,
        new: req.value,
    }))
}

async fn events<C: Clock + 'static>(
    State(app): State<Shared<C>>,
    Query(q): Query<EventsQuery>,
) -> ApiResult<Vec<LedgerEvent>> {
    let limit = q.limit.unwrap_or(DEFAULT_EVENT_LIMIT).min(MAX_EVENT_LIMIT);
    Ok(Json(app.ledger.events_since(q.since, limit)?))
}

async fn state_root<C: Clock + 'static>(State(app): State<Shared<C>>) -> ApiResult<RootResponse> {
    let state = app.ledger.snapshot()?;
    let root = ledger_commitment(&state).map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        kind: "Codec",
        message: e.to_string(),
    })?;
    Ok(Json(RootResponse {
        root: hex::encode(root),
    }))
}

async fn stats<C: Clock + 'static>(State(app): State<Shared<C>>) -> ApiResult<LedgerStats> {
    Ok(Json(app.ledger.stats()?))
}
