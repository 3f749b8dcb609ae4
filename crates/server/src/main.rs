// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod roster;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use live::{LiveEventBroadcaster, live_events_handler};
use minutes_vote_api::{
    AdvanceStatusRequest, ApiError, AuditTrailResponse, CastVoteRequest, CastVoteResponse, Clock,
    CloseVotingResponse, Collaborators, CreateMinutesRequest, ListMinutesResponse,
    MeetingDirectory, MinutesCapabilities, MinutesResponse, MinutesWorkflowService,
    NotificationSink, RejectMinutesRequest, RoleProvider, SweepResponse, SystemClock,
    WorkflowConfig,
};
use minutes_vote_audit::Cause;
use minutes_vote_domain::{Decision, MeetingId, MinutesId};
use minutes_vote_persistence::Persistence;
use roster::Roster;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Ten years.
const MAX_VOTE_WINDOW_HOURS: i64 = 87_600;

/// Minutes Vote Server - HTTP server for meeting minutes approval and voting
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON roster of users and meetings backing role and attendance lookups
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Conditional-save attempts before a write gives up
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    max_write_attempts: u32,

    /// Voting window applied when minutes are created without a deadline
    #[arg(
        long,
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=MAX_VOTE_WINDOW_HOURS)
    )]
    default_vote_window_hours: i64,

    /// Seconds between expiry sweeps. Expiry is still applied on access when unset.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: Option<u64>,
}

type SharedService = Arc<Mutex<MinutesWorkflowService<Persistence>>>;

/// Application state shared across handlers.
///
/// The workflow service owns the database connection, so it sits behind a
/// single async mutex.
#[derive(Clone)]
struct AppState {
    service: SharedService,
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

/// API request for creating minutes.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateMinutesApiRequest {
    /// The secretary creating the document.
    actor_id: String,
    #[serde(default)]
    cause_id: Option<String>,
    #[serde(default)]
    cause_description: Option<String>,
    title: String,
    content: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    vote_deadline: Option<OffsetDateTime>,
    #[serde(default)]
    decisions: Vec<Decision>,
}

/// API request for casting or replacing a ballot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CastVoteApiRequest {
    /// The voter.
    actor_id: String,
    #[serde(default)]
    cause_id: Option<String>,
    #[serde(default)]
    cause_description: Option<String>,
    vote_type: String,
    #[serde(default)]
    comment: Option<String>,
}

/// API request carrying only the acting user, used by close and approve.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorApiRequest {
    actor_id: String,
    #[serde(default)]
    cause_id: Option<String>,
    #[serde(default)]
    cause_description: Option<String>,
}

/// API request for rejecting minutes.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RejectMinutesApiRequest {
    actor_id: String,
    #[serde(default)]
    cause_id: Option<String>,
    #[serde(default)]
    cause_description: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// API request for an editorial status change.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AdvanceStatusApiRequest {
    actor_id: String,
    #[serde(default)]
    cause_id: Option<String>,
    #[serde(default)]
    cause_description: Option<String>,
    target_status: String,
}

/// Query string for capability lookups.
#[derive(Debug, Clone, Deserialize)]
struct ActorQuery {
    actor_id: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::VotingClosed { .. } => StatusCode::LOCKED,
            ApiError::NotEligible { .. } | ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::RetryExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %err, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %err, status = status.as_u16(), "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Builds the audit cause for a request, defaulting to a generic HTTP cause.
fn request_cause(
    cause_id: Option<String>,
    cause_description: Option<String>,
    operation: &str,
) -> Cause {
    Cause::new(
        cause_id.unwrap_or_else(|| String::from("http-request")),
        cause_description.unwrap_or_else(|| format!("HTTP {operation} request")),
    )
}

/// Handler for POST `/meetings/{meeting_id}/minutes` endpoint.
///
/// Opens a new minutes round for the meeting.
async fn handle_create_minutes(
    AxumState(app_state): AxumState<AppState>,
    Path(meeting_id): Path<i64>,
    Json(req): Json<CreateMinutesApiRequest>,
) -> Result<(StatusCode, Json<MinutesResponse>), HttpError> {
    info!(
        actor_id = %req.actor_id,
        meeting_id,
        "Handling create_minutes request"
    );

    let request: CreateMinutesRequest = CreateMinutesRequest {
        title: req.title,
        content: req.content,
        vote_deadline: req.vote_deadline,
        decisions: req.decisions,
    };
    let cause: Cause = request_cause(req.cause_id, req.cause_description, "create_minutes");

    let mut service = app_state.service.lock().await;
    let response: MinutesResponse =
        service.create_minutes(MeetingId::new(meeting_id), &req.actor_id, &request, cause)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/meetings/{meeting_id}/minutes` endpoint.
async fn handle_list_minutes(
    AxumState(app_state): AxumState<AppState>,
    Path(meeting_id): Path<i64>,
) -> Result<Json<ListMinutesResponse>, HttpError> {
    debug!(meeting_id, "Handling list_minutes request");

    let mut service = app_state.service.lock().await;
    let response: ListMinutesResponse = service.list_minutes(MeetingId::new(meeting_id))?;

    Ok(Json(response))
}

/// Handler for GET `/minutes/{minutes_id}` endpoint.
async fn handle_get_minutes(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
) -> Result<Json<MinutesResponse>, HttpError> {
    debug!(minutes_id, "Handling get_minutes request");

    let mut service = app_state.service.lock().await;
    let response: MinutesResponse = service.get_minutes(MinutesId::new(minutes_id))?;

    Ok(Json(response))
}

/// Handler for POST `/minutes/{minutes_id}/votes` endpoint.
///
/// Casts the caller's ballot, or replaces the one they already cast.
async fn handle_cast_vote(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Json(req): Json<CastVoteApiRequest>,
) -> Result<Json<CastVoteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        minutes_id,
        vote_type = %req.vote_type,
        "Handling cast_vote request"
    );

    let request: CastVoteRequest = CastVoteRequest {
        vote_type: req.vote_type,
        comment: req.comment,
    };
    let cause: Cause = request_cause(req.cause_id, req.cause_description, "cast_vote");

    let mut service = app_state.service.lock().await;
    let response: CastVoteResponse = service.cast_or_update_vote(
        MinutesId::new(minutes_id),
        &req.actor_id,
        &request,
        cause,
    )?;

    Ok(Json(response))
}

/// Handler for POST `/minutes/{minutes_id}/close` endpoint.
async fn handle_close_voting(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<CloseVotingResponse>, HttpError> {
    info!(actor_id = %req.actor_id, minutes_id, "Handling close_voting request");

    let cause: Cause = request_cause(req.cause_id, req.cause_description, "close_voting");

    let mut service = app_state.service.lock().await;
    let response: CloseVotingResponse =
        service.close_voting(MinutesId::new(minutes_id), &req.actor_id, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/minutes/{minutes_id}/approve` endpoint.
async fn handle_approve(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<MinutesResponse>, HttpError> {
    info!(actor_id = %req.actor_id, minutes_id, "Handling approve request");

    let cause: Cause = request_cause(req.cause_id, req.cause_description, "approve");

    let mut service = app_state.service.lock().await;
    let response: MinutesResponse =
        service.approve(MinutesId::new(minutes_id), &req.actor_id, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/minutes/{minutes_id}/reject` endpoint.
async fn handle_reject(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Json(req): Json<RejectMinutesApiRequest>,
) -> Result<Json<MinutesResponse>, HttpError> {
    info!(actor_id = %req.actor_id, minutes_id, "Handling reject request");

    let request: RejectMinutesRequest = RejectMinutesRequest { reason: req.reason };
    let cause: Cause = request_cause(req.cause_id, req.cause_description, "reject");

    let mut service = app_state.service.lock().await;
    let response: MinutesResponse =
        service.reject(MinutesId::new(minutes_id), &req.actor_id, &request, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/minutes/{minutes_id}/status` endpoint.
async fn handle_advance_status(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Json(req): Json<AdvanceStatusApiRequest>,
) -> Result<Json<MinutesResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        minutes_id,
        target_status = %req.target_status,
        "Handling advance_status request"
    );

    let request: AdvanceStatusRequest = AdvanceStatusRequest {
        target_status: req.target_status,
    };
    let cause: Cause = request_cause(req.cause_id, req.cause_description, "advance_status");

    let mut service = app_state.service.lock().await;
    let response: MinutesResponse =
        service.advance_status(MinutesId::new(minutes_id), &req.actor_id, &request, cause)?;

    Ok(Json(response))
}

/// Handler for GET `/minutes/{minutes_id}/audit` endpoint.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
) -> Result<Json<AuditTrailResponse>, HttpError> {
    debug!(minutes_id, "Handling audit_trail request");

    let mut service = app_state.service.lock().await;
    let response: AuditTrailResponse = service.audit_trail(MinutesId::new(minutes_id))?;

    Ok(Json(response))
}

/// Handler for GET `/minutes/{minutes_id}/capabilities` endpoint.
///
/// Reports which actions the given actor may take on the document right now.
async fn handle_capabilities(
    AxumState(app_state): AxumState<AppState>,
    Path(minutes_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<MinutesCapabilities>, HttpError> {
    debug!(actor_id = %query.actor_id, minutes_id, "Handling capabilities request");

    let mut service = app_state.service.lock().await;
    let response: MinutesCapabilities =
        service.capabilities(MinutesId::new(minutes_id), &query.actor_id)?;

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/meetings/{meeting_id}/minutes",
            post(handle_create_minutes).get(handle_list_minutes),
        )
        .route("/minutes/{minutes_id}", get(handle_get_minutes))
        .route("/minutes/{minutes_id}/votes", post(handle_cast_vote))
        .route("/minutes/{minutes_id}/close", post(handle_close_voting))
        .route("/minutes/{minutes_id}/approve", post(handle_approve))
        .route("/minutes/{minutes_id}/reject", post(handle_reject))
        .route("/minutes/{minutes_id}/status", post(handle_advance_status))
        .route("/minutes/{minutes_id}/audit", get(handle_audit_trail))
        .route(
            "/minutes/{minutes_id}/capabilities",
            get(handle_capabilities),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Wires the workflow service to its collaborators.
///
/// The roster answers both directory and role lookups; the live broadcaster
/// receives every published event.
fn build_app_state(persistence: Persistence, roster: Roster, config: WorkflowConfig) -> AppState {
    let roster: Arc<Roster> = Arc::new(roster);
    let broadcaster: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
    let collaborators: Collaborators = Collaborators {
        directory: Arc::clone(&roster) as Arc<dyn MeetingDirectory>,
        roles: roster as Arc<dyn RoleProvider>,
        clock: Arc::new(SystemClock) as Arc<dyn Clock>,
        notifications: Arc::clone(&broadcaster) as Arc<dyn NotificationSink>,
    };

    AppState {
        service: Arc::new(Mutex::new(MinutesWorkflowService::new(
            persistence,
            collaborators,
            config,
        ))),
        broadcaster,
    }
}

/// Runs one expiry sweep and logs its outcome.
async fn sweep_once(service: &SharedService) {
    let result: Result<SweepResponse, ApiError> = service.lock().await.close_expired_voting();
    match result {
        Ok(sweep) if sweep.closed.is_empty() && sweep.failed.is_empty() => {
            debug!("Expiry sweep found nothing to close");
        }
        Ok(sweep) => {
            info!(
                closed = sweep.closed.len(),
                failed = sweep.failed.len(),
                "Expiry sweep finished"
            );
        }
        Err(e) => {
            error!(error = %e, "Expiry sweep failed");
        }
    }
}

/// Periodically closes voting on rounds whose deadline has passed.
fn spawn_expiry_sweep(service: SharedService, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker: tokio::time::Interval = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sweep_once(&service).await;
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Minutes Vote Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let roster: Roster = if let Some(path) = &args.roster {
        Roster::from_file(path)?
    } else {
        warn!("No roster given; every meeting is unknown and every user is a member");
        Roster::default()
    };

    let config: WorkflowConfig = WorkflowConfig {
        default_vote_window: time::Duration::hours(args.default_vote_window_hours),
        max_write_attempts: args.max_write_attempts,
    };

    let app_state: AppState = build_app_state(persistence, roster, config);

    if let Some(secs) = args.sweep_interval_secs {
        info!(interval_secs = secs, "Starting expiry sweep");
        spawn_expiry_sweep(
            Arc::clone(&app_state.service),
            std::time::Duration::from_secs(secs),
        );
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
