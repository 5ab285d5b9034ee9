// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP server for the clinic case engine.
//!
//! Every route authenticates the acting staff member, runs exactly one
//! `clinica-api` operation against the shared store and returns its
//! response as JSON. Failures are mapped onto HTTP status codes with the
//! user-facing message preserved.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use clinica_api::{
    AdvanceItemStatusRequest, ApiError, AssignEvaluatorRequest, AuthenticatedActor,
    AuthenticationService, AwaitingPaymentReportResponse, CaseCommandResponse,
    CaseSummaryResponse, CreateItemRequest, CreateItemResponse, FinalizeCaseResponse,
    InstallmentInfo, ItemCommandResponse, OpenCaseRequest, OpenCaseResponse,
    RegisterPaymentRequest, RegisterPaymentResponse, RegisterProportionalPaymentRequest,
    RequestTransitionRequest, ScheduleInstallmentsRequest, ScheduleInstallmentsResponse,
    SettleInstallmentRequest, SettlementDetail, UpdateItemExecutorRequest, advance_item_status,
    assign_evaluator, awaiting_payment_report, create_item, finalize_case, get_case_summary,
    open_case, register_payment, register_payment_proportional, remove_item, request_transition,
    schedule_installments, settle_installment, update_item_executor,
};
use clinica_audit::Cause;
use clinica_persistence::Persistence;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. Uses an in-memory database when omitted.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind to.
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store, serialized behind one async lock.
    persistence: Arc<Mutex<Persistence>>,
}

/// Who is acting and why. Carried by every mutating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActorApiRequest {
    /// Staff id of the acting user.
    actor_id: i64,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

impl ActorApiRequest {
    fn into_cause(self) -> Cause {
        Cause::new(self.cause_id, self.cause_description)
    }
}

/// A mutating request: the actor fields next to the operation's own fields.
#[derive(Debug, Clone, Deserialize)]
struct CommandEnvelope<T> {
    #[serde(flatten)]
    actor: ActorApiRequest,
    #[serde(flatten)]
    request: T,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Balance detail when a case could not be closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settlement: Option<SettlementDetail>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    settlement: Option<SettlementDetail>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            settlement: self.settlement,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::PreconditionFailed { .. }
            | ApiError::OverAllocation { .. }
            | ApiError::PolicyViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %err, "Request failed");
        }
        let settlement: Option<SettlementDetail> = match &err {
            ApiError::PreconditionFailed { settlement, .. } => settlement.clone(),
            _ => None,
        };
        Self {
            status,
            message: err.to_string(),
            settlement,
        }
    }
}

/// Resolves the acting staff member against the identity records.
fn authenticate(
    persistence: &mut Persistence,
    actor: &ActorApiRequest,
) -> Result<AuthenticatedActor, HttpError> {
    AuthenticationService::authenticate(persistence, actor.actor_id).map_err(HttpError::from)
}

/// Handler for POST `/cases`.
async fn handle_open_case(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandEnvelope<OpenCaseRequest>>,
) -> Result<Json<OpenCaseResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        client_id = req.request.client_id,
        "Handling open_case request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: OpenCaseResponse = open_case(
        &mut *persistence,
        req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/evaluator`.
async fn handle_assign_evaluator(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<AssignEvaluatorRequest>>,
) -> Result<Json<CaseCommandResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        evaluator_id = req.request.evaluator_id,
        "Handling assign_evaluator request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: CaseCommandResponse = assign_evaluator(
        &mut *persistence,
        case_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/transition`.
async fn handle_request_transition(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<RequestTransitionRequest>>,
) -> Result<Json<CaseCommandResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        target = %req.request.target,
        "Handling request_transition request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: CaseCommandResponse = request_transition(
        &mut *persistence,
        case_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/finalize`.
///
/// Closes the case and generates its commissions.
async fn handle_finalize_case(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<FinalizeCaseResponse>, HttpError> {
    info!(actor_id = req.actor_id, case_id, "Handling finalize_case request");

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req)?;
    let response: FinalizeCaseResponse = finalize_case(
        &mut *persistence,
        case_id,
        &actor,
        req.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/items`.
async fn handle_create_item(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<CreateItemRequest>>,
) -> Result<Json<CreateItemResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        procedure_id = req.request.procedure_id,
        "Handling create_item request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: CreateItemResponse = create_item(
        &mut *persistence,
        case_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/cases/{case_id}/items/{item_id}`.
async fn handle_remove_item(
    AxumState(app_state): AxumState<AppState>,
    Path((case_id, item_id)): Path<(i64, i64)>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<CaseCommandResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        case_id, item_id, "Handling remove_item request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req)?;
    let response: CaseCommandResponse = remove_item(
        &mut *persistence,
        case_id,
        item_id,
        &actor,
        req.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/items/{item_id}/executor`.
async fn handle_update_item_executor(
    AxumState(app_state): AxumState<AppState>,
    Path((case_id, item_id)): Path<(i64, i64)>,
    Json(req): Json<CommandEnvelope<UpdateItemExecutorRequest>>,
) -> Result<Json<ItemCommandResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        item_id,
        executor_id = req.request.executor_id,
        "Handling update_item_executor request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: ItemCommandResponse = update_item_executor(
        &mut *persistence,
        case_id,
        item_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/items/{item_id}/status`.
async fn handle_advance_item_status(
    AxumState(app_state): AxumState<AppState>,
    Path((case_id, item_id)): Path<(i64, i64)>,
    Json(req): Json<CommandEnvelope<AdvanceItemStatusRequest>>,
) -> Result<Json<ItemCommandResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        item_id,
        status = %req.request.status,
        "Handling advance_item_status request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: ItemCommandResponse = advance_item_status(
        &mut *persistence,
        case_id,
        item_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/payments`.
///
/// The request carries an explicit allocation line per item.
async fn handle_register_payment(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<RegisterPaymentRequest>>,
) -> Result<Json<RegisterPaymentResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        amount = %req.request.amount,
        lines = req.request.allocations.len(),
        "Handling register_payment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: RegisterPaymentResponse = register_payment(
        &mut *persistence,
        case_id,
        req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/payments/proportional`.
async fn handle_register_payment_proportional(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<RegisterProportionalPaymentRequest>>,
) -> Result<Json<RegisterPaymentResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        amount = %req.request.amount,
        "Handling register_payment_proportional request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: RegisterPaymentResponse = register_payment_proportional(
        &mut *persistence,
        case_id,
        req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cases/{case_id}/installments`.
async fn handle_schedule_installments(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
    Json(req): Json<CommandEnvelope<ScheduleInstallmentsRequest>>,
) -> Result<Json<ScheduleInstallmentsResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        case_id,
        count = req.request.count,
        "Handling schedule_installments request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: ScheduleInstallmentsResponse = schedule_installments(
        &mut *persistence,
        case_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/installments/{installment_id}/settle`.
async fn handle_settle_installment(
    AxumState(app_state): AxumState<AppState>,
    Path(installment_id): Path<i64>,
    Json(req): Json<CommandEnvelope<SettleInstallmentRequest>>,
) -> Result<Json<InstallmentInfo>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        installment_id,
        payment_id = req.request.payment_id,
        "Handling settle_installment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, &req.actor)?;
    let response: InstallmentInfo = settle_installment(
        &mut *persistence,
        installment_id,
        &req.request,
        &actor,
        req.actor.into_cause(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/cases/{case_id}`.
async fn handle_get_case_summary(
    AxumState(app_state): AxumState<AppState>,
    Path(case_id): Path<i64>,
) -> Result<Json<CaseSummaryResponse>, HttpError> {
    info!(case_id, "Handling get_case_summary request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CaseSummaryResponse = get_case_summary(&mut *persistence, case_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/reports/awaiting_payment`.
async fn handle_awaiting_payment_report(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<AwaitingPaymentReportResponse>, HttpError> {
    info!("Handling awaiting_payment_report request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AwaitingPaymentReportResponse = awaiting_payment_report(&mut *persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/cases", post(handle_open_case))
        .route("/cases/{case_id}", get(handle_get_case_summary))
        .route("/cases/{case_id}/evaluator", post(handle_assign_evaluator))
        .route("/cases/{case_id}/transition", post(handle_request_transition))
        .route("/cases/{case_id}/finalize", post(handle_finalize_case))
        .route("/cases/{case_id}/items", post(handle_create_item))
        .route("/cases/{case_id}/items/{item_id}", delete(handle_remove_item))
        .route(
            "/cases/{case_id}/items/{item_id}/executor",
            post(handle_update_item_executor),
        )
        .route(
            "/cases/{case_id}/items/{item_id}/status",
            post(handle_advance_item_status),
        )
        .route("/cases/{case_id}/payments", post(handle_register_payment))
        .route(
            "/cases/{case_id}/payments/proportional",
            post(handle_register_payment_proportional),
        )
        .route(
            "/cases/{case_id}/installments",
            post(handle_schedule_installments),
        )
        .route(
            "/installments/{installment_id}/settle",
            post(handle_settle_installment),
        )
        .route(
            "/reports/awaiting_payment",
            get(handle_awaiting_payment_report),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing clinic case server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
