use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::approval::RejectionReasonCode;
use super::domain::{MatchId, NotificationChannel, ProfessionalId, RegistrantId, UserId};
use super::scoring::SearchCriteria;
use super::service::{CandidacyRequest, MarketplaceService, ServiceError};
use super::store::{MarketplaceStore, NotificationDispatcher, StoreError};

/// Router exposing the marketplace engine over HTTP.
pub fn marketplace_router<S, D>(service: Arc<MarketplaceService<S, D>>) -> Router
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/marketplace/search", post(search_handler::<S, D>))
        .route(
            "/api/v1/marketplace/candidacies",
            post(apply_handler::<S, D>),
        )
        .route(
            "/api/v1/marketplace/candidacies/:professional_id/quota",
            get(quota_handler::<S, D>),
        )
        .route("/api/v1/marketplace/hires", post(hire_handler::<S, D>))
        .route(
            "/api/v1/marketplace/registrants/:registrant_id/approve",
            post(approve_handler::<S, D>),
        )
        .route(
            "/api/v1/marketplace/registrants/:registrant_id/reject",
            post(reject_handler::<S, D>),
        )
        .route(
            "/api/v1/marketplace/registrants/:registrant_id/notices",
            post(notice_handler::<S, D>),
        )
        .with_state(service)
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        ServiceError::DuplicateCandidacy | ServiceError::DuplicateContract => StatusCode::CONFLICT,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &err {
        ServiceError::RateLimitExceeded { limit, used } => json!({
            "error": err.to_string(),
            "limit": limit,
            "used": used,
            "remaining": 0,
        }),
        _ => json!({ "error": err.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn search_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    axum::Json(criteria): axum::Json<SearchCriteria>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    match service.rank_candidates(&criteria) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    axum::Json(request): axum::Json<CandidacyRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    match service.apply(request, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quota_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    Path(professional_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    let id = ProfessionalId(professional_id);
    match service.candidacy_quota(&id, Utc::now()) {
        Ok(quota) => (StatusCode::OK, axum::Json(quota)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HireRequest {
    pub(crate) match_id: MatchId,
}

pub(crate) async fn hire_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    axum::Json(request): axum::Json<HireRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    match service.confirm_hire(&request.match_id, Utc::now()) {
        Ok(contract) => (StatusCode::CREATED, axum::Json(contract)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApproveRequest {
    pub(crate) admin_id: UserId,
}

pub(crate) async fn approve_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    Path(registrant_id): Path<String>,
    axum::Json(request): axum::Json<ApproveRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    let id = RegistrantId(registrant_id);
    match service.approve_registrant(&id, &request.admin_id, Utc::now()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.review)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    #[serde(default)]
    pub(crate) reason_codes: Vec<RejectionReasonCode>,
    #[serde(default)]
    pub(crate) free_text: String,
}

pub(crate) async fn reject_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    Path(registrant_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    let id = RegistrantId(registrant_id);
    match service.reject_registrant(&id, &request.reason_codes, &request.free_text) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.review)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoticeRequest {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) channels: Vec<NotificationChannel>,
}

pub(crate) async fn notice_handler<S, D>(
    State(service): State<Arc<MarketplaceService<S, D>>>,
    Path(registrant_id): Path<String>,
    axum::Json(request): axum::Json<NoticeRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
    D: NotificationDispatcher + 'static,
{
    let id = RegistrantId(registrant_id);
    match service.notify_registrant(&id, &request.title, &request.message, request.channels) {
        Ok(notification) => (StatusCode::ACCEPTED, axum::Json(notification)).into_response(),
        Err(err) => error_response(err),
    }
}
