//! Admin moderation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use hushboard_common::AppResult;
use hushboard_core::{ContentSnapshot, DeleteOutcome, ReviewItem};
use hushboard_db::entities::moderation_log::{self, ModerationAction};
use serde::{Deserialize, Serialize};

use super::reports::ReportResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// A pending report with its live content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItemResponse {
    pub report: ReportResponse,
    pub content: Option<ContentSnapshot>,
}

impl From<ReviewItem> for ReviewItemResponse {
    fn from(item: ReviewItem) -> Self {
        Self {
            report: item.report.into(),
            content: item.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcomeResponse {
    pub report: ReportResponse,
    pub content_removed: bool,
}

impl From<DeleteOutcome> for DeleteOutcomeResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            report: outcome.report.into(),
            content_removed: outcome.content_removed,
        }
    }
}

/// Moderation log entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryResponse {
    pub id: String,
    pub admin_id: String,
    pub action: ModerationAction,
    pub target_id: String,
    pub details: String,
    pub logged_at: String,
}

impl From<moderation_log::Model> for LogEntryResponse {
    fn from(entry: moderation_log::Model) -> Self {
        Self {
            id: entry.id,
            admin_id: entry.admin_id,
            action: entry.action,
            target_id: entry.target_id,
            details: entry.details,
            logged_at: entry.logged_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub reports: Vec<ReportResponse>,
    pub logs: Vec<LogEntryResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIdRequest {
    pub report_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIdRequest {
    pub target_id: String,
}

// ==================== Handlers ====================

async fn pending(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReviewItemResponse>>> {
    let items = state
        .admin_review_service
        .list_pending_reviews(&user.id)
        .await?;

    Ok(ApiResponse::ok(items.into_iter().map(Into::into).collect()))
}

async fn keep(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReportIdRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .admin_review_service
        .keep(&user.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReportIdRequest>,
) -> AppResult<ApiResponse<DeleteOutcomeResponse>> {
    let outcome = state
        .admin_review_service
        .delete(&user.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(outcome.into()))
}

async fn history(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<TargetIdRequest>,
) -> AppResult<ApiResponse<HistoryResponse>> {
    let (reports, logs) = state
        .admin_review_service
        .history(&user.id, &req.target_id)
        .await?;

    Ok(ApiResponse::ok(HistoryResponse {
        reports: reports.into_iter().map(Into::into).collect(),
        logs: logs.into_iter().map(Into::into).collect(),
    }))
}

async fn logs(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LogEntryResponse>>> {
    let entries = state.admin_review_service.list_logs(&user.id).await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/pending", post(pending))
        .route("/reports/keep", post(keep))
        .route("/reports/delete", post(delete))
        .route("/reports/history", post(history))
        .route("/logs", post(logs))
}
