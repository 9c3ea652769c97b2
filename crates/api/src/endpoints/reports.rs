//! User report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use hushboard_common::AppResult;
use hushboard_core::CreateReportInput;
use hushboard_db::entities::report;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Report response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub target_id: String,
    pub target_type: String,
    pub parent_id: Option<String>,
    pub reason: String,
    pub reporter_id: Option<String>,
    pub status: report::ReportStatus,
    pub created_at: String,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<String>,
}

impl From<report::Model> for ReportResponse {
    fn from(r: report::Model) -> Self {
        Self {
            id: r.id,
            target_id: r.target_id,
            target_type: r.target_type.as_str().to_string(),
            parent_id: r.parent_id,
            reason: r.reason,
            reporter_id: r.reporter_id,
            status: r.status,
            created_at: r.created_at.to_rfc3339(),
            resolved_by: r.resolved_by,
            resolved_at: r.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.submit(&user.id, input).await?;

    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(create))
}
