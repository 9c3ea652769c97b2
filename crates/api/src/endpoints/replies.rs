//! Reply endpoints.

use axum::{Json, Router, extract::State, routing::post};
use hushboard_common::AppResult;
use hushboard_core::{CreateReplyInput, UpdateReplyInput};
use hushboard_db::entities::reply;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Submitted},
};

/// Reply response. Deleted replies carry the tombstone text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: String,
    pub edited_at: Option<String>,
}

impl From<reply::Model> for ReplyResponse {
    fn from(r: reply::Model) -> Self {
        Self {
            id: r.id,
            post_id: r.post_id,
            user_id: r.user_id,
            content: r.content,
            is_deleted: r.is_deleted,
            created_at: r.created_at.to_rfc3339(),
            edited_at: r.edited_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRepliesRequest {
    pub post_id: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyIdRequest {
    pub reply_id: String,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReplyInput>,
) -> AppResult<ApiResponse<Submitted<ReplyResponse>>> {
    let submission = state.content_service.create_reply(&user.id, input).await?;

    Ok(ApiResponse::ok(submission.into()))
}

async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRepliesRequest>,
) -> AppResult<ApiResponse<Vec<ReplyResponse>>> {
    let replies = state
        .content_service
        .list_replies(&req.post_id, req.limit)
        .await?;

    Ok(ApiResponse::ok(replies.into_iter().map(Into::into).collect()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateReplyInput>,
) -> AppResult<ApiResponse<Submitted<ReplyResponse>>> {
    let submission = state.content_service.edit_reply(&user.id, input).await?;

    Ok(ApiResponse::ok(submission.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReplyIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .content_service
        .delete_own_reply(&user.id, &req.reply_id)
        .await?;

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
