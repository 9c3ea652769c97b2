//! Post endpoints.

use axum::{Json, Router, extract::State, routing::post};
use hushboard_common::AppResult;
use hushboard_core::{CreatePostInput, UpdatePostInput};
use hushboard_db::entities::post;
use serde::{Deserialize, Serialize};

use super::verify_guest;
use crate::{
    extractors::{AuthUser, ClientIp},
    middleware::AppState,
    response::{ApiResponse, Submitted},
};

// ==================== Request/Response Types ====================

/// Post response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub board: String,
    pub title: String,
    pub content: String,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: String,
    pub edited_at: Option<String>,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            board: p.board,
            title: p.title,
            content: p.content,
            like_count: p.like_count,
            comment_count: p.comment_count,
            created_at: p.created_at.to_rfc3339(),
            edited_at: p.edited_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(flatten)]
    pub input: CreatePostInput,
    /// Bot-verification token, required for guest sessions.
    pub bot_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIdRequest {
    pub post_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsRequest {
    pub board: Option<String>,
    pub limit: Option<u64>,
    pub until_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub post_id: String,
    pub like_count: i32,
}

// ==================== Handlers ====================

async fn create(
    AuthUser(user): AuthUser,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<Submitted<PostResponse>>> {
    verify_guest(&state, &user, req.bot_token.as_deref(), ip.as_deref()).await?;

    let submission = state.content_service.create_post(&user.id, req.input).await?;

    Ok(ApiResponse::ok(submission.into()))
}

async fn show(
    State(state): State<AppState>,
    Json(req): Json<PostIdRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.content_service.get_post(&req.post_id).await?;

    Ok(ApiResponse::ok(post.into()))
}

async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListPostsRequest>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state
        .content_service
        .list_posts(req.board.as_deref(), req.limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<Submitted<PostResponse>>> {
    let submission = state.content_service.edit_post(&user.id, input).await?;

    Ok(ApiResponse::ok(submission.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PostIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .content_service
        .delete_own_post(&user.id, &req.post_id)
        .await?;

    Ok(ApiResponse::ok(()))
}

async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PostIdRequest>,
) -> AppResult<ApiResponse<LikeResponse>> {
    let like_count = state.content_service.like_post(&user.id, &req.post_id).await?;

    Ok(ApiResponse::ok(LikeResponse {
        post_id: req.post_id,
        like_count,
    }))
}

async fn unlike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PostIdRequest>,
) -> AppResult<ApiResponse<LikeResponse>> {
    let like_count = state
        .content_service
        .unlike_post(&user.id, &req.post_id)
        .await?;

    Ok(ApiResponse::ok(LikeResponse {
        post_id: req.post_id,
        like_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/update", post(update))
        .route("/delete", post(delete))
        .route("/like", post(like))
        .route("/unlike", post(unlike))
}
