//! Anonymous message endpoints.

use axum::{Json, Router, extract::State, routing::post};
use hushboard_common::AppResult;
use hushboard_core::CreateMessageInput;
use hushboard_db::entities::message;
use serde::{Deserialize, Serialize};

use super::verify_guest;
use crate::{
    extractors::{AuthUser, ClientIp},
    middleware::AppState,
    response::{ApiResponse, Submitted},
};

/// Message response. The sender is never exposed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub recipient: String,
    pub content: String,
    pub created_at: String,
}

impl From<message::Model> for MessageResponse {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            recipient: m.recipient,
            content: m.content,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(flatten)]
    pub input: CreateMessageInput,
    pub bot_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesRequest {
    pub recipient: String,
    pub limit: Option<u64>,
}

async fn create(
    AuthUser(user): AuthUser,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> AppResult<ApiResponse<Submitted<MessageResponse>>> {
    verify_guest(&state, &user, req.bot_token.as_deref(), ip.as_deref()).await?;

    let submission = state
        .content_service
        .create_message(&user.id, req.input)
        .await?;

    Ok(ApiResponse::ok(submission.into()))
}

async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListMessagesRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .content_service
        .list_messages_for(&req.recipient, req.limit)
        .await?;

    Ok(ApiResponse::ok(messages.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
}
