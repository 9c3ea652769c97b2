//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hushboard_core::Submission;
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Newly created or edited content, with the screening outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitted<T: Serialize> {
    #[serde(flatten)]
    pub item: T,
    pub was_filtered: bool,
}

impl<M, T> From<Submission<M>> for Submitted<T>
where
    T: From<M> + Serialize,
{
    fn from(submission: Submission<M>) -> Self {
        Self {
            item: submission.item.into(),
            was_filtered: submission.was_filtered,
        }
    }
}
