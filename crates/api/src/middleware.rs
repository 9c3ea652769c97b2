//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hushboard_core::{
    AdminReviewService, BotVerifier, ContentService, ReportService, UserService,
};
use tracing::debug;

use crate::identity::TokenVerifier;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub content_service: ContentService,
    pub report_service: ReportService,
    pub admin_review_service: AdminReviewService,
    pub bot_verifier: Arc<dyn BotVerifier>,
    pub token_verifier: TokenVerifier,
}

/// Authentication middleware.
///
/// A valid bearer token provisions (or refreshes) the user row and attaches
/// it to the request. Requests without a usable token continue
/// unauthenticated; handlers that need a user reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.token_verifier.verify(token) {
            Ok(identity) => match state.user_service.ensure_user(&identity).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(e) => return e.into_response(),
            },
            Err(e) => debug!(error = %e, "Ignoring invalid identity token"),
        }
    }

    next.run(req).await
}
