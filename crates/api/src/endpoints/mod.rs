//! API endpoints.

mod admin;
mod messages;
mod posts;
mod replies;
mod reports;

use axum::Router;
use hushboard_common::AppResult;
use hushboard_core::BotVerifier;
use hushboard_db::entities::user;

use crate::middleware::AppState;

pub use admin::{DeleteOutcomeResponse, LogEntryResponse, ReviewItemResponse};
pub use messages::MessageResponse;
pub use posts::PostResponse;
pub use replies::ReplyResponse;
pub use reports::ReportResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/posts", posts::router())
        .nest("/posts/replies", replies::router())
        .nest("/messages", messages::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
}

/// Bot verification is only demanded of guest sessions.
async fn verify_guest(
    state: &AppState,
    user: &user::Model,
    token: Option<&str>,
    remote_ip: Option<&str>,
) -> AppResult<()> {
    if user.is_anonymous {
        state.bot_verifier.verify(token, remote_ip).await?;
    }
    Ok(())
}
