//! Repositories: the store collaborator used by the services.
//!
//! Each repository owns one table and maps `DbErr` into
//! [`AppError::Database`](hushboard_common::AppError::Database).

mod message;
mod moderation_log;
mod post;
mod post_like;
mod reply;
mod report;
mod user;

pub use message::MessageRepository;
pub use moderation_log::ModerationLogRepository;
pub use post::PostRepository;
pub use post_like::PostLikeRepository;
pub use reply::ReplyRepository;
pub use report::ReportRepository;
pub use user::UserRepository;

/// Upper bound on ids bound into a single `IN (...)` query.
pub const MAX_IDS_PER_QUERY: usize = 30;

/// Split `ids` into de-duplicated batches of at most [`MAX_IDS_PER_QUERY`].
pub(crate) fn id_batches(ids: &[String]) -> Vec<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    let distinct: Vec<String> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    distinct
        .chunks(MAX_IDS_PER_QUERY)
        .map(<[String]>::to_vec)
        .collect()
}
