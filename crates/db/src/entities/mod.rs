//! Database entities.

pub mod message;
pub mod moderation_log;
pub mod post;
pub mod post_like;
pub mod reply;
pub mod report;
pub mod user;

pub use message::Entity as Message;
pub use moderation_log::Entity as ModerationLog;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use reply::Entity as Reply;
pub use report::Entity as Report;
pub use user::Entity as User;
