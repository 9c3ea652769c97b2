//! Business logic services.

#![allow(missing_docs)]

pub mod admin_review;
pub mod auto_report;
pub mod bot_verification;
pub mod content;
pub mod content_ref;
pub mod lexicon;
pub mod moderation_log;
pub mod report;
pub mod submission_guard;
pub mod user;

pub use admin_review::{AdminReviewService, DeleteOutcome, ReviewItem};
pub use auto_report::AutoReporter;
pub use bot_verification::{BotVerifier, DisabledVerifier, TurnstileVerifier, verifier_from_config};
pub use content::{
    ContentService, CreateMessageInput, CreatePostInput, CreateReplyInput, Submission,
    UpdatePostInput, UpdateReplyInput,
};
pub use content_ref::{ContentRef, ContentSnapshot, ContentStore};
pub use lexicon::Lexicon;
pub use moderation_log::ModerationLogService;
pub use report::{AUTO_REPORT_REASON, CreateReportInput, ReasonCode, ReportReason, ReportService};
pub use submission_guard::{Screened, SubmissionGuard};
pub use user::{Identity, UserService};
