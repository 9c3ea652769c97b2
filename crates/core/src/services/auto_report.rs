//! Automatic reports for content the lexicon had to mask.

use hushboard_db::entities::{
    moderation_log::{ModerationAction, SYSTEM_ACTOR},
    report,
};
use tracing::warn;

use super::content_ref::ContentRef;
use super::moderation_log::ModerationLogService;
use super::report::{AUTO_REPORT_REASON, ReportService};

/// Files a pending report whenever screened content had to be masked.
#[derive(Clone)]
pub struct AutoReporter {
    report_service: ReportService,
    log_service: ModerationLogService,
}

impl AutoReporter {
    #[must_use]
    pub const fn new(report_service: ReportService, log_service: ModerationLogService) -> Self {
        Self {
            report_service,
            log_service,
        }
    }

    /// Queue `target` for review.
    ///
    /// The content is already stored when this runs, so a failure here is
    /// logged and dropped. The owner is recorded as the reporter.
    pub async fn flag(&self, owner_id: &str, target: &ContentRef) -> Option<report::Model> {
        let report = match self
            .report_service
            .create_report(target, AUTO_REPORT_REASON, Some(owner_id))
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    error = %e,
                    target_id = %target.id(),
                    target_type = %target.kind(),
                    "Failed to file automatic report"
                );
                return None;
            }
        };

        self.log_service
            .log_action(
                SYSTEM_ACTOR,
                ModerationAction::AutoFlag,
                target.id(),
                &format!("Type: {}, Report: {}", target.kind(), report.id),
            )
            .await;

        Some(report)
    }
}
