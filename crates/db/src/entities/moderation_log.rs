//! Moderation log entity. Rows are only ever inserted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Actor id recorded for automated actions.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// Logged moderation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationAction {
    #[sea_orm(string_value = "KEEP_CONTENT")]
    KeepContent,
    #[sea_orm(string_value = "DELETE_CONTENT")]
    DeleteContent,
    #[sea_orm(string_value = "AUTO_FLAG")]
    AutoFlag,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Admin uid, or [`SYSTEM_ACTOR`]
    pub admin_id: String,

    pub action: ModerationAction,

    /// Content id; may no longer exist
    #[sea_orm(indexed)]
    pub target_id: String,

    #[sea_orm(column_type = "Text")]
    pub details: String,

    /// Store timestamp, used for ordering
    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,

    /// RFC 3339 text captured by the writer, kept for display
    pub logged_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
