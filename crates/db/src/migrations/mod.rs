//! Database migrations.
//!
//! Schema migrations for the database. They stay within the subset of DDL
//! that both `PostgreSQL` and `SQLite` accept, so tests run them in memory.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_post_table;
mod m20250101_000003_create_post_like_table;
mod m20250101_000004_create_message_table;
mod m20250101_000005_create_reply_table;
mod m20250101_000006_create_report_table;
mod m20250101_000007_create_moderation_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_post_table::Migration),
            Box::new(m20250101_000003_create_post_like_table::Migration),
            Box::new(m20250101_000004_create_message_table::Migration),
            Box::new(m20250101_000005_create_reply_table::Migration),
            Box::new(m20250101_000006_create_report_table::Migration),
            Box::new(m20250101_000007_create_moderation_log_table::Migration),
        ]
    }
}
