//! Core business logic for hushboard.
//!
//! Everything that decides what happens to user-submitted text lives here:
//! lexicon screening, the report ledger, automatic flagging and the admin
//! review workflow.

pub mod services;

pub use services::*;
