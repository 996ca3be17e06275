//! qp-dbbact: the dbBact wordcloud plugin for Qiita.
//!
//! This crate is the composition root. It loads `qp-dbbact.toml`, sets up
//! logging, builds the infrastructure adapters and hands them to
//! [`stages::WordcloudJob`].
//!
//! Two modes are supported:
//!
//! - `run`: artifacts come from a local JSON manifest and progress goes to
//!   the log.
//! - `qiita`: the job, its parameters and its artifacts come from a Qiita
//!   server, and progress is posted back to it.
//!
//! Either way the [`pipeline::JobOutcome`] is printed to stdout as JSON.
//!
//! ## Architectural Layer
//!
//! **Composition root.** Nothing else in the workspace picks concrete
//! adapters.

pub mod commands;
pub mod config;
pub mod registration;
pub mod telemetry;

pub use commands::{run_local, run_qiita, LogProgress, QiitaArgs, RunArgs};
pub use config::Config;
