//! Qiita metadata service adapters.
//!
//! - [`QiitaClient`] talks to a Qiita server's REST API: it authenticates
//!   with OAuth client credentials, reads job parameters, describes input
//!   artifacts ([`pipeline::ArtifactSource`]) and posts step updates
//!   ([`pipeline::ProgressReporter`] through [`JobProgress`]).
//! - [`ManifestArtifactSource`] answers artifact lookups from a local JSON
//!   file so a run can happen without a Qiita server.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** The [`pipeline`] crate sees only the port traits.

mod client;
mod manifest;

pub use client::{JobInfo, JobProgress, QiitaClient, QiitaConfig, QiitaError};
pub use manifest::{ManifestArtifactSource, ManifestError};
