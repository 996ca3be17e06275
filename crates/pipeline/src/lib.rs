//! Core domain of the dbBact wordcloud plugin.
//!
//! This crate contains the domain types, the validation and selection rules,
//! the term color ramp, the static plugin manifest, and the port traits the
//! infrastructure crates implement. It performs no I/O.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ArtifactId`, `JobId`, `RunId`) |
//! | [`types`] | Value types (`Sequence`, `OccurrenceFraction`, `Timestamp`, ...) |
//! | [`errors`] | The run-ending error taxonomy |
//! | [`table`] | Sparse `FeatureTable` |
//! | [`artifact`] | Input artifact provenance and file listing |
//! | [`params`] | Run parameters and their parsing from orchestrator maps |
//! | [`validation`] | Provenance, file, and DNA checks |
//! | [`selection`] | Occurrence-fraction feature filter |
//! | [`enrichment`] | Score maps, term counts, database statistics |
//! | [`color`] | Term color ramp |
//! | [`cloud`] | Placed-word layout shared by both image encoders |
//! | [`manifest`] | Static plugin registration record |
//! | [`outcome`] | Result artifacts and the job outcome triple |
//! | [`ports`] | Traits implemented by infrastructure crates |

pub mod artifact;
pub mod cloud;
pub mod color;
pub mod enrichment;
pub mod errors;
pub mod identifiers;
pub mod manifest;
pub mod outcome;
pub mod params;
pub mod ports;
pub mod selection;
pub mod table;
pub mod types;
pub mod validation;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use artifact::ArtifactRecord;
pub use cloud::{CloudLayout, Orientation, PlacedWord};
pub use color::{term_color, ColorRamp, Rgb};
pub use enrichment::{DatabaseStats, EnrichmentScores, ScoreMap, TermCounts, MAX_TERM_COUNT};
pub use errors::WordcloudError;
pub use identifiers::{ArtifactId, JobId, RunId};
pub use manifest::{OutputFile, OutputLayout, PluginManifest, DBBACT_PLUGIN};
pub use outcome::{ArtifactInfo, FileKind, JobOutcome};
pub use params::{BackgroundColor, JobParameters, LayoutOptions, ServiceUrl, WordcloudParameters};
pub use ports::{
    ArtifactSource, CloudRequest, EnrichmentService, ProgressReporter, StepUpdate, TableReader,
    TableWriter, WordcloudRenderer,
};
pub use selection::{select_features, selected_rows};
pub use table::{FeatureTable, TableError};
pub use types::{is_dna, OccurrenceFraction, RelativeScaling, Sequence, TermPolarity, Timestamp};
pub use validation::{biom_path, check_provenance, validate_table, ValidatedTable};
