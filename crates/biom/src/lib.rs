//! BIOM feature table reader.
//!
//! Implements the [`pipeline::TableReader`] port for the encodings of the
//! Biological Observation Matrix format:
//!
//! - HDF5 BIOM 2.x, as Qiita stores deblur tables, see `h5` (feature `hdf5`,
//!   on by default).
//! - JSON BIOM 1.0 (sparse or dense matrices), see [`json`].
//! - Classic tab-separated tables as written by `biom convert --to-tsv`,
//!   see [`tsv`].
//!
//! Without the `hdf5` feature, HDF5 files are recognised by their signature
//! and rejected with a hint to convert them to JSON first.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File access and format parsing live here; the
//! [`pipeline`] crate sees only [`pipeline::TableReader`].

#[cfg(feature = "hdf5")]
pub mod h5;
pub mod json;
pub mod tsv;

use std::path::{Path, PathBuf};

use pipeline::{FeatureTable, TableError, TableReader, WordcloudError};
use thiserror::Error;
use tracing::{debug, instrument};

/// Signature at the start of every HDF5 file.
const HDF5_SIGNATURE: &[u8] = b"\x89HDF\r\n\x1a\n";

/// Failures while reading a BIOM file.
#[derive(Debug, Error)]
pub enum BiomError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "HDF5 (BIOM 2.x) tables are not supported; convert with `biom convert --to-json` first"
    )]
    Hdf5Unsupported,

    #[cfg(feature = "hdf5")]
    #[error("malformed BIOM HDF5: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("malformed BIOM JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed BIOM TSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed BIOM table: {0}")]
    Format(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Encodings recognised by [`BiomReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiomFormat {
    Hdf5,
    Json,
    Tsv,
}

/// Guesses the encoding of `bytes`.
pub fn detect_format(bytes: &[u8]) -> Result<BiomFormat, BiomError> {
    if bytes.starts_with(HDF5_SIGNATURE) {
        return Ok(BiomFormat::Hdf5);
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(BiomFormat::Json),
        Some(_) => Ok(BiomFormat::Tsv),
        None => Err(BiomError::Format("file is empty".into())),
    }
}

/// Parses an in-memory BIOM document of either text encoding.
///
/// HDF5 containers can only be read from a file, see [`BiomReader::read`].
pub fn parse_table(bytes: &[u8]) -> Result<FeatureTable, BiomError> {
    match detect_format(bytes)? {
        BiomFormat::Hdf5 => Err(BiomError::Format(
            "HDF5 tables must be read from a file".into(),
        )),
        BiomFormat::Json => json::parse(bytes),
        BiomFormat::Tsv => tsv::parse(bytes),
    }
}

#[cfg(feature = "hdf5")]
fn read_hdf5(path: &Path) -> Result<FeatureTable, BiomError> {
    h5::read(path)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(_: &Path) -> Result<FeatureTable, BiomError> {
    Err(BiomError::Hdf5Unsupported)
}

/// Reads feature tables from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiomReader;

impl BiomReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses the table at `path`.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(&self, path: &Path) -> Result<FeatureTable, BiomError> {
        let bytes = std::fs::read(path).map_err(|source| BiomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = match detect_format(&bytes)? {
            BiomFormat::Hdf5 => read_hdf5(path)?,
            _ => parse_table(&bytes)?,
        };
        debug!(
            features = table.n_features(),
            samples = table.n_samples(),
            "read feature table"
        );
        Ok(table)
    }
}

impl TableReader for BiomReader {
    fn read_table(&self, path: &Path) -> Result<FeatureTable, WordcloudError> {
        self.read(path).map_err(|err| WordcloudError::TableUnreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}
