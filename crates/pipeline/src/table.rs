//! Sparse feature-by-sample count matrix.
//!
//! A [`FeatureTable`] is built once by a [`crate::TableReader`] and is
//! read-only afterwards. Only non-zero cells are stored, row by row, which
//! is all the occurrence filter needs.

use std::collections::HashSet;

use thiserror::Error;

/// Structural problems found while building a [`FeatureTable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    /// A cell references a row or column outside the declared shape.
    #[error("cell ({row}, {column}) is outside a {rows}x{columns} table")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// A dense row has the wrong number of columns.
    #[error("row '{feature}' has {found} values, expected {expected}")]
    RaggedRow {
        feature: String,
        found: usize,
        expected: usize,
    },

    /// A count is negative, infinite, or NaN.
    #[error("invalid count {value} for feature '{feature}' in sample '{sample}'")]
    InvalidCount {
        feature: String,
        sample: String,
        value: f64,
    },

    /// The same feature identifier appears on two rows.
    #[error("duplicate feature identifier '{0}'")]
    DuplicateFeature(String),
}

/// Sparse matrix of non-negative counts; rows are features, columns samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    features: Vec<String>,
    samples: Vec<String>,
    // Non-zero (column, count) pairs per row, ordered by column.
    rows: Vec<Vec<(usize, f64)>>,
}

impl FeatureTable {
    /// Builds a table from `(row, column, count)` triplets.
    ///
    /// Zero counts are dropped; repeated cells are summed.
    pub fn from_triplets(
        features: Vec<String>,
        samples: Vec<String>,
        cells: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, TableError> {
        check_unique(&features)?;
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); features.len()];
        for (row, column, value) in cells {
            if row >= features.len() || column >= samples.len() {
                return Err(TableError::OutOfBounds {
                    row,
                    column,
                    rows: features.len(),
                    columns: samples.len(),
                });
            }
            if !value.is_finite() || value < 0.0 {
                return Err(TableError::InvalidCount {
                    feature: features[row].clone(),
                    sample: samples[column].clone(),
                    value,
                });
            }
            if value > 0.0 {
                rows[row].push((column, value));
            }
        }
        for row in &mut rows {
            row.sort_by_key(|(column, _)| *column);
            row.dedup_by(|next, kept| {
                if next.0 == kept.0 {
                    kept.1 += next.1;
                    true
                } else {
                    false
                }
            });
        }
        Ok(Self {
            features,
            samples,
            rows,
        })
    }

    /// Builds a table from dense rows, one `Vec` of counts per feature.
    pub fn from_dense(
        features: Vec<String>,
        samples: Vec<String>,
        dense: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        let width = samples.len();
        if dense.len() != features.len() {
            return Err(TableError::OutOfBounds {
                row: dense.len(),
                column: 0,
                rows: features.len(),
                columns: width,
            });
        }
        let mut cells = Vec::new();
        for (row, values) in dense.iter().enumerate() {
            if values.len() != width {
                return Err(TableError::RaggedRow {
                    feature: features[row].clone(),
                    found: values.len(),
                    expected: width,
                });
            }
            cells.extend(
                values
                    .iter()
                    .enumerate()
                    .map(|(column, value)| (row, column, *value)),
            );
        }
        Self::from_triplets(features, samples, cells)
    }

    /// Feature identifiers in table order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples in which the feature on `row` has a non-zero count.
    pub fn occurrence(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// `(feature, occurrence)` pairs in table order.
    pub fn occurrences(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.features
            .iter()
            .zip(&self.rows)
            .map(|(feature, cells)| (feature.as_str(), cells.len()))
    }
}

fn check_unique(features: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(features.len());
    for feature in features {
        if !seen.insert(feature.as_str()) {
            return Err(TableError::DuplicateFeature(feature.clone()));
        }
    }
    Ok(())
}
