//! JSON BIOM 1.0.
//!
//! ```json
//! {
//!   "format": "Biological Observation Matrix 1.0.0",
//!   "rows": [{"id": "TACG...", "metadata": null}],
//!   "columns": [{"id": "sample.1", "metadata": null}],
//!   "matrix_type": "sparse",
//!   "shape": [1, 1],
//!   "data": [[0, 0, 12.0]]
//! }
//! ```
//!
//! Sparse matrices list `[row, column, value]` triplets; dense matrices list
//! one array per row.

use pipeline::FeatureTable;
use serde::Deserialize;

use crate::BiomError;

#[derive(Debug, Deserialize)]
struct Axis {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MatrixType {
    Sparse,
    Dense,
}

#[derive(Debug, Deserialize)]
struct Document {
    rows: Vec<Axis>,
    columns: Vec<Axis>,
    matrix_type: MatrixType,
    shape: [usize; 2],
    data: Vec<Vec<f64>>,
}

/// Parses a JSON BIOM document.
pub fn parse(bytes: &[u8]) -> Result<FeatureTable, BiomError> {
    let doc: Document = serde_json::from_slice(bytes)?;
    let [n_rows, n_columns] = doc.shape;
    if doc.rows.len() != n_rows || doc.columns.len() != n_columns {
        return Err(BiomError::Format(format!(
            "shape {n_rows}x{n_columns} does not match {} rows and {} columns",
            doc.rows.len(),
            doc.columns.len()
        )));
    }
    let features = doc.rows.into_iter().map(|axis| axis.id).collect();
    let samples = doc.columns.into_iter().map(|axis| axis.id).collect();

    let table = match doc.matrix_type {
        MatrixType::Dense => FeatureTable::from_dense(features, samples, doc.data)?,
        MatrixType::Sparse => {
            let cells = doc
                .data
                .iter()
                .map(|entry| triplet(entry))
                .collect::<Result<Vec<_>, _>>()?;
            FeatureTable::from_triplets(features, samples, cells)?
        }
    };
    Ok(table)
}

fn triplet(entry: &[f64]) -> Result<(usize, usize, f64), BiomError> {
    let [row, column, value] = entry else {
        return Err(BiomError::Format(format!(
            "sparse entry {entry:?} is not a [row, column, value] triplet"
        )));
    };
    Ok((index(*row)?, index(*column)?, *value))
}

fn index(value: f64) -> Result<usize, BiomError> {
    if value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(BiomError::Format(format!("{value} is not a matrix index")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPARSE: &str = r#"{
        "id": "No Table ID",
        "format": "Biological Observation Matrix 1.0.0",
        "type": "OTU table",
        "rows": [{"id": "TACGTAGG", "metadata": null}, {"id": "TACGGAGG", "metadata": null}],
        "columns": [{"id": "S1", "metadata": null}, {"id": "S2", "metadata": null}, {"id": "S3", "metadata": null}],
        "matrix_type": "sparse",
        "matrix_element_type": "float",
        "shape": [2, 3],
        "data": [[0, 0, 3.0], [0, 2, 1.0], [1, 1, 7.0]]
    }"#;

    #[test]
    fn parses_sparse_tables() {
        let table = parse(SPARSE.as_bytes()).unwrap();
        assert_eq!(table.features(), &["TACGTAGG".to_string(), "TACGGAGG".to_string()]);
        assert_eq!(table.n_samples(), 3);
        assert_eq!(table.occurrence(0), 2);
        assert_eq!(table.occurrence(1), 1);
    }

    #[test]
    fn parses_dense_tables() {
        let doc = r#"{
            "rows": [{"id": "AC"}], "columns": [{"id": "S1"}, {"id": "S2"}],
            "matrix_type": "dense", "shape": [1, 2], "data": [[0, 4]]
        }"#;
        let table = parse(doc.as_bytes()).unwrap();
        assert_eq!(table.n_samples(), 2);
        assert_eq!(table.occurrence(0), 1);
    }

    #[test]
    fn rejects_shape_mismatch() {
        let doc = r#"{
            "rows": [{"id": "AC"}], "columns": [{"id": "S1"}],
            "matrix_type": "dense", "shape": [2, 1], "data": [[1]]
        }"#;
        assert!(matches!(parse(doc.as_bytes()), Err(BiomError::Format(_))));
    }

    #[test]
    fn rejects_malformed_triplets() {
        let doc = r#"{
            "rows": [{"id": "AC"}], "columns": [{"id": "S1"}],
            "matrix_type": "sparse", "shape": [1, 1], "data": [[0, 0.5, 1]]
        }"#;
        assert!(matches!(parse(doc.as_bytes()), Err(BiomError::Format(_))));
    }
}
