//! HDF5 BIOM 2.x.
//!
//! Only the observation-major copy of the matrix is read:
//!
//! | Dataset | Contents |
//! |---------|----------|
//! | `observation/ids` | feature ids |
//! | `sample/ids` | sample ids |
//! | `observation/matrix/data` | stored counts |
//! | `observation/matrix/indices` | sample index of each stored count |
//! | `observation/matrix/indptr` | offset of each feature's first count |

use std::path::Path;

use hdf5::types::{VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, File};
use pipeline::FeatureTable;

use crate::BiomError;

/// Reads the HDF5 BIOM file at `path`.
pub fn read(path: &Path) -> Result<FeatureTable, BiomError> {
    let file = File::open(path)?;
    let features = ids(&file.dataset("observation/ids")?)?;
    let samples = ids(&file.dataset("sample/ids")?)?;
    let data: Vec<f64> = file.dataset("observation/matrix/data")?.read_raw()?;
    let indices: Vec<i64> = file.dataset("observation/matrix/indices")?.read_raw()?;
    let indptr: Vec<i64> = file.dataset("observation/matrix/indptr")?.read_raw()?;

    let cells = csr_cells(features.len(), &data, &indices, &indptr)?;
    Ok(FeatureTable::from_triplets(features, samples, cells)?)
}

/// Ids are variable-length strings, UTF-8 from current writers and ASCII
/// from older ones.
fn ids(dataset: &Dataset) -> Result<Vec<String>, BiomError> {
    if let Ok(ids) = dataset.read_raw::<VarLenUnicode>() {
        return Ok(ids.iter().map(|id| id.as_str().to_string()).collect());
    }
    let ids = dataset.read_raw::<VarLenAscii>()?;
    Ok(ids.iter().map(|id| id.as_str().to_string()).collect())
}

/// Expands row-major CSR arrays into `(row, column, value)` cells.
fn csr_cells(
    rows: usize,
    data: &[f64],
    indices: &[i64],
    indptr: &[i64],
) -> Result<Vec<(usize, usize, f64)>, BiomError> {
    if indptr.len() != rows + 1 {
        return Err(BiomError::Format(format!(
            "indptr has {} entries for {rows} observations",
            indptr.len()
        )));
    }
    if indices.len() != data.len() {
        return Err(BiomError::Format(format!(
            "{} indices for {} values",
            indices.len(),
            data.len()
        )));
    }

    let mut cells = Vec::with_capacity(data.len());
    for (row, bounds) in indptr.windows(2).enumerate() {
        let (start, end) = (offset(bounds[0])?, offset(bounds[1])?);
        if start > end || end > data.len() {
            return Err(BiomError::Format(format!(
                "observation {row} spans {start}..{end} of {} values",
                data.len()
            )));
        }
        for (&column, &value) in indices[start..end].iter().zip(&data[start..end]) {
            cells.push((row, offset(column)?, value));
        }
    }
    Ok(cells)
}

fn offset(value: i64) -> Result<usize, BiomError> {
    usize::try_from(value)
        .map_err(|_| BiomError::Format(format!("{value} is not a matrix offset")))
}
