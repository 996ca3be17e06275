//! Classic tab-separated BIOM tables.
//!
//! ```text
//! # Constructed from biom file
//! #OTU ID	S1	S2	taxonomy
//! TACGTAGG	3.0	0.0	k__Bacteria
//! ```
//!
//! Lines starting with `# ` before the header are comments. A trailing
//! metadata column (`taxonomy`) is ignored.

use csv::ReaderBuilder;
use pipeline::FeatureTable;

use crate::BiomError;

const METADATA_COLUMNS: [&str; 2] = ["taxonomy", "metadata"];

/// Parses a tab-separated table.
pub fn parse(bytes: &[u8]) -> Result<FeatureTable, BiomError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut header: Option<Vec<String>> = None;
    let mut features = Vec::new();
    let mut dense = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(first) = record.get(0) else {
            continue;
        };
        let width = match header.as_deref().map(sample_count) {
            Some(width) => width,
            None => {
                if !first.starts_with("# ") && !first.trim().is_empty() {
                    header = Some(record.iter().skip(1).map(|c| c.trim().to_string()).collect());
                }
                continue;
            }
        };
        let values = record
            .iter()
            .skip(1)
            .take(width)
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| BiomError::Format(format!("'{v}' for feature '{first}' is not a count")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        features.push(first.trim().to_string());
        dense.push(values);
    }

    let columns = header.ok_or_else(|| BiomError::Format("no header line".into()))?;
    let width = sample_count(&columns);
    let samples = columns.into_iter().take(width).collect();
    Ok(FeatureTable::from_dense(features, samples, dense)?)
}

fn sample_count(columns: &[String]) -> usize {
    match columns.last() {
        Some(last) if METADATA_COLUMNS.contains(&last.to_ascii_lowercase().as_str()) => {
            columns.len() - 1
        }
        _ => columns.len(),
    }
}
