//! Feature selection by sample occurrence.

use tracing::debug;

use crate::{FeatureTable, OccurrenceFraction, Sequence, ValidatedTable};

/// Rows whose feature is observed (count > 0) in at least
/// `threshold * n_samples` samples, in table order.
pub fn selected_rows(table: &FeatureTable, threshold: OccurrenceFraction) -> Vec<usize> {
    let required = threshold.as_f64() * table.n_samples() as f64;
    table
        .occurrences()
        .enumerate()
        .filter(|(_, (_, occurrence))| *occurrence as f64 >= required)
        .map(|(row, _)| row)
        .collect()
}

/// Sequences of the features that pass the occurrence threshold.
///
/// May be empty; an empty selection is still submitted to dbBact.
pub fn select_features(validated: &ValidatedTable, threshold: OccurrenceFraction) -> Vec<Sequence> {
    let selected: Vec<Sequence> = selected_rows(validated.table(), threshold)
        .into_iter()
        .map(|row| validated.sequences()[row].clone())
        .collect();
    debug!(
        %threshold,
        selected = selected.len(),
        features = validated.sequences().len(),
        "selected features by occurrence"
    );
    selected
}
