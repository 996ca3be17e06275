//! Tab-separated score and statistics tables.

use std::path::Path;

use csv::{Writer, WriterBuilder};
use pipeline::{DatabaseStats, ScoreMap, TableWriter, WordcloudError};
use tracing::debug;

/// Writes both tables with the `csv` crate, tab-delimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvTables;

impl TsvTables {
    fn open(path: &Path) -> Result<Writer<std::fs::File>, WordcloudError> {
        WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)
            .map_err(|err| write_error(path, err))
    }
}

fn write_error(path: &Path, err: csv::Error) -> WordcloudError {
    WordcloudError::OutputWrite {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

impl TableWriter for TsvTables {
    fn write_scores(&self, scores: &ScoreMap, path: &Path) -> Result<(), WordcloudError> {
        let mut writer = Self::open(path)?;
        writer
            .write_record(["term", "fscore"])
            .map_err(|err| write_error(path, err))?;
        for (term, score) in scores.ranked() {
            writer
                .write_record([term, score.to_string().as_str()])
                .map_err(|err| write_error(path, err))?;
        }
        writer.flush().map_err(|err| write_error(path, err.into()))?;
        debug!(path = %path.display(), rows = scores.len(), "wrote score table");
        Ok(())
    }

    fn write_stats(&self, stats: &DatabaseStats, path: &Path) -> Result<(), WordcloudError> {
        let mut writer = Self::open(path)?;
        for (name, value) in stats.rows() {
            writer
                .write_record([name, value])
                .map_err(|err| write_error(path, err))?;
        }
        writer.flush().map_err(|err| write_error(path, err.into()))?;
        debug!(path = %path.display(), "wrote database statistics");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pipeline::Timestamp;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scores_are_ranked_under_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fscores.tsv");
        let scores: ScoreMap = [("soil", 0.1), ("feces", 0.4), ("-saliva", 0.4)]
            .into_iter()
            .map(|(t, s)| (t.to_string(), s))
            .collect();

        TsvTables.write_scores(&scores, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "term\tfscore\n-saliva\t0.4\nfeces\t0.4\nsoil\t0.1\n"
        );
    }

    #[test]
    fn stats_end_with_the_query_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.tsv");
        let stats = DatabaseStats {
            entries: vec![("NumSequences".into(), "1200".into())],
            queried_at: Timestamp::now(),
        };

        TsvTables.write_stats(&stats, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "NumSequences\t1200");
        assert!(lines[1].starts_with("query_timestamp\t"));
    }

    #[test]
    fn unwritable_paths_fail() {
        let err = TsvTables
            .write_scores(&ScoreMap::new(), Path::new("/nonexistent/dir/fscores.tsv"))
            .unwrap_err();
        assert_eq!(err.kind(), "output_write");
    }
}
