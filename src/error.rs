use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing the student dataset file.
///
/// Any of these at startup means the service must not come up.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("could not read dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("malformed record {row} in {}: {source}", path.display())]
    Record {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("record {row} in {} has a non-finite {column}", path.display())]
    NonFinite {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },

    #[error("could not write dataset {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
