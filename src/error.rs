use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected exactly one dropped file, got {count}")]
    Usage { count: usize },

    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content or bytes the input encoding cannot decode.
    #[error("failed to read {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no header row in {path}")]
    EmptyInput { path: PathBuf },

    #[error("required column missing: {}", labels.join(", "))]
    MissingColumns { labels: Vec<&'static str> },

    #[error("row {row} has only {width} fields")]
    ShortRow { row: usize, width: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
