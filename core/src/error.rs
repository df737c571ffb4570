use std::path::PathBuf;

/// Failure to turn the movie dataset into a corpus. Always fatal: nothing is served
/// from a partially loaded dataset.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("bad record at line {line}: {message}")]
    Row { line: u64, message: String },
}
