use thiserror::Error;

#[derive(Error, Debug)]
pub enum OffseasonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No {0} file configured (pass it as a flag or run `offseason init`)")]
    MissingSource(&'static str),

    #[error("Cannot read {label} file {path}: {source}")]
    SourceUnreadable {
        label: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown export kind: {0}")]
    UnknownKind(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, OffseasonError>;
