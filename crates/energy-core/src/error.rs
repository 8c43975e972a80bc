use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campus energy pipeline.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output artifact could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be decoded or encoded.
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// The file has no header row at all.
    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    /// A timestamp cell did not match any recognised format.
    #[error("Invalid timestamp '{value}' in {path} (row {row})")]
    TimestampParse {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// A kWh cell was empty, non-numeric or not finite.
    #[error("Invalid kwh value '{value}' in {path} (row {row})")]
    KwhParse {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// Drawing the dashboard failed.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;
