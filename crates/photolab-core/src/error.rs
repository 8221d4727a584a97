use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotolabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("RAW decode error: {0}")]
    RawDecode(String),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("Unsupported color filter array: {0}")]
    UnsupportedCfa(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid region of interest: {0}")]
    InvalidRoi(String),

    #[error("Invalid channel combination: {0}")]
    InvalidChannels(String),

    #[error("Operation not available on synthetic G channel: {0}")]
    GreenChannel(String),

    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No SQLite database file found at {0}")]
    DatabaseNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(String),

    #[error("File list is empty, review the directory path or filter")]
    EmptyFileList,

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, PhotolabError>;
