use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StrainError {
    #[error("missing required key: {key}")]
    MissingKey { key: String },

    #[error("strain field is not set: {field}")]
    MissingField { field: &'static str },

    #[error("unknown strain field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {value}")]
    InvalidFieldValue { field: String, value: String },

    #[error("cannot compute the mean of an empty collection")]
    EmptyInput,

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("hash block size must be greater than zero")]
    InvalidBlockSize,

    #[error("empty command line")]
    EmptyCommand,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    JsonParse(String),

    #[error("invalid CSS selector: {0}")]
    Selector(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("unsupported config schema version: {0}")]
    UnsupportedSchema(u32),
}
