use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid {field}: '{value}' ({reason})")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Prerequisites not satisfied for {module}: missing {missing:?}")]
    FailPrereq {
        module: String,
        missing: Vec<String>,
    },

    #[error("Module {0} is already planned")]
    DuplicateModule(String),

    #[error("Module {0} not found in catalogue")]
    UnknownModule(String),

    #[error("Invalid timetable command '{line}': {reason}")]
    InvalidTimetableCommand { line: String, reason: String },

    #[error("Data file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("No student profile set")]
    MissingProfile,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Corrupted data file {file}: {reason}")]
    CorruptedFile { file: String, reason: String },

    #[error("Catalogue request failed: {0}")]
    CatalogueError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
